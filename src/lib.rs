#![forbid(unsafe_code)]
//! Ouvrable — arithmétique de dates et de jours ouvrés pour scripts et automatisations.
//!
//! - Jours ouvrés : week-ends (samedi, dimanche) et jours fériés publics.
//! - Jours fériés récupérés via Nager.Date ou un CSV local, mis en cache par (pays, année).
//! - Arithmétique calendaire : décalages, bornes de semaine/mois, semaines, période fiscale.
//! - Dates naïves (sans fuseau) ; parsing/formatage strftime, `%d.%m.%Y` par défaut.

pub mod calendar;
pub mod config;
pub mod error;
pub mod holidays;
pub mod model;
pub mod service;
pub mod workdays;

pub use config::DateConfig;
pub use error::{DateError, LookupCause};
pub use holidays::{
    CachedHolidays, CsvHolidaySource, HolidayCache, HolidayProvider, HolidaySource, HolidayStore,
    JsonHolidayStore, NagerDateSource,
};
pub use model::{
    parse_weekday, CountryCode, DateInput, DateOutput, DiffUnit, HolidaySet, Offset, OutputMode,
    WeekStandard,
};
pub use service::DateService;
pub use workdays::BusinessDays;
