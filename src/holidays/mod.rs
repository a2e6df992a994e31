mod cache;
mod file;
mod nager;
mod storage;

pub use cache::{CachedHolidays, HolidayCache};
pub use file::CsvHolidaySource;
pub use nager::{parse_public_holidays, NagerDateSource};
pub use storage::{HolidayStore, JsonHolidayStore};

use crate::error::{DateError, Result};
use crate::model::{CountryCode, HolidaySet};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Source brute (non mise en cache) de jours fériés.
pub trait HolidaySource: Send + Sync {
    /// Jours fériés nationaux de `country` pour `year`.
    fn fetch(&self, country: &CountryCode, year: i32) -> Result<HolidaySet>;
}

impl<T: HolidaySource + ?Sized> HolidaySource for Arc<T> {
    fn fetch(&self, country: &CountryCode, year: i32) -> Result<HolidaySet> {
        (**self).fetch(country, year)
    }
}

/// Fournisseur de jours fériés : consulte le cache, puis la source en cas d'absence.
///
/// Un échec de la source n'est jamais mis en cache ; l'appel suivant retente.
pub struct HolidayProvider {
    source: Box<dyn HolidaySource>,
    cache: HolidayCache,
}

impl HolidayProvider {
    pub fn new(source: Box<dyn HolidaySource>) -> Self {
        Self::with_cache(source, HolidayCache::new(None))
    }

    pub fn with_ttl(source: Box<dyn HolidaySource>, ttl: Option<Duration>) -> Self {
        Self::with_cache(source, HolidayCache::new(ttl))
    }

    pub fn with_cache(source: Box<dyn HolidaySource>, cache: HolidayCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &HolidayCache {
        &self.cache
    }

    pub fn get_holidays(&self, country: &CountryCode, year: i32) -> Result<Arc<HolidaySet>> {
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Err(DateError::invalid(format!("year out of range: {year}")));
        }
        if let Some(set) = self.cache.get(country, year) {
            debug!(%country, year, "holiday cache hit");
            return Ok(set);
        }
        debug!(%country, year, "holiday cache miss");
        let set = self.source.fetch(country, year)?;
        Ok(self.cache.insert(country.clone(), year, set))
    }

    pub fn is_public_holiday(&self, date: NaiveDate, country: &CountryCode) -> Result<bool> {
        Ok(self.get_holidays(country, date.year())?.contains(date))
    }

    /// Union triée des jours fériés sur plusieurs années.
    pub fn public_holidays(&self, country: &CountryCode, years: &[i32]) -> Result<Vec<NaiveDate>> {
        let mut all = BTreeSet::new();
        for &year in years {
            all.extend(self.get_holidays(country, year)?.iter());
        }
        Ok(all.into_iter().collect())
    }
}
