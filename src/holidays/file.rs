use super::HolidaySource;
use crate::error::{DateError, LookupCause, Result};
use crate::model::{CountryCode, HolidaySet};
use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;

/// Source hors-ligne chargée depuis un CSV: header `date,country[,global]`.
///
/// Un pays absent du fichier est inconnu ; un pays présent sans ligne pour
/// l'année demandée n'a simplement pas de jour férié cette année-là.
#[derive(Debug, Clone, Default)]
pub struct CsvHolidaySource {
    by_country: HashMap<CountryCode, Vec<NaiveDate>>,
}

impl CsvHolidaySource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let mut by_country: HashMap<CountryCode, Vec<NaiveDate>> = HashMap::new();
        for (line, rec) in rdr.records().enumerate() {
            let rec = rec?;
            let row = line + 2;
            let date = rec.get(0).context("missing date")?.trim();
            let country = rec.get(1).context("missing country")?.trim();
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("invalid date on row {row}: {date}"))?;
            let country = CountryCode::new(country)
                .with_context(|| format!("invalid country on row {row}"))?;
            let global = match rec.get(2).map(str::trim) {
                None | Some("") => true,
                Some(flag) => parse_bool(flag)
                    .with_context(|| format!("invalid global flag on row {row}"))?,
            };
            let dates = by_country.entry(country).or_default();
            if global {
                dates.push(date);
            }
        }
        Ok(Self { by_country })
    }

    /// Déclare un pays connu avec ses jours fériés (utile hors fichier).
    pub fn with_country<I>(mut self, country: CountryCode, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.by_country.entry(country).or_default().extend(dates);
        self
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryCode> {
        self.by_country.keys()
    }
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

impl HolidaySource for CsvHolidaySource {
    fn fetch(&self, country: &CountryCode, year: i32) -> Result<HolidaySet> {
        let dates = self
            .by_country
            .get(country)
            .ok_or_else(|| DateError::lookup(country, year, LookupCause::UnknownCountry))?;
        Ok(dates.iter().copied().filter(|d| d.year() == year).collect())
    }
}
