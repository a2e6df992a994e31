mod walk;

use crate::error::{DateError, Result};
use crate::holidays::HolidayProvider;
use crate::model::CountryCode;
use chrono::{Datelike, NaiveDate};
use std::num::NonZeroU32;
use walk::{Direction, HolidayWindow};

pub const DEFAULT_MAX_WALK_DAYS: NonZeroU32 = match NonZeroU32::new(400) {
    Some(cap) => cap,
    None => panic!("walk cap must be non-zero"),
};

/// Moteur de jours ouvrés : samedi et dimanche sont chômés, ainsi que les jours
/// fériés du pays quand un `country` est fourni.
///
/// Sans état propre ; le seul état partagé est le cache du `HolidayProvider`.
#[derive(Clone, Copy)]
pub struct BusinessDays<'p> {
    provider: Option<&'p HolidayProvider>,
    max_walk_days: NonZeroU32,
}

impl<'p> BusinessDays<'p> {
    pub fn new(provider: &'p HolidayProvider) -> Self {
        Self {
            provider: Some(provider),
            max_walk_days: DEFAULT_MAX_WALK_DAYS,
        }
    }

    /// Moteur sans fournisseur : seuls les week-ends comptent.
    pub fn weekends_only() -> Self {
        Self {
            provider: None,
            max_walk_days: DEFAULT_MAX_WALK_DAYS,
        }
    }

    pub fn with_max_walk_days(mut self, cap: NonZeroU32) -> Self {
        self.max_walk_days = cap;
        self
    }

    fn window<'a>(&'a self, country: Option<&'a CountryCode>) -> Result<HolidayWindow<'a>> {
        match (country, self.provider) {
            (None, _) => Ok(HolidayWindow::new(None)),
            (Some(c), Some(p)) => Ok(HolidayWindow::new(Some((p, c)))),
            (Some(c), None) => Err(DateError::invalid(format!(
                "holiday-aware lookup for {c} needs a holiday provider"
            ))),
        }
    }

    pub fn is_working_day(&self, date: NaiveDate, country: Option<&CountryCode>) -> Result<bool> {
        self.window(country)?.is_working_day(date)
    }

    pub fn next_working_day(
        &self,
        date: NaiveDate,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDate> {
        self.window(country)?
            .step(date, Direction::Forward, self.max_walk_days.get())
    }

    pub fn previous_working_day(
        &self,
        date: NaiveDate,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDate> {
        self.window(country)?
            .step(date, Direction::Backward, self.max_walk_days.get())
    }

    /// N-ième jour ouvré (à partir de 1) du mois `month` de `year`.
    pub fn nth_working_day_of_month(
        &self,
        n: u32,
        year: i32,
        month: u32,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDate> {
        if n == 0 {
            return Err(DateError::invalid("n must be >= 1"));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DateError::invalid(format!("invalid month {year}-{month}")))?;
        let mut window = self.window(country)?;
        let mut count = 0;
        let mut day = first;
        while day.month0() == first.month0() {
            if window.is_working_day(day)? {
                count += 1;
                if count == n {
                    return Ok(day);
                }
            }
            day = match day.succ_opt() {
                Some(d) => d,
                None => break,
            };
        }
        Err(DateError::invalid(format!(
            "{year}-{month:02} has only {count} working days, asked for #{n}"
        )))
    }

    /// Décale de `days_offset` jours ouvrés ; la date de départ n'est jamais comptée.
    pub fn working_day_offset(
        &self,
        date: NaiveDate,
        days_offset: i64,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDate> {
        let dir = if days_offset >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        };
        let mut window = self.window(country)?;
        let mut current = date;
        for _ in 0..days_offset.unsigned_abs() {
            current = window.step(current, dir, self.max_walk_days.get())?;
        }
        Ok(current)
    }

    pub fn add_working_days(
        &self,
        date: NaiveDate,
        days: i64,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDate> {
        self.working_day_offset(date, days, country)
    }
}
