use crate::error::{DateError, Result};
use crate::holidays::HolidayProvider;
use crate::model::{CountryCode, HolidaySet};
use chrono::{Datelike, NaiveDate, Weekday};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    Forward,
    Backward,
}

pub(super) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub(super) fn neighbour(date: NaiveDate, dir: Direction) -> Result<NaiveDate> {
    let next = match dir {
        Direction::Forward => date.succ_opt(),
        Direction::Backward => date.pred_opt(),
    };
    next.ok_or_else(|| DateError::invalid(format!("date overflow next to {date}")))
}

/// Vue des jours fériés pendant un parcours : garde l'ensemble de l'année courante
/// et interroge de nouveau le fournisseur quand le parcours change d'année.
pub(super) struct HolidayWindow<'p> {
    lookup: Option<(&'p HolidayProvider, &'p CountryCode)>,
    current: Option<(i32, Arc<HolidaySet>)>,
}

impl<'p> HolidayWindow<'p> {
    pub(super) fn new(lookup: Option<(&'p HolidayProvider, &'p CountryCode)>) -> Self {
        Self {
            lookup,
            current: None,
        }
    }

    fn is_holiday(&mut self, date: NaiveDate) -> Result<bool> {
        let Some((provider, country)) = self.lookup else {
            return Ok(false);
        };
        let year = date.year();
        if let Some((y, set)) = &self.current {
            if *y == year {
                return Ok(set.contains(date));
            }
        }
        let set = provider.get_holidays(country, year)?;
        let hit = set.contains(date);
        self.current = Some((year, set));
        Ok(hit)
    }

    pub(super) fn is_working_day(&mut self, date: NaiveDate) -> Result<bool> {
        if is_weekend(date) {
            return Ok(false);
        }
        Ok(!self.is_holiday(date)?)
    }

    /// Premier jour ouvré strictement après (ou avant) `from`, en au plus `cap` jours.
    pub(super) fn step(&mut self, from: NaiveDate, dir: Direction, cap: u32) -> Result<NaiveDate> {
        let mut candidate = from;
        for _ in 0..cap {
            candidate = neighbour(candidate, dir)?;
            if self.is_working_day(candidate)? {
                return Ok(candidate);
            }
        }
        Err(DateError::Internal(format!(
            "no working day found within {cap} days {} {from}",
            match dir {
                Direction::Forward => "after",
                Direction::Backward => "before",
            }
        )))
    }
}
