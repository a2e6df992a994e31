//! Arithmétique calendaire simple : parsing/formatage, décalages, bornes de
//! semaine et de mois, numéros de jour et de semaine, période fiscale.
//!
//! Toutes les fonctions travaillent sur `NaiveDateTime` et retournent de nouvelles valeurs.

use crate::error::{DateError, Result};
use crate::model::{DiffUnit, Offset, WeekStandard};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::fmt::Write;

/// Parse `input` avec un format strftime ; un format sans heure donne minuit.
pub fn parse(input: &str, format: &str) -> Result<NaiveDateTime> {
    let raw = input.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, format) {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(DateError::Parse {
        input: input.to_string(),
        format: format.to_string(),
    })
}

/// Parse avec le format par défaut, suivi éventuellement de `%H:%M:%S`.
pub fn parse_with_default(input: &str, base_format: &str) -> Result<NaiveDateTime> {
    parse(input, base_format).or_else(|err| {
        let with_time = format!("{base_format} %H:%M:%S");
        parse(input, &with_time).map_err(|_| err)
    })
}

pub fn format(dt: NaiveDateTime, fmt: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(fmt))
        .map_err(|_| DateError::invalid(format!("invalid output format: {fmt}")))?;
    Ok(out)
}

fn shift_seconds(dt: NaiveDateTime, secs: i64) -> Result<NaiveDateTime> {
    Duration::try_seconds(secs)
        .and_then(|d| dt.checked_add_signed(d))
        .ok_or_else(|| DateError::invalid(format!("offset out of range from {dt}")))
}

fn shift_days(dt: NaiveDateTime, days: i64) -> Result<NaiveDateTime> {
    let secs = days
        .checked_mul(86_400)
        .ok_or_else(|| DateError::invalid("day offset overflow"))?;
    shift_seconds(dt, secs)
}

/// Années et mois d'abord (jour ramené au dernier du mois si besoin), puis le reste.
pub fn offset(dt: NaiveDateTime, off: Offset) -> Result<NaiveDateTime> {
    let months = i64::from(off.years) * 12 + i64::from(off.months);
    let amount = u32::try_from(months.unsigned_abs())
        .map_err(|_| DateError::invalid("month offset overflow"))?;
    let shifted = if months >= 0 {
        dt.checked_add_months(Months::new(amount))
    } else {
        dt.checked_sub_months(Months::new(amount))
    }
    .ok_or_else(|| DateError::invalid(format!("month offset out of range from {dt}")))?;

    let secs = [
        (off.weeks, 7 * 86_400),
        (off.days, 86_400),
        (off.hours, 3_600),
        (off.minutes, 60),
        (off.seconds, 1),
    ]
    .iter()
    .try_fold(0i64, |acc, &(n, unit)| n.checked_mul(unit)?.checked_add(acc))
    .ok_or_else(|| DateError::invalid("offset overflow"))?;
    shift_seconds(shifted, secs)
}

/// Lundi de la semaine de `dt`.
pub fn first_day_of_week(dt: NaiveDateTime) -> Result<NaiveDateTime> {
    shift_days(dt, -i64::from(dt.weekday().num_days_from_monday()))
}

/// Dimanche de la semaine de `dt`.
pub fn last_day_of_week(dt: NaiveDateTime) -> Result<NaiveDateTime> {
    shift_days(dt, 6 - i64::from(dt.weekday().num_days_from_monday()))
}

pub fn first_day_of_month(dt: NaiveDateTime) -> Result<NaiveDateTime> {
    dt.with_day(1)
        .ok_or_else(|| DateError::Internal(format!("no first day for {dt}")))
}

pub fn last_day_of_month(dt: NaiveDateTime) -> Result<NaiveDateTime> {
    let day = days_in_month(dt.year(), dt.month())?;
    dt.with_day(day)
        .ok_or_else(|| DateError::Internal(format!("no last day for {dt}")))
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DateError::invalid(format!("invalid month {year}-{month}")))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| DateError::invalid(format!("month out of range: {year}-{month}")))?;
    Ok(last.day())
}

/// Date du jour `weekday` dans la semaine (lundi..dimanche) de `dt`.
pub fn date_of_weekday(dt: NaiveDateTime, weekday: Weekday) -> Result<NaiveDateTime> {
    shift_days(
        first_day_of_week(dt)?,
        i64::from(weekday.num_days_from_monday()),
    )
}

pub fn day_of_year(dt: NaiveDateTime) -> u32 {
    dt.ordinal()
}

pub fn week_of_year(dt: NaiveDateTime, standard: WeekStandard) -> u32 {
    match standard {
        WeekStandard::Iso => dt.iso_week().week(),
        WeekStandard::Us => {
            // 1er janvier, 0 = dimanche
            let jan1 = (dt.weekday().num_days_from_sunday() + 7 - (dt.ordinal0() % 7)) % 7;
            (dt.ordinal() + jan1 - 1) / 7 + 1
        }
        WeekStandard::Monday => (dt.ordinal0() + 7 - dt.weekday().num_days_from_monday()) / 7,
    }
}

/// Nombre d'unités entières de `second - first` (signé, tronqué vers zéro).
pub fn dates_diff(first: NaiveDateTime, second: NaiveDateTime, unit: DiffUnit) -> i64 {
    let delta = second - first;
    match unit {
        DiffUnit::Seconds => delta.num_seconds(),
        DiffUnit::Minutes => delta.num_minutes(),
        DiffUnit::Hours => delta.num_hours(),
        DiffUnit::Days => delta.num_days(),
    }
}

fn check_start_month(start_month: u32) -> Result<()> {
    if (1..=12).contains(&start_month) {
        Ok(())
    } else {
        Err(DateError::invalid(format!(
            "fiscal start month must be within 1..=12, got {start_month}"
        )))
    }
}

/// Année fiscale, nommée d'après l'année civile où elle se termine.
pub fn fiscal_year(dt: NaiveDateTime, start_month: u32) -> Result<i32> {
    check_start_month(start_month)?;
    if start_month > 1 && dt.month() >= start_month {
        Ok(dt.year() + 1)
    } else {
        Ok(dt.year())
    }
}

/// Mois fiscal (1..=12), le mois `start_month` étant le premier.
pub fn fiscal_month(dt: NaiveDateTime, start_month: u32) -> Result<u32> {
    check_start_month(start_month)?;
    Ok((dt.month() + 12 - start_month) % 12 + 1)
}
