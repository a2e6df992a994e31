use crate::error::DateError;
use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Code pays (ISO 3166-1 alpha-2 le plus souvent), clé des jours fériés.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Valide et normalise en majuscules. Seule la non-vacuité est garantie ici :
    /// l'existence du pays relève du fournisseur.
    pub fn new<S: AsRef<str>>(s: S) -> Result<Self, DateError> {
        let raw = s.as_ref().trim();
        if raw.is_empty() {
            return Err(DateError::invalid("country code cannot be empty"));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DateError::invalid(format!("invalid country code: {raw}")));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = DateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = DateError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CountryCode> for String {
    fn from(c: CountryCode) -> Self {
        c.0
    }
}

/// Ensemble des jours fériés nationaux d'un pays pour une année.
/// Granularité jour uniquement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet(BTreeSet<NaiveDate>);

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.0.insert(date)
    }
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Dates triées par ordre croissant.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Entrée de date acceptée par le service : texte, valeur déjà structurée, ou maintenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    Now,
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

/// Forme de sortie demandée par l'appelant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOutput {
    Text(String),
    Value(NaiveDateTime),
}

impl fmt::Display for DateOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Value(dt) => write!(f, "{dt}"),
        }
    }
}

/// Convention de numérotation des semaines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStandard {
    /// ISO 8601 : la semaine 1 contient le premier jeudi.
    Iso,
    /// US : la semaine 1 contient le 1er janvier, semaines commençant le dimanche.
    Us,
    /// `%W` : semaines commençant le lundi, les jours avant le premier lundi sont en semaine 0.
    #[default]
    Monday,
}

impl FromStr for WeekStandard {
    type Err = DateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iso" => Ok(Self::Iso),
            "us" => Ok(Self::Us),
            "monday" | "default" => Ok(Self::Monday),
            other => Err(DateError::invalid(format!("unknown week standard: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffUnit {
    Seconds,
    Minutes,
    Hours,
    #[default]
    Days,
}

impl FromStr for DiffUnit {
    type Err = DateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seconds" => Ok(Self::Seconds),
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            other => Err(DateError::invalid(format!("unknown unit: {other}"))),
        }
    }
}

/// Décalage calendaire ; chaque composante peut être négative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub years: i32,
    pub months: i32,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Offset {
    pub fn days(days: i64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }
    pub fn months(months: i32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }
}

/// `mon`..`sun` (ou nom anglais complet) vers `Weekday`.
pub fn parse_weekday(s: &str) -> Result<Weekday, DateError> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| DateError::invalid(format!("unknown weekday: {s}")))
}
