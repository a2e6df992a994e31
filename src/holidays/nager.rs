use super::HolidaySource;
use crate::config::DateConfig;
use crate::error::{DateError, LookupCause, Result};
use crate::model::{CountryCode, HolidaySet};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// Enregistrement renvoyé par `/PublicHolidays/{year}/{country}`.
/// Seuls la date et le caractère national nous intéressent.
#[derive(Debug, Deserialize)]
struct PublicHoliday {
    date: NaiveDate,
    #[serde(default = "national")]
    global: bool,
}

fn national() -> bool {
    true
}

/// Décode la réponse JSON en ne gardant que les jours fériés nationaux.
pub fn parse_public_holidays(body: &[u8]) -> Result<HolidaySet, LookupCause> {
    let records: Vec<PublicHoliday> = serde_json::from_slice(body)?;
    Ok(records
        .into_iter()
        .filter(|h| h.global)
        .map(|h| h.date)
        .collect())
}

/// Source HTTP Nager.Date (API v3), client bloquant avec timeout.
#[derive(Debug, Clone)]
pub struct NagerDateSource {
    client: Client,
    base_url: String,
    retry_transient: bool,
}

impl NagerDateSource {
    pub fn new<S: Into<String>>(base_url: S, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DateError::Internal(format!("building HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_transient: true,
        })
    }

    pub fn from_config(cfg: &DateConfig) -> Result<Self> {
        let mut source = Self::new(cfg.api_base_url.clone(), cfg.api_timeout())?;
        source.retry_transient = cfg.retry_transient;
        Ok(source)
    }

    pub fn url(&self, country: &CountryCode, year: i32) -> String {
        format!("{}/PublicHolidays/{year}/{country}", self.base_url)
    }

    fn request(&self, url: &str) -> Result<HolidaySet, LookupCause> {
        let resp = self.client.get(url).send()?;
        match resp.status() {
            StatusCode::OK => parse_public_holidays(&resp.bytes()?),
            StatusCode::NO_CONTENT => Ok(HolidaySet::new()),
            StatusCode::NOT_FOUND => Err(LookupCause::UnknownCountry),
            other => Err(LookupCause::Status(other.as_u16())),
        }
    }
}

impl HolidaySource for NagerDateSource {
    fn fetch(&self, country: &CountryCode, year: i32) -> Result<HolidaySet> {
        let url = self.url(country, year);
        info!(%url, "fetching public holidays");
        let first = self.request(&url);
        let outcome = match first {
            Err(cause) if self.retry_transient && cause.is_transient() => {
                warn!(%url, error = %cause, "transient failure, retrying once");
                self.request(&url)
            }
            other => other,
        };
        outcome.map_err(|cause| DateError::lookup(country, year, cause))
    }
}
