use crate::model::CountryCode;
use thiserror::Error;

/// Cause détaillée d'un échec de récupération des jours fériés.
#[derive(Error, Debug)]
pub enum LookupCause {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("unknown country code")]
    UnknownCountry,
    #[error("malformed holiday payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl LookupCause {
    /// Erreur réseau passagère (connexion ou timeout), éligible à un nouvel essai.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_timeout() || err.is_connect(),
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum DateError {
    #[error("could not parse '{input}' with format '{format}'")]
    Parse { input: String, format: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("holiday lookup failed for {country}/{year}: {cause}")]
    HolidayLookup {
        country: CountryCode,
        year: i32,
        #[source]
        cause: LookupCause,
    },
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DateError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn lookup(country: &CountryCode, year: i32, cause: LookupCause) -> Self {
        Self::HolidayLookup {
            country: country.clone(),
            year,
            cause,
        }
    }
}

pub type Result<T, E = DateError> = std::result::Result<T, E>;
