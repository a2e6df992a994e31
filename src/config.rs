use anyhow::Context;
use crate::workdays::DEFAULT_MAX_WALK_DAYS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_FORMAT: &str = "%d.%m.%Y";
pub const NAGER_DATE_V3: &str = "https://date.nager.at/api/v3";

/// Configuration du service de dates. Tous les champs ont une valeur par défaut,
/// un fichier JSON partiel suffit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    pub default_input_format: String,
    pub default_output_format: String,
    pub api_base_url: String,
    pub api_timeout_seconds: u64,
    pub retry_transient: bool,
    pub cache_ttl_seconds: Option<u64>,
    /// Plafond de jours parcourus pour trouver un seul jour ouvré.
    pub max_walk_days: NonZeroU32,
    pub fiscal_start_month: u32,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            default_input_format: DEFAULT_FORMAT.to_string(),
            default_output_format: DEFAULT_FORMAT.to_string(),
            api_base_url: NAGER_DATE_V3.to_string(),
            api_timeout_seconds: 10,
            retry_transient: true,
            cache_ttl_seconds: None,
            max_walk_days: DEFAULT_MAX_WALK_DAYS,
            fiscal_start_month: 4,
        }
    }
}

impl DateConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: DateConfig = serde_json::from_slice(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_input_format.trim().is_empty() {
            anyhow::bail!("default_input_format cannot be empty");
        }
        if self.default_output_format.trim().is_empty() {
            anyhow::bail!("default_output_format cannot be empty");
        }
        if self.api_timeout_seconds == 0 {
            anyhow::bail!("api_timeout_seconds must be > 0");
        }
        if !(1..=12).contains(&self.fiscal_start_month) {
            anyhow::bail!("fiscal_start_month must be within 1..=12");
        }
        Ok(())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_seconds.map(Duration::from_secs)
    }
}
