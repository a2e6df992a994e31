use super::CachedHolidays;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait HolidayStore {
    /// Charge les entrées persistées du cache.
    fn load(&self) -> anyhow::Result<Vec<CachedHolidays>>;
    /// Sauvegarde de manière atomique.
    fn save(&self, entries: &[CachedHolidays]) -> anyhow::Result<()>;
}

pub struct JsonHolidayStore {
    path: PathBuf,
}

impl JsonHolidayStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HolidayStore for JsonHolidayStore {
    /// Un fichier absent équivaut à un cache vide.
    fn load(&self) -> anyhow::Result<Vec<CachedHolidays>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let entries = serde_json::from_slice(&data)
            .with_context(|| format!("parsing holiday cache {}", self.path.display()))?;
        Ok(entries)
    }

    fn save(&self, entries: &[CachedHolidays]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(entries)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
