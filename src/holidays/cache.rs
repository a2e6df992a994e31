use crate::model::{CountryCode, HolidaySet};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

type Key = (CountryCode, i32);

/// Cache (pays, année) → jours fériés, partageable entre threads.
///
/// Les entrées sont créées à la première consultation et vivent jusqu'à la fin
/// du processus, ou jusqu'à expiration du TTL s'il est configuré.
#[derive(Debug, Default)]
pub struct HolidayCache {
    entries: DashMap<Key, Entry>,
    ttl: Option<Duration>,
}

#[derive(Debug)]
struct Entry {
    set: Arc<HolidaySet>,
    fetched_at: Instant,
    fetched_wall: DateTime<Utc>,
}

/// Forme persistée d'une entrée du cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedHolidays {
    pub country: CountryCode,
    pub year: i32,
    pub fetched_at: DateTime<Utc>,
    pub holidays: HolidaySet,
}

impl HolidayCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn get(&self, country: &CountryCode, year: i32) -> Option<Arc<HolidaySet>> {
        let key = (country.clone(), year);
        if let Some(e) = self.entries.get(&key) {
            if !self.expired(e.fetched_at) {
                return Some(Arc::clone(&e.set));
            }
        }
        // une entrée fraîche insérée entre-temps par un autre thread est conservée
        self.entries.remove_if(&key, |_, e| self.expired(e.fetched_at));
        None
    }

    pub fn insert(&self, country: CountryCode, year: i32, set: HolidaySet) -> Arc<HolidaySet> {
        let set = Arc::new(set);
        self.entries.insert(
            (country, year),
            Entry {
                set: Arc::clone(&set),
                fetched_at: Instant::now(),
                fetched_wall: Utc::now(),
            },
        );
        set
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Copie des entrées encore valides, triée par (pays, année).
    pub fn snapshot(&self) -> Vec<CachedHolidays> {
        let mut out: Vec<CachedHolidays> = self
            .entries
            .iter()
            .filter(|e| !self.expired(e.value().fetched_at))
            .map(|e| {
                let (country, year) = e.key().clone();
                CachedHolidays {
                    country,
                    year,
                    fetched_at: e.value().fetched_wall,
                    holidays: (*e.value().set).clone(),
                }
            })
            .collect();
        out.sort_by(|a, b| (&a.country, a.year).cmp(&(&b.country, b.year)));
        out
    }

    /// Recharge des entrées persistées ; celles dont l'âge dépasse le TTL sont ignorées.
    /// Retourne le nombre d'entrées chargées.
    pub fn restore(&self, entries: Vec<CachedHolidays>) -> usize {
        let now = Utc::now();
        let mut loaded = 0;
        for cached in entries {
            let age = (now - cached.fetched_at).to_std().unwrap_or(Duration::ZERO);
            if self.ttl.is_some_and(|ttl| age > ttl) {
                continue;
            }
            let fetched_at = Instant::now().checked_sub(age).unwrap_or_else(Instant::now);
            self.entries.insert(
                (cached.country, cached.year),
                Entry {
                    set: Arc::new(cached.holidays),
                    fetched_at,
                    fetched_wall: cached.fetched_at,
                },
            );
            loaded += 1;
        }
        loaded
    }

    fn expired(&self, fetched_at: Instant) -> bool {
        self.ttl.is_some_and(|ttl| fetched_at.elapsed() > ttl)
    }
}
