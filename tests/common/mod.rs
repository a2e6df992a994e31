#![allow(dead_code)]
use chrono::{Datelike, NaiveDate};
use ouvrable::{CountryCode, DateError, HolidaySet, HolidaySource, LookupCause};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn pl() -> CountryCode {
    CountryCode::new("PL").unwrap()
}

/// Jours fériés nationaux polonais 2023-2024 (extrait suffisant pour les tests).
pub fn pl_holidays() -> Vec<NaiveDate> {
    vec![
        d(2023, 1, 1),
        d(2023, 1, 6),
        d(2023, 4, 10),
        d(2023, 5, 1),
        d(2023, 5, 3),
        d(2023, 8, 15),
        d(2023, 11, 1),
        d(2023, 11, 11),
        d(2023, 12, 25),
        d(2023, 12, 26),
        d(2024, 1, 1),
        d(2024, 1, 6),
        d(2024, 4, 1),
        d(2024, 5, 1),
        d(2024, 5, 3),
        d(2024, 12, 25),
        d(2024, 12, 26),
    ]
}

/// Source en mémoire qui compte ses appels ; seul `PL` est connu.
#[derive(Default)]
pub struct CountingSource {
    pub calls: AtomicUsize,
    pub years: Mutex<Vec<i32>>,
    pub holidays: Vec<NaiveDate>,
}

impl CountingSource {
    pub fn new(holidays: Vec<NaiveDate>) -> Self {
        Self {
            holidays,
            ..Self::default()
        }
    }
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HolidaySource for CountingSource {
    fn fetch(&self, country: &CountryCode, year: i32) -> Result<HolidaySet, DateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.years.lock().unwrap().push(year);
        if country.as_str() != "PL" {
            return Err(DateError::HolidayLookup {
                country: country.clone(),
                year,
                cause: LookupCause::UnknownCountry,
            });
        }
        Ok(self
            .holidays
            .iter()
            .copied()
            .filter(|h| h.year() == year)
            .collect())
    }
}

/// Source qui échoue `failures` fois avant de répondre.
pub struct FlakySource {
    pub failures: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FlakySource {
    pub fn new(failures: usize) -> Self {
        Self {
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }
}

impl HolidaySource for FlakySource {
    fn fetch(&self, country: &CountryCode, year: i32) -> Result<HolidaySet, DateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(DateError::HolidayLookup {
                country: country.clone(),
                year,
                cause: LookupCause::Status(503),
            });
        }
        Ok([d(year, 12, 25)].into_iter().collect())
    }
}

/// Source pathologique : tous les jours de l'année sont fériés.
pub struct EveryDaySource;

impl HolidaySource for EveryDaySource {
    fn fetch(&self, _country: &CountryCode, year: i32) -> Result<HolidaySet, DateError> {
        Ok(d(year, 1, 1)
            .iter_days()
            .take_while(|day| day.year() == year)
            .collect())
    }
}

/// Serveur HTTP local minimal. `respond(n)` fournit la réponse brute de la n-ième
/// connexion (à partir de 0) ; `None` laisse la connexion pendante.
pub struct StubServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubServer {
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(usize) -> Option<String> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/api/v3", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let response = respond(n);
                thread::spawn(move || answer(stream, response));
            }
        });
        Self { base_url, hits }
    }

    /// Toujours la même réponse.
    pub fn always(response: String) -> Self {
        Self::start(move |_| Some(response.clone()))
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn answer(mut stream: TcpStream, response: Option<String>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut line = String::new();
    while reader.read_line(&mut line).unwrap_or(0) > 0 {
        if line == "\r\n" {
            break;
        }
        line.clear();
    }
    match response {
        Some(raw) => {
            let _ = stream.write_all(raw.as_bytes());
        }
        None => thread::sleep(Duration::from_secs(3)),
    }
}

pub fn http_json(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

pub fn http_no_content() -> String {
    "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string()
}
