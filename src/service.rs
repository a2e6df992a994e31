use crate::calendar;
use crate::config::DateConfig;
use crate::error::Result;
use crate::holidays::{CsvHolidaySource, HolidayProvider, HolidaySource, NagerDateSource};
use crate::model::{CountryCode, DateInput, DateOutput, DiffUnit, Offset, OutputMode, WeekStandard};
use crate::workdays::BusinessDays;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::path::Path;

/// Point d'entrée « un appel, une réponse » : configuration, fournisseur de jours
/// fériés (avec son cache) et moteur de jours ouvrés.
pub struct DateService {
    config: DateConfig,
    holidays: HolidayProvider,
}

impl DateService {
    /// Service adossé à l'API Nager.Date décrite par `config`.
    pub fn new(config: DateConfig) -> Result<Self> {
        let source = NagerDateSource::from_config(&config)?;
        Ok(Self::with_source(config, Box::new(source)))
    }

    /// Service hors-ligne adossé à un CSV `date,country[,global]`.
    pub fn from_csv<P: AsRef<Path>>(config: DateConfig, path: P) -> Result<Self> {
        let source = CsvHolidaySource::from_path(path)?;
        Ok(Self::with_source(config, Box::new(source)))
    }

    pub fn with_source(config: DateConfig, source: Box<dyn HolidaySource>) -> Self {
        let holidays = HolidayProvider::with_ttl(source, config.cache_ttl());
        Self { config, holidays }
    }

    pub fn config(&self) -> &DateConfig {
        &self.config
    }

    pub fn holidays(&self) -> &HolidayProvider {
        &self.holidays
    }

    pub fn business_days(&self) -> BusinessDays<'_> {
        BusinessDays::new(&self.holidays).with_max_walk_days(self.config.max_walk_days)
    }

    /// Convertit une entrée en `NaiveDateTime`. Le texte est lu avec `input_format`
    /// s'il est donné, sinon avec le format par défaut (heure optionnelle).
    pub fn normalize(
        &self,
        input: &DateInput,
        input_format: Option<&str>,
    ) -> Result<NaiveDateTime> {
        match input {
            DateInput::Now => Ok(Local::now().naive_local()),
            DateInput::DateTime(dt) => Ok(*dt),
            DateInput::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
            DateInput::Text(s) => match input_format {
                Some(fmt) => calendar::parse(s, fmt),
                None => calendar::parse_with_default(s, &self.config.default_input_format),
            },
        }
    }

    pub fn format(&self, dt: NaiveDateTime, output_format: Option<&str>) -> Result<String> {
        calendar::format(dt, output_format.unwrap_or(&self.config.default_output_format))
    }

    pub fn output(&self, dt: NaiveDateTime, mode: OutputMode) -> Result<DateOutput> {
        match mode {
            OutputMode::Text => Ok(DateOutput::Text(self.format(dt, None)?)),
            OutputMode::Value => Ok(DateOutput::Value(dt)),
        }
    }

    fn date(&self, input: &DateInput) -> Result<NaiveDateTime> {
        self.normalize(input, None)
    }

    pub fn offset(&self, input: &DateInput, off: Offset) -> Result<NaiveDateTime> {
        calendar::offset(self.date(input)?, off)
    }

    pub fn first_day_of_week(&self, input: &DateInput) -> Result<NaiveDateTime> {
        calendar::first_day_of_week(self.date(input)?)
    }

    pub fn last_day_of_week(&self, input: &DateInput) -> Result<NaiveDateTime> {
        calendar::last_day_of_week(self.date(input)?)
    }

    pub fn first_day_of_month(&self, input: &DateInput) -> Result<NaiveDateTime> {
        calendar::first_day_of_month(self.date(input)?)
    }

    pub fn last_day_of_month(&self, input: &DateInput) -> Result<NaiveDateTime> {
        calendar::last_day_of_month(self.date(input)?)
    }

    pub fn date_of_weekday(&self, input: &DateInput, weekday: Weekday) -> Result<NaiveDateTime> {
        calendar::date_of_weekday(self.date(input)?, weekday)
    }

    pub fn day_of_year(&self, input: &DateInput) -> Result<u32> {
        Ok(calendar::day_of_year(self.date(input)?))
    }

    pub fn week_of_year(&self, input: &DateInput, standard: WeekStandard) -> Result<u32> {
        Ok(calendar::week_of_year(self.date(input)?, standard))
    }

    pub fn dates_diff(&self, first: &DateInput, second: &DateInput, unit: DiffUnit) -> Result<i64> {
        Ok(calendar::dates_diff(self.date(first)?, self.date(second)?, unit))
    }

    /// `start_month` à `None` reprend `fiscal_start_month` de la configuration.
    pub fn fiscal_year(&self, input: &DateInput, start_month: Option<u32>) -> Result<i32> {
        let start = start_month.unwrap_or(self.config.fiscal_start_month);
        calendar::fiscal_year(self.date(input)?, start)
    }

    pub fn fiscal_month(&self, input: &DateInput, start_month: Option<u32>) -> Result<u32> {
        let start = start_month.unwrap_or(self.config.fiscal_start_month);
        calendar::fiscal_month(self.date(input)?, start)
    }

    /// Applique un calcul de jours ouvrés à la partie date, en conservant l'heure.
    fn on_date<F>(&self, input: &DateInput, f: F) -> Result<NaiveDateTime>
    where
        F: FnOnce(BusinessDays<'_>, NaiveDate) -> Result<NaiveDate>,
    {
        let dt = self.date(input)?;
        let day = f(self.business_days(), dt.date())?;
        Ok(day.and_time(dt.time()))
    }

    pub fn next_working_day(
        &self,
        input: &DateInput,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDateTime> {
        self.on_date(input, |bd, d| bd.next_working_day(d, country))
    }

    pub fn previous_working_day(
        &self,
        input: &DateInput,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDateTime> {
        self.on_date(input, |bd, d| bd.previous_working_day(d, country))
    }

    /// N-ième jour ouvré du mois de `input`.
    pub fn nth_working_day_of_month(
        &self,
        n: u32,
        input: &DateInput,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDateTime> {
        let dt = self.date(input)?;
        let day = self
            .business_days()
            .nth_working_day_of_month(n, dt.year(), dt.month(), country)?;
        Ok(day.and_time(NaiveTime::MIN))
    }

    pub fn working_day_offset(
        &self,
        days_offset: i64,
        input: &DateInput,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDateTime> {
        self.on_date(input, |bd, d| bd.working_day_offset(d, days_offset, country))
    }

    pub fn add_working_days(
        &self,
        input: &DateInput,
        days: i64,
        country: Option<&CountryCode>,
    ) -> Result<NaiveDateTime> {
        self.working_day_offset(days, input, country)
    }

    pub fn public_holidays(&self, country: &CountryCode, years: &[i32]) -> Result<Vec<NaiveDate>> {
        self.holidays.public_holidays(country, years)
    }

    pub fn is_public_holiday(&self, country: &CountryCode, input: &DateInput) -> Result<bool> {
        let dt = self.date(input)?;
        self.holidays.is_public_holiday(dt.date(), country)
    }
}
