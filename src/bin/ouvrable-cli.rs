#![forbid(unsafe_code)]
use anyhow::Result;
use chrono::{Datelike, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use ouvrable::{
    holidays::{HolidayStore, JsonHolidayStore},
    model::{CountryCode, DateInput, Offset, WeekStandard},
    DateConfig, DateService,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de calcul de dates et de jours ouvrés
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Configuration JSON (facultative)
    #[arg(long, global = true)]
    config: Option<String>,

    /// CSV de jours fériés `date,country[,global]` à la place de l'API
    #[arg(long, global = true)]
    holidays_csv: Option<String>,

    /// Cache JSON des jours fériés, relu au démarrage et réécrit à la fin
    #[arg(long, global = true)]
    cache_file: Option<String>,

    /// Format strftime des dates en entrée
    #[arg(long, global = true)]
    input_format: Option<String>,

    /// Format strftime des dates en sortie
    #[arg(long, global = true)]
    output_format: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Jour ouvré suivant
    Next {
        #[arg(long)]
        date: String,
        #[arg(long)]
        country: Option<String>,
    },

    /// Jour ouvré précédent
    Previous {
        #[arg(long)]
        date: String,
        #[arg(long)]
        country: Option<String>,
    },

    /// N-ième jour ouvré d'un mois
    Nth {
        #[arg(long)]
        n: u32,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        country: Option<String>,
    },

    /// Décalage en jours ouvrés (négatif pour reculer)
    Offset {
        #[arg(long)]
        date: String,
        #[arg(long, allow_negative_numbers = true)]
        days: i64,
        #[arg(long)]
        country: Option<String>,
    },

    /// Décalage calendaire
    Shift {
        #[arg(long)]
        date: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        years: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        months: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        weeks: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        days: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        hours: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        minutes: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        seconds: i64,
    },

    /// Lister les jours fériés
    Holidays {
        #[arg(long)]
        country: String,
        /// liste "2023,2024,..."
        #[arg(long, value_delimiter = ',', required = true)]
        years: Vec<i32>,
    },

    /// Indiquer si une date est fériée
    IsHoliday {
        #[arg(long)]
        date: String,
        #[arg(long)]
        country: String,
    },

    /// Métadonnées calendaires d'une date
    Info {
        #[arg(long)]
        date: String,
        /// Premier mois de l'année fiscale (défaut : configuration)
        #[arg(long)]
        fiscal_start: Option<u32>,
    },
}

fn country(raw: Option<&str>) -> Result<Option<CountryCode>> {
    Ok(raw.map(CountryCode::new).transpose()?)
}

fn build_service(cli: &Cli) -> Result<DateService> {
    let mut config = match &cli.config {
        Some(path) => DateConfig::from_json_file(path)?,
        None => DateConfig::default(),
    };
    if let Some(fmt) = &cli.input_format {
        config.default_input_format = fmt.clone();
    }
    if let Some(fmt) = &cli.output_format {
        config.default_output_format = fmt.clone();
    }
    config.validate()?;

    let service = match &cli.holidays_csv {
        Some(path) => DateService::from_csv(config, path)?,
        None => DateService::new(config)?,
    };
    Ok(service)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let service = build_service(&cli)?;
    let store = cli.cache_file.as_ref().map(JsonHolidayStore::open);
    if let Some(store) = &store {
        service.holidays().cache().restore(store.load()?);
    }

    // le cache est sauvegardé même si la commande échoue
    let outcome = run(&cli.cmd, &service);
    if let Some(store) = &store {
        store.save(&service.holidays().cache().snapshot())?;
    }
    outcome
}

fn run(cmd: &Commands, service: &DateService) -> Result<()> {
    let show = |dt: NaiveDateTime| -> Result<()> {
        println!("{}", service.format(dt, None)?);
        Ok(())
    };

    match cmd {
        Commands::Next { date, country: c } => {
            let c = country(c.as_deref())?;
            show(service.next_working_day(&DateInput::from(date.as_str()), c.as_ref())?)?;
        }
        Commands::Previous { date, country: c } => {
            let c = country(c.as_deref())?;
            show(service.previous_working_day(&DateInput::from(date.as_str()), c.as_ref())?)?;
        }
        Commands::Nth {
            n,
            month,
            year,
            country: c,
        } => {
            let c = country(c.as_deref())?;
            let day = service
                .business_days()
                .nth_working_day_of_month(*n, *year, *month, c.as_ref())?;
            println!("{}", service.format(day.and_time(NaiveTime::MIN), None)?);
        }
        Commands::Offset {
            date,
            days,
            country: c,
        } => {
            let c = country(c.as_deref())?;
            show(service.working_day_offset(*days, &DateInput::from(date.as_str()), c.as_ref())?)?;
        }
        Commands::Shift {
            date,
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
        } => {
            let off = Offset {
                years: *years,
                months: *months,
                weeks: *weeks,
                days: *days,
                hours: *hours,
                minutes: *minutes,
                seconds: *seconds,
            };
            show(service.offset(&DateInput::from(date.as_str()), off)?)?;
        }
        Commands::Holidays { country: c, years } => {
            let c = CountryCode::new(c)?;
            for day in service.public_holidays(&c, years)? {
                println!("{}", service.format(day.and_time(NaiveTime::MIN), None)?);
            }
        }
        Commands::IsHoliday { date, country: c } => {
            let c = CountryCode::new(c)?;
            let yes = service.is_public_holiday(&c, &DateInput::from(date.as_str()))?;
            println!("{yes}");
        }
        Commands::Info { date, fiscal_start } => {
            let input = DateInput::from(date.as_str());
            let dt = service.normalize(&input, None)?;
            let fmt = |dt: NaiveDateTime| service.format(dt, None);
            println!("date: {}", fmt(dt)?);
            println!("weekday: {}", dt.weekday());
            println!("day_of_year: {}", service.day_of_year(&input)?);
            println!("week_iso: {}", service.week_of_year(&input, WeekStandard::Iso)?);
            println!("week_us: {}", service.week_of_year(&input, WeekStandard::Us)?);
            println!(
                "week_monday: {}",
                service.week_of_year(&input, WeekStandard::Monday)?
            );
            println!("fiscal_year: {}", service.fiscal_year(&input, *fiscal_start)?);
            println!("fiscal_month: {}", service.fiscal_month(&input, *fiscal_start)?);
            println!(
                "first_day_of_month: {}",
                fmt(service.first_day_of_month(&input)?)?
            );
            println!("last_day_of_month: {}", fmt(service.last_day_of_month(&input)?)?);
            println!("first_day_of_week: {}", fmt(service.first_day_of_week(&input)?)?);
            println!("last_day_of_week: {}", fmt(service.last_day_of_week(&input)?)?);
        }
    }
    Ok(())
}
