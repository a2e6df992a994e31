#![forbid(unsafe_code)]
mod common;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use common::{d, pl, pl_holidays, CountingSource};
use ouvrable::calendar;
use ouvrable::{
    parse_weekday, DateConfig, DateError, DateInput, DateOutput, DateService, DiffUnit, Offset,
    OutputMode, WeekStandard,
};
use std::fs;
use tempfile::tempdir;

fn at(y: i32, m: u32, day: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, s).unwrap()
}

fn midnight(y: i32, m: u32, day: u32) -> NaiveDateTime {
    at(y, m, day, 0, 0, 0)
}

fn service() -> DateService {
    DateService::with_source(
        DateConfig::default(),
        Box::new(CountingSource::new(pl_holidays())),
    )
}

#[test]
fn parse_default_format_with_optional_time() {
    assert_eq!(
        calendar::parse_with_default("10.11.2023", "%d.%m.%Y").unwrap(),
        midnight(2023, 11, 10)
    );
    assert_eq!(
        calendar::parse_with_default("10.11.2023 14:30:05", "%d.%m.%Y").unwrap(),
        at(2023, 11, 10, 14, 30, 5)
    );
    assert_eq!(
        calendar::parse("2023-11-10", "%Y-%m-%d").unwrap(),
        midnight(2023, 11, 10)
    );
}

#[test]
fn parse_errors_name_input_and_format() {
    let err = calendar::parse_with_default("2023-11-10", "%d.%m.%Y").unwrap_err();
    match err {
        DateError::Parse { input, format } => {
            assert_eq!(input, "2023-11-10");
            assert_eq!(format, "%d.%m.%Y");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // 31 février
    assert!(calendar::parse("31.02.2023", "%d.%m.%Y").is_err());
}

#[test]
fn format_rejects_unknown_specifier() {
    let dt = at(2023, 11, 10, 8, 0, 0);
    assert_eq!(calendar::format(dt, "%d.%m.%Y %H:%M").unwrap(), "10.11.2023 08:00");
    assert!(matches!(
        calendar::format(dt, "%Q"),
        Err(DateError::InvalidArgument(_))
    ));
}

#[test]
fn offset_clamps_month_end() {
    assert_eq!(
        calendar::offset(midnight(2024, 1, 31), Offset::months(1)).unwrap(),
        midnight(2024, 2, 29)
    );
    let back_a_year = Offset {
        years: -1,
        ..Offset::default()
    };
    assert_eq!(
        calendar::offset(midnight(2024, 2, 29), back_a_year).unwrap(),
        midnight(2023, 2, 28)
    );
    let mixed = Offset {
        weeks: 1,
        days: -2,
        hours: 25,
        minutes: -30,
        seconds: 15,
        ..Offset::default()
    };
    assert_eq!(
        calendar::offset(midnight(2024, 3, 1), mixed).unwrap(),
        at(2024, 3, 7, 0, 30, 15)
    );
    assert!(calendar::offset(midnight(2024, 3, 1), Offset::days(i64::MAX)).is_err());
}

#[test]
fn week_and_month_bounds() {
    let fri = at(2024, 3, 1, 9, 15, 0);
    assert_eq!(calendar::first_day_of_week(fri).unwrap(), at(2024, 2, 26, 9, 15, 0));
    assert_eq!(calendar::last_day_of_week(fri).unwrap(), at(2024, 3, 3, 9, 15, 0));
    assert_eq!(calendar::first_day_of_month(fri).unwrap(), at(2024, 3, 1, 9, 15, 0));
    assert_eq!(calendar::last_day_of_month(fri).unwrap(), at(2024, 3, 31, 9, 15, 0));
    assert_eq!(
        calendar::last_day_of_month(midnight(2023, 2, 10)).unwrap(),
        midnight(2023, 2, 28)
    );
    assert_eq!(
        calendar::last_day_of_month(midnight(2024, 2, 10)).unwrap(),
        midnight(2024, 2, 29)
    );
    assert_eq!(calendar::days_in_month(2023, 12).unwrap(), 31);
    assert_eq!(
        calendar::date_of_weekday(fri, Weekday::Wed).unwrap(),
        at(2024, 2, 28, 9, 15, 0)
    );
    assert_eq!(parse_weekday("sun").unwrap(), Weekday::Sun);
    assert!(parse_weekday("xyz").is_err());
}

#[test]
fn day_and_week_numbers() {
    assert_eq!(calendar::day_of_year(midnight(2024, 12, 31)), 366);
    assert_eq!(calendar::day_of_year(midnight(2024, 3, 1)), 61);

    // 01.01.2023 est un dimanche
    let sunday = midnight(2023, 1, 1);
    assert_eq!(calendar::week_of_year(sunday, WeekStandard::Iso), 52);
    assert_eq!(calendar::week_of_year(sunday, WeekStandard::Us), 1);
    assert_eq!(calendar::week_of_year(sunday, WeekStandard::Monday), 0);

    let monday = midnight(2023, 1, 2);
    assert_eq!(calendar::week_of_year(monday, WeekStandard::Iso), 1);
    assert_eq!(calendar::week_of_year(monday, WeekStandard::Us), 1);
    assert_eq!(calendar::week_of_year(monday, WeekStandard::Monday), 1);

    let dec = midnight(2023, 12, 31);
    assert_eq!(calendar::week_of_year(dec, WeekStandard::Us), 53);
    assert_eq!(calendar::week_of_year(dec, WeekStandard::Monday), 52);
}

#[test]
fn dates_diff_is_signed_and_truncated() {
    let a = midnight(2024, 1, 1);
    let b = at(2024, 1, 3, 12, 0, 0);
    assert_eq!(calendar::dates_diff(a, b, DiffUnit::Days), 2);
    assert_eq!(calendar::dates_diff(a, b, DiffUnit::Hours), 60);
    assert_eq!(calendar::dates_diff(a, b, DiffUnit::Minutes), 3600);
    assert_eq!(calendar::dates_diff(b, a, DiffUnit::Days), -2);
    assert_eq!(calendar::dates_diff(a, a, DiffUnit::Seconds), 0);
    assert_eq!("hours".parse::<DiffUnit>().unwrap(), DiffUnit::Hours);
}

#[test]
fn fiscal_period() {
    let may = midnight(2024, 5, 15);
    let march = midnight(2024, 3, 15);
    assert_eq!(calendar::fiscal_year(may, 4).unwrap(), 2025);
    assert_eq!(calendar::fiscal_month(may, 4).unwrap(), 2);
    assert_eq!(calendar::fiscal_year(march, 4).unwrap(), 2024);
    assert_eq!(calendar::fiscal_month(march, 4).unwrap(), 12);
    assert_eq!(calendar::fiscal_year(may, 1).unwrap(), 2024);
    assert_eq!(calendar::fiscal_month(may, 1).unwrap(), 5);
    assert!(matches!(
        calendar::fiscal_year(may, 13),
        Err(DateError::InvalidArgument(_))
    ));
    assert!(calendar::fiscal_month(may, 0).is_err());
}

#[test]
fn service_accepts_text_and_values() {
    let svc = service();
    let from_text = svc
        .next_working_day(&"10.11.2023".into(), Some(&pl()))
        .unwrap();
    let from_date = svc
        .next_working_day(&DateInput::Date(d(2023, 11, 10)), Some(&pl()))
        .unwrap();
    assert_eq!(from_text, midnight(2023, 11, 13));
    assert_eq!(from_text, from_date);

    // l'heure est conservée
    assert_eq!(
        svc.next_working_day(&"10.11.2023 08:30:00".into(), None)
            .unwrap(),
        at(2023, 11, 13, 8, 30, 0)
    );
    assert_eq!(
        svc.working_day_offset(5, &"01.03.2024".into(), None).unwrap(),
        midnight(2024, 3, 8)
    );
    assert_eq!(
        svc.add_working_days(&"01.03.2024".into(), 5, None).unwrap(),
        midnight(2024, 3, 8)
    );
    assert_eq!(
        svc.nth_working_day_of_month(1, &"17.11.2023".into(), None)
            .unwrap(),
        midnight(2023, 11, 1)
    );
    assert!(svc
        .is_public_holiday(&pl(), &"25.12.2023".into())
        .unwrap());
    assert_eq!(
        svc.previous_working_day(&"13.11.2023".into(), Some(&pl()))
            .unwrap(),
        midnight(2023, 11, 10)
    );
}

#[test]
fn service_output_modes() {
    let svc = service();
    let dt = svc.offset(&"31.01.2024".into(), Offset::months(1)).unwrap();
    assert_eq!(
        svc.output(dt, OutputMode::Text).unwrap(),
        DateOutput::Text("29.02.2024".to_string())
    );
    assert_eq!(svc.output(dt, OutputMode::Value).unwrap(), DateOutput::Value(dt));
    assert_eq!(svc.format(dt, Some("%Y/%m/%d")).unwrap(), "2024/02/29");
    assert_eq!(
        svc.normalize(&"2024-02-29".into(), Some("%Y-%m-%d")).unwrap(),
        dt
    );
    assert!(matches!(
        svc.normalize(&"2024-02-29".into(), None),
        Err(DateError::Parse { .. })
    ));
}

#[test]
fn service_calendar_helpers_use_config() {
    let svc = service();
    let input: DateInput = "15.05.2024".into();
    assert_eq!(svc.fiscal_year(&input, None).unwrap(), 2025);
    assert_eq!(svc.fiscal_month(&input, Some(1)).unwrap(), 5);
    assert_eq!(svc.day_of_year(&input).unwrap(), 136);
    assert_eq!(svc.week_of_year(&input, WeekStandard::Iso).unwrap(), 20);
    assert_eq!(
        svc.dates_diff(&input, &DateInput::Date(d(2024, 5, 20)), DiffUnit::Days)
            .unwrap(),
        5
    );
    assert_eq!(
        svc.date_of_weekday(&input, Weekday::Mon).unwrap(),
        midnight(2024, 5, 13)
    );
    assert!(svc.normalize(&DateInput::Now, None).is_ok());
}

#[test]
fn config_loads_partial_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"default_output_format": "%Y-%m-%d", "cache_ttl_seconds": 60}"#,
    )
    .unwrap();
    let cfg = DateConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.default_output_format, "%Y-%m-%d");
    assert_eq!(cfg.default_input_format, "%d.%m.%Y");
    assert_eq!(cfg.max_walk_days.get(), 400);
    assert_eq!(cfg.cache_ttl().unwrap().as_secs(), 60);

    fs::write(&path, r#"{"fiscal_start_month": 13}"#).unwrap();
    assert!(DateConfig::from_json_file(&path).is_err());
    fs::write(&path, r#"{"max_walk_days": 0}"#).unwrap();
    assert!(DateConfig::from_json_file(&path).is_err());
}

#[test]
fn service_from_csv_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.csv");
    fs::write(&path, "date,country\n2023-11-13,PL\n").unwrap();
    let svc = DateService::from_csv(DateConfig::default(), &path).unwrap();
    assert_eq!(
        svc.next_working_day(&"10.11.2023".into(), Some(&pl())).unwrap(),
        midnight(2023, 11, 14)
    );

    let missing = DateService::from_csv(DateConfig::default(), dir.path().join("none.csv"));
    assert!(matches!(missing, Err(DateError::Other(_))));

    fs::write(&path, "date,country\n13.11.2023,PL\n").unwrap();
    match DateService::from_csv(DateConfig::default(), &path) {
        Err(DateError::Other(err)) => assert!(err.to_string().contains("row 2"), "{err}"),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("bad row accepted"),
    }
}

#[test]
fn date_input_conversions() {
    let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    assert_eq!(DateInput::from(day), DateInput::Date(day));
    assert_eq!(
        DateInput::from(String::from("02.01.2024")),
        DateInput::Text("02.01.2024".into())
    );
}
