use crate::shared::time::DateParser;
use chrono::NaiveDate;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn parses_plain_iso_date() {
    assert_eq!(
        DateParser::parse_order_date("2023-01-02"),
        Some(ymd(2023, 1, 2))
    );
}

#[test]
fn drops_time_component_after_space_or_t() {
    assert_eq!(
        DateParser::parse_order_date("2023-01-02 13:45:00"),
        Some(ymd(2023, 1, 2))
    );
    assert_eq!(
        DateParser::parse_order_date("2023-01-02T00:00:00"),
        Some(ymd(2023, 1, 2))
    );
}

#[test]
fn trims_surrounding_whitespace() {
    assert_eq!(
        DateParser::parse_order_date("  2023-12-31 "),
        Some(ymd(2023, 12, 31))
    );
}

#[test]
fn rejects_garbage_and_short_input() {
    assert_eq!(DateParser::parse_order_date(""), None);
    assert_eq!(DateParser::parse_order_date("2023-1-2"), None);
    assert_eq!(DateParser::parse_order_date("2023-02-30"), None);
    assert_eq!(DateParser::parse_order_date("2023-01-02x"), None);
    assert_eq!(DateParser::parse_order_date("yesterday!!"), None);
}

#[test]
fn bound_parsing_is_strict() {
    assert_eq!(DateParser::parse_bound("2024-03-01"), Ok(ymd(2024, 3, 1)));
    let err = DateParser::parse_bound("2024-03-01 10:00").unwrap_err();
    assert!(err.contains("invalid date"));
}
