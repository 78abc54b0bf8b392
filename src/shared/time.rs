use chrono::NaiveDate;

const ISO_DATE_LEN: usize = 10;

/// Utility for parsing `order_date` values into calendar dates.
pub struct DateParser;

impl DateParser {
    /// Parse an ISO calendar date (`YYYY-MM-DD`).
    ///
    /// A trailing time component separated by a space or `T` is accepted
    /// and dropped, matching SQLite's `date()` for local timestamps.
    pub fn parse_order_date(input: &str) -> Option<NaiveDate> {
        let s = input.trim();
        if s.len() < ISO_DATE_LEN || !s.is_char_boundary(ISO_DATE_LEN) {
            return None;
        }
        let (date_part, rest) = s.split_at(ISO_DATE_LEN);
        if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T')) {
            return None;
        }
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    /// Parse a user supplied date bound. Only the strict `YYYY-MM-DD` form is accepted.
    pub fn parse_bound(input: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{input}': {e}"))
    }
}
