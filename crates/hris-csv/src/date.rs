use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a spreadsheet date cell, coercing anything unreadable to `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    .or_else(|| {
      DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
    })
    .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
  }

  #[test]
  fn accepts_common_spreadsheet_formats() {
    assert_eq!(parse_date("2023-01-15"), ymd(2023, 1, 15));
    assert_eq!(parse_date("01/15/2023"), ymd(2023, 1, 15));
    assert_eq!(parse_date("2023/01/15"), ymd(2023, 1, 15));
    assert_eq!(parse_date("2023-01-15 00:00:00"), ymd(2023, 1, 15));
    assert_eq!(parse_date("2023-01-15T09:30:00"), ymd(2023, 1, 15));
    assert_eq!(parse_date("2023-01-15T09:30:00+02:00"), ymd(2023, 1, 15));
  }

  #[test]
  fn unreadable_dates_are_coerced_to_none() {
    assert_eq!(parse_date(""), None);
    assert_eq!(parse_date("TBD"), None);
    assert_eq!(parse_date("2023-02-30"), None);
  }
}
