//! Effective-date formats used by the various sources.
//!
//! All regulations take effect on the first of a month, so every parser here
//! returns the first day of the month it finds.

use chrono::NaiveDate;

use crate::CoreError;

/// `MMM-YY`, e.g. `Jan-25` → 2025-01-01 (Asia card list pages).
pub fn parse_month_year(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(&format!("01-{}", s.trim()), "%d-%b-%y").map_err(|_| {
        CoreError::Date {
            input: s.to_string(),
            expected: "MMM-YY",
        }
    })
}

/// `YYYYMM` as an integer, e.g. 202504 → 2025-04-01 (HK CSV names).
pub fn from_yyyymm(yyyymm: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt((yyyymm / 100) as i32, yyyymm % 100, 1).ok_or(CoreError::Date {
        input: yyyymm.to_string(),
        expected: "YYYYMM",
    })
}

/// `<label>：YYYY/M`, e.g. `禁限卡表：2025/4` → 2025-04-01 (Simplified Chinese API).
pub fn parse_labelled_year_month(s: &str) -> Result<NaiveDate, CoreError> {
    let err = || CoreError::Date {
        input: s.to_string(),
        expected: "<label>：YYYY/M",
    };
    let (_, after_colon) = s.split_once('：').ok_or_else(err)?;
    let (year, rest) = after_colon.split_once('/').ok_or_else(err)?;
    let year: i32 = year.trim().parse().map_err(|_| err())?;
    let month: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let month: u32 = month.parse().map_err(|_| err())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(err)
}

/// Parse a `YYYY-MM-DD` file stem.
pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_year() {
        assert_eq!(parse_month_year("Jan-25").unwrap(), ymd(2025, 1, 1));
        assert_eq!(parse_month_year("Oct-24").unwrap(), ymd(2024, 10, 1));
        assert!(parse_month_year("2025-01").is_err());
    }

    #[test]
    fn yyyymm() {
        assert_eq!(from_yyyymm(202504).unwrap(), ymd(2025, 4, 1));
        assert_eq!(from_yyyymm(201901).unwrap(), ymd(2019, 1, 1));
        assert!(from_yyyymm(202513).is_err());
    }

    #[test]
    fn labelled_year_month() {
        assert_eq!(
            parse_labelled_year_month("禁限卡表：2025/4").unwrap(),
            ymd(2025, 4, 1)
        );
        assert_eq!(
            parse_labelled_year_month("禁限卡表：2024/10生效").unwrap(),
            ymd(2024, 10, 1)
        );
        assert!(parse_labelled_year_month("禁限卡表 2025/4").is_err());
    }

    #[test]
    fn iso() {
        assert_eq!(parse_iso("2025-01-01"), Some(ymd(2025, 1, 1)));
        assert_eq!(parse_iso("2025-1-1"), None);
        assert_eq!(parse_iso("current"), None);
    }
}
