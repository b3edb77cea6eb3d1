//! Fiscal quarter labels.
//!
//! The fiscal year begins in February: fiscal month 0 is calendar February, so
//! January closes out the previous fiscal year. Renewal dates are labelled
//! `FY{yy} Q{1-4}` for export and display.

use chrono::{Datelike, NaiveDate};

/// Fiscal-quarter label for a contract end date, e.g. `FY24 Q3`.
pub fn fiscal_quarter_label(date: NaiveDate) -> String {
    // Shift months so February maps to fiscal month 0.
    let fiscal_month = (date.month0() + 11) % 12;
    let fiscal_quarter = fiscal_month / 3 + 1;

    let fiscal_year = if date.month() == 1 {
        date.year() - 1
    } else {
        date.year()
    };

    format!("FY{:02} Q{}", fiscal_year.rem_euclid(100), fiscal_quarter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_february_opens_q1() {
        assert_eq!(fiscal_quarter_label(d(2024, 2, 1)), "FY24 Q1");
        assert_eq!(fiscal_quarter_label(d(2024, 4, 30)), "FY24 Q1");
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(fiscal_quarter_label(d(2024, 5, 1)), "FY24 Q2");
        assert_eq!(fiscal_quarter_label(d(2024, 8, 15)), "FY24 Q3");
        assert_eq!(fiscal_quarter_label(d(2024, 11, 1)), "FY24 Q4");
    }

    #[test]
    fn test_january_belongs_to_prior_fiscal_year() {
        assert_eq!(fiscal_quarter_label(d(2025, 1, 15)), "FY24 Q4");
    }
}
