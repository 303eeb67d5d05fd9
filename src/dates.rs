use chrono::{Datelike, NaiveDate};
use log::error;

/// Parse a `YYYY-MM-DD` string. Malformed input is logged and mapped to
/// `None`; callers treat a `None` as "value unavailable", not as an error.
pub fn generate_date_from_string(date_str: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            error!("unable to parse date from {date_str:?}: {e}");
            None
        }
    }
}

/// Federal fiscal year of a date: October and later belong to the next
/// calendar year.
pub fn fiscal_year_of(date: NaiveDate) -> i32 {
    if date.month() > 9 {
        date.year() + 1
    } else {
        date.year()
    }
}

/// True when `start`/`end` are the first and last day of a calendar month.
pub fn dates_are_month_bookends(start: NaiveDate, end: NaiveDate) -> bool {
    let last_day = match end.month() {
        12 => NaiveDate::from_ymd_opt(end.year() + 1, 1, 1),
        m => NaiveDate::from_ymd_opt(end.year(), m + 1, 1),
    }
    .map(|d| d.pred_opt().map(|p| p.day()).unwrap_or(0))
    .unwrap_or(0);
    start.day() == 1 && end.day() == last_day
}

/// True when the two dates are at most one year apart, counting a leap day
/// inside the range as a free day.
pub fn within_one_year(d1: NaiveDate, d2: NaiveDate) -> bool {
    let (lo, hi) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
    if hi.year() - lo.year() > 1 {
        return false;
    }
    let mut days_diff = (hi - lo).num_days();
    for year in lo.year()..=hi.year() {
        if let Some(leap_date) = NaiveDate::from_ymd_opt(year, 2, 29) {
            if lo <= leap_date && leap_date <= hi {
                days_diff -= 1;
            }
        }
    }
    days_diff <= 365
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_generate_date_from_string() {
        assert_eq!(generate_date_from_string("2020-03-15"), Some(d(2020, 3, 15)));
        assert_eq!(generate_date_from_string("not-a-date"), None);
        assert_eq!(generate_date_from_string("2020-13-01"), None);
        assert_eq!(generate_date_from_string(""), None);
    }

    #[test]
    fn test_fiscal_year_boundary() {
        assert_eq!(fiscal_year_of(d(2020, 9, 30)), 2020);
        assert_eq!(fiscal_year_of(d(2020, 10, 1)), 2021);
        assert_eq!(fiscal_year_of(d(2020, 1, 15)), 2020);
    }

    #[test]
    fn test_month_bookends() {
        assert!(dates_are_month_bookends(d(2020, 2, 1), d(2020, 2, 29)));
        assert!(dates_are_month_bookends(d(2021, 12, 1), d(2021, 12, 31)));
        assert!(!dates_are_month_bookends(d(2021, 2, 1), d(2021, 2, 27)));
        assert!(!dates_are_month_bookends(d(2021, 2, 2), d(2021, 2, 28)));
    }

    #[test]
    fn test_within_one_year() {
        assert!(within_one_year(d(2019, 3, 1), d(2020, 3, 1)));
        // 2020 is a leap year and Feb 29 falls inside the range
        assert!(within_one_year(d(2019, 6, 1), d(2020, 6, 1)));
        assert!(!within_one_year(d(2019, 6, 1), d(2020, 6, 2)));
        assert!(!within_one_year(d(2018, 1, 1), d(2020, 1, 1)));
    }
}
