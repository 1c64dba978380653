//! Calendar arithmetic for time keys
//!
//! Day keys are `YYYYMMDD` integers. Week keys are `YYYYWW` MMWR epiweeks:
//! weeks start on Sunday and week 1 is the first week holding at least four
//! days of the calendar year, so a year has 52 or 53 weeks.

use chrono::{Datelike, Duration, NaiveDate};

/// Convert a `YYYYMMDD` key into a date, `None` if no such day exists
pub fn day_to_date(key: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt((key / 10_000) as i32, key / 100 % 100, key % 100)
}

/// Convert a date back into its `YYYYMMDD` key
pub fn date_to_day(date: NaiveDate) -> Option<u32> {
    let year = u32::try_from(date.year()).ok()?;
    Some(year * 10_000 + date.month() * 100 + date.day())
}

/// First day (a Sunday) of week 1 of the given epiyear
fn epiyear_start(year: i32) -> Option<NaiveDate> {
    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
    let back = i64::from(jan4.weekday().num_days_from_sunday());
    jan4.checked_sub_signed(Duration::days(back))
}

/// Number of epiweeks in the given epiyear (52 or 53)
pub fn weeks_in_year(year: i32) -> Option<u32> {
    let start = epiyear_start(year)?;
    let next = epiyear_start(year + 1)?;
    u32::try_from(next.signed_duration_since(start).num_days() / 7).ok()
}

/// Convert a `YYYYWW` key into the Sunday that starts the week
pub fn week_to_date(key: u32) -> Option<NaiveDate> {
    let year = (key / 100) as i32;
    let week = key % 100;
    if week == 0 || week > weeks_in_year(year)? {
        return None;
    }
    epiyear_start(year)?.checked_add_signed(Duration::weeks(i64::from(week - 1)))
}

/// Convert any date into the `YYYYWW` key of the epiweek containing it
pub fn date_to_week(date: NaiveDate) -> Option<u32> {
    let mut year = date.year();
    if date >= epiyear_start(year + 1)? {
        year += 1;
    } else if date < epiyear_start(year)? {
        year -= 1;
    }
    let start = epiyear_start(year)?;
    let week = date.signed_duration_since(start).num_days() / 7 + 1;
    let year = u32::try_from(year).ok()?;
    Some(year * 100 + u32::try_from(week).ok()?)
}

/// Inclusive number of days in `start..=end`
pub fn days_in_range(start: u32, end: u32) -> Option<u64> {
    let span = day_to_date(end)?
        .signed_duration_since(day_to_date(start)?)
        .num_days();
    u64::try_from(span + 1).ok()
}

/// Inclusive number of epiweeks in `start..=end`
pub fn weeks_in_range(start: u32, end: u32) -> Option<u64> {
    let span = week_to_date(end)?
        .signed_duration_since(week_to_date(start)?)
        .num_weeks();
    u64::try_from(span + 1).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_keys() {
        let date = day_to_date(20200419).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 4, 19).unwrap());
        assert_eq!(date_to_day(date), Some(20200419));
        assert!(day_to_date(20200230).is_none());
        assert!(day_to_date(20201301).is_none());
    }

    #[test]
    fn test_epiyear_boundaries() {
        // 2020 week 1 starts on Sunday 2019-12-29
        assert_eq!(
            week_to_date(202001),
            NaiveDate::from_ymd_opt(2019, 12, 29)
        );
        assert_eq!(weeks_in_year(2020), Some(53));
        assert_eq!(weeks_in_year(2021), Some(52));
        assert!(week_to_date(202153).is_none());
        assert!(week_to_date(202000).is_none());
    }

    #[test]
    fn test_date_to_week() {
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(date_to_week(d(2019, 12, 29)), Some(202001));
        assert_eq!(date_to_week(d(2021, 1, 2)), Some(202053));
        assert_eq!(date_to_week(d(2021, 1, 3)), Some(202101));
        assert_eq!(date_to_week(d(2020, 4, 18)), Some(202016));
        assert_eq!(date_to_week(d(2020, 4, 19)), Some(202017));
    }

    #[test]
    fn test_spans() {
        assert_eq!(days_in_range(20200419, 20200420), Some(2));
        assert_eq!(days_in_range(20200228, 20200301), Some(3));
        assert_eq!(weeks_in_range(202052, 202102), Some(4));
        assert_eq!(weeks_in_range(202001, 202001), Some(1));
    }
}
