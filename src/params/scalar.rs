//! Day and week token parsing
//!
//! # Formats
//!
//! ```text
//! day:   YYYYMMDD | YYYY-MM-DD | YYYYMMDD-YYYYMMDD | YYYY-MM-DD--YYYY-MM-DD
//! week:  YYYYWW   | YYYYWW-YYYYWW
//! ```
//!
//! The number of dashes selects the candidate format. ISO spellings lose
//! their hyphens, so `2020-04-19` and `20200419` both become `20200419`.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use crate::params::calendar;
use crate::params::error::{ParamError, ParamResult};
use crate::params::time::TimeValue;

const WEEK_FORMATS: &str = "a known format YYYYWW or YYYYWW-YYYYWW";
const DAY_FORMATS: &str =
    "a known format YYYYMMDD, YYYY-MM-DD, YYYYMMDD-YYYYMMDD, or YYYY-MM-DD--YYYY-MM-DD";

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
}

static WEEK: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{6}$"));
static WEEK_RANGE: LazyLock<Regex> = LazyLock::new(|| compile(r"^([0-9]{6})-([0-9]{6})$"));
static DAY: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{8}$"));
static ISO_DAY: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$"));
static DAY_RANGE: LazyLock<Regex> = LazyLock::new(|| compile(r"^([0-9]{8})-([0-9]{8})$"));
static ISO_DAY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})--([0-9]{4}-[0-9]{2}-[0-9]{2})$")
});

/// Turn raw bounds into a time value
///
/// Equal bounds collapse to a scalar; an end before the start is an error.
pub fn normalize_range(start: u32, end: u32) -> ParamResult<TimeValue> {
    match end.cmp(&start) {
        Ordering::Equal => Ok(TimeValue::Single(start)),
        Ordering::Greater => Ok(TimeValue::Range(start, end)),
        Ordering::Less => Err(ParamError::RangeInverted { start, end }),
    }
}

/// Parse a week token (`YYYYWW` or `YYYYWW-YYYYWW`)
pub fn parse_week_value(token: &str) -> ParamResult<TimeValue> {
    let invalid = || ParamError::format(token, WEEK_FORMATS);

    match token.matches('-').count() {
        0 if WEEK.is_match(token) => Ok(TimeValue::Single(week_key(token, token)?)),
        1 => {
            let caps = WEEK_RANGE.captures(token).ok_or_else(invalid)?;
            normalize_range(week_key(token, &caps[1])?, week_key(token, &caps[2])?)
        }
        _ => Err(invalid()),
    }
}

/// Parse a day token in any of the four day formats
pub fn parse_day_value(token: &str) -> ParamResult<TimeValue> {
    let invalid = || ParamError::format(token, DAY_FORMATS);

    match token.matches('-').count() {
        0 if DAY.is_match(token) => Ok(TimeValue::Single(day_key(token, token)?)),
        2 if ISO_DAY.is_match(token) => Ok(TimeValue::Single(day_key(token, token)?)),
        1 => {
            let caps = DAY_RANGE.captures(token).ok_or_else(invalid)?;
            normalize_range(day_key(token, &caps[1])?, day_key(token, &caps[2])?)
        }
        6 => {
            let caps = ISO_DAY_RANGE.captures(token).ok_or_else(invalid)?;
            normalize_range(day_key(token, &caps[1])?, day_key(token, &caps[2])?)
        }
        _ => Err(invalid()),
    }
}

/// Week key from one bound of `token`; errors echo the whole token
fn week_key(token: &str, digits: &str) -> ParamResult<u32> {
    let key = digits
        .parse::<u32>()
        .map_err(|_| ParamError::format(token, WEEK_FORMATS))?;
    match calendar::week_to_date(key) {
        Some(_) => Ok(key),
        None => Err(ParamError::format(
            token,
            format!("a valid epiweek in {}", WEEK_FORMATS),
        )),
    }
}

/// Day key from one `YYYYMMDD` or `YYYY-MM-DD` bound of `token`
fn day_key(token: &str, digits: &str) -> ParamResult<u32> {
    let compact = digits.replace('-', "");
    let key = compact
        .parse::<u32>()
        .map_err(|_| ParamError::format(token, DAY_FORMATS))?;
    match calendar::day_to_date(key) {
        Some(_) => Ok(key),
        None => Err(ParamError::format(
            token,
            format!("a valid calendar date in {}", DAY_FORMATS),
        )),
    }
}
