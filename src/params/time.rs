//! Time filters
//!
//! A [`TimeFilter`] restricts a query to a set of days or epiweeks. Values are
//! integer keys (`YYYYMMDD` or `YYYYWW`) or inclusive ranges of them. Several
//! time directives in one request are reduced to a single filter by
//! [`TimeFilter::merge`].

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::params::calendar;
use crate::params::error::{ParamError, ParamResult};
use crate::params::scalar::{normalize_range, parse_day_value, parse_week_value};
use crate::params::values::ValueSet;

/// Time unit a filter operates over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// `YYYYMMDD` keys
    Day,
    /// `YYYYWW` epiweek keys
    Week,
}

impl Granularity {
    /// Parse a directive discriminator
    pub fn parse(s: &str) -> ParamResult<Self> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            _ => Err(ParamError::format(
                format!("time param: {}", s),
                "one of \"day\" or \"week\"",
            )),
        }
    }

    /// Guess the granularity of a raw token: six characters is a week
    pub fn guess(token: &str) -> Self {
        if token.len() == 6 {
            Self::Week
        } else {
            Self::Day
        }
    }

    /// Guess the granularity of an integer key: eight digits is a day
    pub fn guess_key(key: u32) -> Self {
        if key.to_string().len() == 8 {
            Self::Day
        } else {
            Self::Week
        }
    }

    /// Parse one token in this granularity's grammar
    pub fn parse_value(&self, token: &str) -> ParamResult<TimeValue> {
        match self {
            Self::Day => parse_day_value(token),
            Self::Week => parse_week_value(token),
        }
    }

    /// First calendar day covered by a key
    pub fn to_date(&self, key: u32) -> Option<NaiveDate> {
        match self {
            Self::Day => calendar::day_to_date(key),
            Self::Week => calendar::week_to_date(key),
        }
    }

    /// Key of the day or epiweek containing a date
    pub fn from_date(&self, date: NaiveDate) -> Option<u32> {
        match self {
            Self::Day => calendar::date_to_day(date),
            Self::Week => calendar::date_to_week(date),
        }
    }

    /// Length of one unit in days
    pub fn step_days(&self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
        }
    }

    /// Inclusive number of units in `start..=end`
    pub fn span(&self, start: u32, end: u32) -> Option<u64> {
        match self {
            Self::Day => calendar::days_in_range(start, end),
            Self::Week => calendar::weeks_in_range(start, end),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
        }
    }
}

/// A single time key or an inclusive range with `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TimeValue {
    Single(u32),
    Range(u32, u32),
}

impl TimeValue {
    /// Inclusive bounds; a scalar is its own start and end
    pub fn bounds(&self) -> (u32, u32) {
        match *self {
            Self::Single(key) => (key, key),
            Self::Range(start, end) => (start, end),
        }
    }

    pub fn contains(&self, key: u32) -> bool {
        let (start, end) = self.bounds();
        start <= key && key <= end
    }
}

/// A restriction on days or epiweeks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeFilter {
    granularity: Granularity,
    values: ValueSet<TimeValue>,
}

impl TimeFilter {
    /// A filter accepting every key of the granularity
    pub fn wildcard(granularity: Granularity) -> Self {
        Self {
            granularity,
            values: ValueSet::Wildcard,
        }
    }

    /// Build an explicit filter
    ///
    /// Every key must exist in the granularity's calendar. Ranges with equal
    /// bounds become scalars; inverted ranges are rejected.
    pub fn new(granularity: Granularity, values: Vec<TimeValue>) -> ParamResult<Self> {
        let values = values
            .into_iter()
            .map(|value| {
                let (start, end) = value.bounds();
                for key in [start, end] {
                    if granularity.to_date(key).is_none() {
                        return Err(ParamError::format(
                            key.to_string(),
                            format!("a valid {} key", granularity),
                        ));
                    }
                }
                normalize_range(start, end)
            })
            .collect::<ParamResult<Vec<_>>>()?;

        let values = ValueSet::from_values(values).ok_or_else(|| {
            ParamError::MissingParameter(format!("{} values are required", granularity))
        })?;

        Ok(Self {
            granularity,
            values,
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn values(&self) -> &ValueSet<TimeValue> {
        &self.values
    }

    pub fn is_day(&self) -> bool {
        self.granularity == Granularity::Day
    }

    pub fn is_week(&self) -> bool {
        self.granularity == Granularity::Week
    }

    pub fn is_wildcard(&self) -> bool {
        self.values.is_wildcard()
    }

    /// Check whether a key of the given granularity is accepted
    pub fn matches(&self, granularity: Granularity, key: u32) -> bool {
        if granularity != self.granularity {
            return false;
        }
        match &self.values {
            ValueSet::Wildcard => true,
            ValueSet::Values(values) => values.iter().any(|v| v.contains(key)),
        }
    }

    /// Number of days or weeks selected, infinite for the wildcard
    pub fn count(&self) -> f64 {
        match &self.values {
            ValueSet::Wildcard => f64::INFINITY,
            ValueSet::Values(values) => values
                .iter()
                .map(|value| match *value {
                    TimeValue::Single(_) => 1,
                    TimeValue::Range(start, end) => {
                        self.granularity.span(start, end).unwrap_or(1)
                    }
                })
                .sum::<u64>() as f64,
        }
    }

    /// Collapse the values into a minimal sorted list of scalars and ranges
    ///
    /// Overlapping values and values on consecutive days (or epiweeks) are
    /// joined. Applying this twice gives the same result as applying it once.
    pub fn to_ranges(&self) -> Self {
        let ValueSet::Values(values) = &self.values else {
            return self.clone();
        };

        let mut intervals = Vec::with_capacity(values.len());
        for value in values {
            let (start, end) = value.bounds();
            match (
                self.granularity.to_date(start),
                self.granularity.to_date(end),
            ) {
                (Some(start), Some(end)) => intervals.push((start, end)),
                _ => {
                    tracing::warn!(?value, "Cannot collapse time value outside the calendar");
                    return self.clone();
                }
            }
        }
        intervals.sort();

        let step = Duration::days(self.granularity.step_days());
        let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(intervals.len());
        for (start, end) in intervals {
            match merged.last_mut() {
                Some(last)
                    if last
                        .1
                        .checked_add_signed(step)
                        .map_or(true, |next| start <= next) =>
                {
                    last.1 = last.1.max(end);
                }
                _ => merged.push((start, end)),
            }
        }

        let collapsed = merged
            .into_iter()
            .map(|(start, end)| {
                let start = self.granularity.from_date(start)?;
                let end = self.granularity.from_date(end)?;
                Some(if start == end {
                    TimeValue::Single(start)
                } else {
                    TimeValue::Range(start, end)
                })
            })
            .collect::<Option<Vec<_>>>();

        match collapsed {
            Some(values) => Self {
                granularity: self.granularity,
                values: ValueSet::Values(values),
            },
            None => self.clone(),
        }
    }

    /// Reduce the time filters of one request to at most one
    ///
    /// Mixed granularities fail. A wildcard absorbs every explicit value;
    /// otherwise explicit values are concatenated and collapsed.
    pub fn merge(param: &str, filters: Vec<TimeFilter>) -> ParamResult<Option<Self>> {
        if filters.len() <= 1 {
            return Ok(filters.into_iter().next());
        }

        let mut granularities: Vec<Granularity> = filters.iter().map(|f| f.granularity).collect();
        granularities.sort();
        granularities.dedup();
        if granularities.len() > 1 {
            return Err(ParamError::GranularityConflict {
                param: param.to_string(),
                granularities,
            });
        }

        let granularity = filters[0].granularity;
        let mut merged = Vec::new();
        for filter in filters {
            match filter.values {
                ValueSet::Wildcard => {
                    tracing::debug!(param, "Wildcard time directive absorbs the others");
                    return Ok(Some(Self::wildcard(granularity)));
                }
                ValueSet::Values(values) => merged.extend(values),
            }
        }

        let merged = Self {
            granularity,
            values: ValueSet::Values(merged),
        };
        Ok(Some(merged.to_ranges()))
    }
}
