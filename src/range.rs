//! Inclusive calendar date ranges
//!
//! A [`DateRange`] is the unit of work for the generator: every series spans
//! whole days from `start` 00:00:00 through the last tick of `end`.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::SynthError;
use crate::types::DATE_FORMAT;

/// Seconds in one calendar day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Inclusive range of calendar dates with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `end < start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SynthError> {
        if end < start {
            return Err(SynthError::InvalidRange(format!(
                "end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, SynthError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Single-day range
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered (always >= 1)
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Day halfway through the range, rounded towards `start`
    pub fn midpoint(&self) -> NaiveDate {
        self.start + Duration::days((self.end - self.start).num_days() / 2)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.num_days() as usize)
    }

    /// Every tick of `step_seconds` from `start` 00:00:00 through the end of
    /// `end`, paired with seconds elapsed since the range start.
    pub fn ticks(&self, step_seconds: i64) -> impl Iterator<Item = (i64, NaiveDateTime)> {
        let origin = self.start.and_time(NaiveTime::MIN);
        let count = self.num_days() * SECONDS_PER_DAY / step_seconds;
        (0..count).map(move |i| {
            let elapsed = i * step_seconds;
            (elapsed, origin + Duration::seconds(elapsed))
        })
    }

    /// Day offsets of `self` inside `outer`: days from `outer.start` to
    /// `self.start`, and days from `self.end` to `outer.end`.
    ///
    /// Fails when `self` reaches outside `outer`.
    pub fn offsets_within(&self, outer: &DateRange) -> Result<(i64, i64), SynthError> {
        let from_start = (self.start - outer.start).num_days();
        let to_end = (outer.end - self.end).num_days();
        if from_start < 0 || to_end < 0 {
            return Err(SynthError::InvalidRange(format!(
                "requested range {self} lies outside {outer}"
            )));
        }
        Ok((from_start, to_end))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..={}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate, SynthError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| SynthError::InvalidRange(format!("cannot parse date '{value}': {e}")))
}
