//! Core types for synthetic biometric generation
//!
//! This module defines the data structures produced by each stage of the
//! generator: timestamped signal series, daily aggregates, session summaries
//! and the bundle that carries all of them back to the caller.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::range::DateRange;

/// Text format of a local timestamp (`YYYY-MM-DD HH:MM:SS`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text format of a calendar date (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Local timestamp paired with the UTC offset (minutes) it was recorded in.
///
/// Ordering is chronological on the timestamp, then by offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleKey {
    pub timestamp: NaiveDateTime,
    pub tz_offset_minutes: i32,
}

impl SampleKey {
    pub fn new(timestamp: NaiveDateTime, tz_offset_minutes: i32) -> Self {
        Self {
            timestamp,
            tz_offset_minutes,
        }
    }

    /// Calendar date of the local timestamp
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Local hour of day (0-23)
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// True when the sample sits on a minute boundary
    pub fn is_minute_mark(&self) -> bool {
        self.timestamp.second() == 0
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(\"{}\", {})",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.tz_offset_minutes
        )
    }
}

/// Offset-keyed signal series (heart rate, breathing rate, HRV, SpO2)
pub type SignalSeries = BTreeMap<SampleKey, f64>;

/// Per-minute series keyed by plain local timestamp (steps, distance)
pub type MinuteSeries<T> = BTreeMap<NaiveDateTime, T>;

/// One scalar per calendar date
pub type DailyAggregate = BTreeMap<NaiveDate, f64>;

/// Workout category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Running,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "running",
        }
    }
}

/// Perceived workout intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Moderate,
    High,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Light, Intensity::Moderate, Intensity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "light",
            Intensity::Moderate => "moderate",
            Intensity::High => "high",
        }
    }
}

/// A single synthetic workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Day the workout took place
    pub activity_date: NaiveDate,
    pub activity_type: ActivityType,
    /// Workout duration (minutes)
    pub duration_minutes: u32,
    /// Distance covered (kilometers)
    pub distance_km: f64,
    pub calories_burned: u32,
    /// Average heart rate during the workout (bpm)
    pub avg_bpm: u32,
    /// Peak heart rate during the workout (bpm)
    pub peak_bpm: u32,
    pub steps_taken: u32,
    pub intensity: Intensity,
}

/// Nightly sleep breakdown (all durations in hours)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepDetail {
    pub sleep_date: NaiveDate,
    pub light_sleep_hours: f64,
    pub deep_sleep_hours: f64,
    pub rem_sleep_hours: f64,
    pub awake_time_hours: f64,
    pub times_awoken: u32,
}

impl SleepDetail {
    /// Light + deep + REM
    pub fn total_sleep_hours(&self) -> f64 {
        self.light_sleep_hours + self.deep_sleep_hours + self.rem_sleep_hours
    }
}

/// Everything one generator invocation produces
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticBundle {
    /// Inclusive range the bundle covers
    pub range: DateRange,
    /// UTC offset stamped on every offset-keyed sample
    pub tz_offset_minutes: i32,
    pub activity: ActivityRecord,
    /// Heart rate, 10 second cadence (bpm)
    pub heart_rate: SignalSeries,
    /// Breathing rate, 1 minute cadence (breaths per minute)
    pub breathing_rate: SignalSeries,
    /// Heart rate variability, 10 second cadence (ms)
    pub hrv: SignalSeries,
    /// Blood oxygen saturation, 10 second cadence (percent)
    pub spo2: SignalSeries,
    pub rest_cals: DailyAggregate,
    pub work_cals: DailyAggregate,
    pub active_cals: DailyAggregate,
    pub step_cals: DailyAggregate,
    pub total_cals: DailyAggregate,
    /// Restless heart-rate samples during nocturnal hours
    pub sleep_session: SignalSeries,
    pub sleep_detail: SleepDetail,
    /// Steps per minute
    pub steps: MinuteSeries<u32>,
    /// Distance per minute (meters)
    pub distance: MinuteSeries<f64>,
}
