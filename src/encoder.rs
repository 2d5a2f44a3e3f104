//! Bundle encoding
//!
//! This module flattens a [`SyntheticBundle`] into a JSON-friendly payload.
//! Offset-keyed series become lists of `{timestamp, tz_offset_minutes, value}`
//! records in chronological order; daily aggregates become date-keyed maps.

use crate::error::SynthError;
use crate::types::{
    ActivityRecord, DailyAggregate, MinuteSeries, SignalSeries, SleepDetail, SyntheticBundle,
    DATE_FORMAT, TIMESTAMP_FORMAT,
};
use crate::{PRODUCER_NAME, SYNTH_VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current payload schema version
pub const PAYLOAD_VERSION: &str = "1.0.0";

/// Producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// How the payload was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadProvenance {
    pub start_date: String,
    pub end_date: String,
    pub seed: Option<u64>,
    pub tz_offset_minutes: i32,
    pub generated_at_utc: String,
}

/// One offset-keyed sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub timestamp: String,
    pub tz_offset_minutes: i32,
    pub value: f64,
}

/// One per-minute sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinuteRecord<T> {
    pub timestamp: String,
    pub value: T,
}

/// Daily calorie maps keyed by `YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaloriePayload {
    pub rest: BTreeMap<String, f64>,
    pub work: BTreeMap<String, f64>,
    pub active: BTreeMap<String, f64>,
    pub step: BTreeMap<String, f64>,
    pub total: BTreeMap<String, f64>,
}

/// Complete exported payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticPayload {
    pub payload_version: String,
    pub producer: PayloadProducer,
    pub provenance: PayloadProvenance,
    pub activity: ActivityRecord,
    pub heart_rate: Vec<SampleRecord>,
    pub breathing_rate: Vec<SampleRecord>,
    pub hrv: Vec<SampleRecord>,
    pub spo2: Vec<SampleRecord>,
    pub calories: CaloriePayload,
    pub sleep_session: Vec<SampleRecord>,
    pub sleep_detail: SleepDetail,
    pub steps: Vec<MinuteRecord<u32>>,
    pub distance: Vec<MinuteRecord<f64>>,
}

/// Encoder for producing JSON payloads
pub struct BundleEncoder {
    instance_id: String,
}

impl Default for BundleEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Flatten a bundle. `seed` is recorded in provenance when known.
    pub fn encode(&self, bundle: &SyntheticBundle, seed: Option<u64>) -> SyntheticPayload {
        let producer = PayloadProducer {
            name: PRODUCER_NAME.to_string(),
            version: SYNTH_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = PayloadProvenance {
            start_date: bundle.range.start().format(DATE_FORMAT).to_string(),
            end_date: bundle.range.end().format(DATE_FORMAT).to_string(),
            seed,
            tz_offset_minutes: bundle.tz_offset_minutes,
            generated_at_utc: Utc::now().to_rfc3339(),
        };

        let calories = CaloriePayload {
            rest: daily_records(&bundle.rest_cals),
            work: daily_records(&bundle.work_cals),
            active: daily_records(&bundle.active_cals),
            step: daily_records(&bundle.step_cals),
            total: daily_records(&bundle.total_cals),
        };

        SyntheticPayload {
            payload_version: PAYLOAD_VERSION.to_string(),
            producer,
            provenance,
            activity: bundle.activity.clone(),
            heart_rate: sample_records(&bundle.heart_rate),
            breathing_rate: sample_records(&bundle.breathing_rate),
            hrv: sample_records(&bundle.hrv),
            spo2: sample_records(&bundle.spo2),
            calories,
            sleep_session: sample_records(&bundle.sleep_session),
            sleep_detail: bundle.sleep_detail.clone(),
            steps: minute_records(&bundle.steps),
            distance: minute_records(&bundle.distance),
        }
    }

    /// Encode to a compact JSON string
    pub fn encode_to_json(
        &self,
        bundle: &SyntheticBundle,
        seed: Option<u64>,
    ) -> Result<String, SynthError> {
        let payload = self.encode(bundle, seed);
        serde_json::to_string(&payload).map_err(SynthError::JsonError)
    }
}

/// Flatten an offset-keyed series
pub fn sample_records(series: &SignalSeries) -> Vec<SampleRecord> {
    series
        .iter()
        .map(|(key, value)| SampleRecord {
            timestamp: key.timestamp_string(),
            tz_offset_minutes: key.tz_offset_minutes,
            value: *value,
        })
        .collect()
}

/// Flatten a per-minute series
pub fn minute_records<T: Copy>(series: &MinuteSeries<T>) -> Vec<MinuteRecord<T>> {
    series
        .iter()
        .map(|(timestamp, value)| MinuteRecord {
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            value: *value,
        })
        .collect()
}

/// Re-key a daily aggregate by date string
pub fn daily_records(aggregate: &DailyAggregate) -> BTreeMap<String, f64> {
    aggregate
        .iter()
        .map(|(date, value)| (date.format(DATE_FORMAT).to_string(), *value))
        .collect()
}
