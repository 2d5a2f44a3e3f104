//! Device facades
//!
//! A device serves named data types for a date range, either from a real vendor
//! API (through the [`Authenticator`] and [`RealDataFetcher`] seams) or from
//! synthetic data generated once and sliced per request.

mod biostrap;

pub use biostrap::BiostrapEvo;

use std::fmt;
use std::str::FromStr;

use crate::encoder::{daily_records, minute_records, sample_records};
use crate::error::SynthError;
use crate::range::DateRange;
use crate::types::{ActivityRecord, DailyAggregate, MinuteSeries, SignalSeries, SleepDetail};

/// Data types a device can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Activities,
    Bpm,
    Brpm,
    Hrv,
    Spo2,
    RestCals,
    WorkCals,
    ActiveCals,
    StepCals,
    TotalCals,
    SleepSession,
    SleepDetail,
    Steps,
    Distance,
}

impl DataType {
    pub const ALL: [DataType; 14] = [
        DataType::Activities,
        DataType::Bpm,
        DataType::Brpm,
        DataType::Hrv,
        DataType::Spo2,
        DataType::RestCals,
        DataType::WorkCals,
        DataType::ActiveCals,
        DataType::StepCals,
        DataType::TotalCals,
        DataType::SleepSession,
        DataType::SleepDetail,
        DataType::Steps,
        DataType::Distance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Activities => "activities",
            DataType::Bpm => "bpm",
            DataType::Brpm => "brpm",
            DataType::Hrv => "hrv",
            DataType::Spo2 => "spo2",
            DataType::RestCals => "rest_cals",
            DataType::WorkCals => "work_cals",
            DataType::ActiveCals => "active_cals",
            DataType::StepCals => "step_cals",
            DataType::TotalCals => "total_cals",
            DataType::SleepSession => "sleep_session",
            DataType::SleepDetail => "sleep_detail",
            DataType::Steps => "steps",
            DataType::Distance => "distance",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .copied()
            .find(|dt| dt.as_str() == s)
            .ok_or_else(|| SynthError::UnsupportedDataType(s.to_string()))
    }
}

/// Data returned by [`Device::get_data`]
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceData {
    Series(SignalSeries),
    Steps(MinuteSeries<u32>),
    Distance(MinuteSeries<f64>),
    Daily(DailyAggregate),
    /// `None` when the record's date lies outside the requested range
    Activity(Option<ActivityRecord>),
    /// `None` when the record's date lies outside the requested range
    SleepDetail(Option<SleepDetail>),
    /// Vendor-shaped JSON from a real fetch
    Raw(serde_json::Value),
}

impl DeviceData {
    /// Number of entries (a present record counts as one)
    pub fn len(&self) -> usize {
        match self {
            DeviceData::Series(s) => s.len(),
            DeviceData::Steps(s) => s.len(),
            DeviceData::Distance(s) => s.len(),
            DeviceData::Daily(d) => d.len(),
            DeviceData::Activity(a) => usize::from(a.is_some()),
            DeviceData::SleepDetail(d) => usize::from(d.is_some()),
            DeviceData::Raw(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> Result<serde_json::Value, SynthError> {
        let value = match self {
            DeviceData::Series(s) => serde_json::to_value(sample_records(s))?,
            DeviceData::Steps(s) => serde_json::to_value(minute_records(s))?,
            DeviceData::Distance(s) => serde_json::to_value(minute_records(s))?,
            DeviceData::Daily(d) => serde_json::to_value(daily_records(d))?,
            DeviceData::Activity(a) => serde_json::to_value(a)?,
            DeviceData::SleepDetail(d) => serde_json::to_value(d)?,
            DeviceData::Raw(v) => v.clone(),
        };
        Ok(value)
    }
}

/// Opaque credential gating real-API calls
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// An empty credential only unlocks synthetic data
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Produces a credential for a vendor API
pub trait Authenticator {
    fn authenticate(&self) -> Result<Credential, SynthError>;
}

/// Authenticator for a token obtained out of band
#[derive(Debug, Clone, Default)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl Authenticator for StaticToken {
    fn authenticate(&self) -> Result<Credential, SynthError> {
        Ok(Credential::new(self.0.clone()))
    }
}

/// Fetches vendor-shaped JSON from a real API
pub trait RealDataFetcher {
    fn fetch(
        &self,
        credential: &Credential,
        data_type: DataType,
        range: &DateRange,
    ) -> Result<serde_json::Value, SynthError>;
}

/// Uniform per-device interface
pub trait Device {
    /// Human-readable device name
    fn name(&self) -> &'static str;

    /// Data types this device can serve
    fn data_types(&self) -> &'static [DataType];

    /// Obtain a credential. An empty credential keeps the device synthetic.
    fn authenticate(&mut self, authenticator: &dyn Authenticator) -> Result<(), SynthError>;

    /// Fetch `data_type` for `range`, or for the device's default range when
    /// `range` is `None`
    fn get_data(
        &mut self,
        data_type: DataType,
        range: Option<DateRange>,
    ) -> Result<DeviceData, SynthError>;
}
