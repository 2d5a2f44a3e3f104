//! Biostrap EVO device
//!
//! Serves the full synthetic bundle: 10 second vitals, per-minute movement,
//! daily calories and the sleep/activity summaries.

use tracing::debug;

use super::{Authenticator, Credential, DataType, Device, DeviceData, RealDataFetcher};
use crate::config::DeviceConfig;
use crate::error::SynthError;
use crate::pipeline::SyntheticGenerator;
use crate::range::DateRange;
use crate::types::{DailyAggregate, MinuteSeries, SignalSeries, SyntheticBundle};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Biostrap EVO facade
pub struct BiostrapEvo {
    config: DeviceConfig,
    synthetic_range: DateRange,
    generator: SyntheticGenerator,
    bundle: Option<SyntheticBundle>,
    credential: Option<Credential>,
    fetcher: Option<Box<dyn RealDataFetcher>>,
}

impl BiostrapEvo {
    /// Build a device from explicit configuration
    pub fn new(config: DeviceConfig) -> Result<Self, SynthError> {
        let synthetic_range = config.synthetic_range()?;
        let generator = SyntheticGenerator::new(config.synth.clone())?;
        Ok(Self {
            config,
            synthetic_range,
            generator,
            bundle: None,
            credential: None,
            fetcher: None,
        })
    }

    /// Attach the collaborator used once a non-empty credential is present
    pub fn with_fetcher(mut self, fetcher: Box<dyn RealDataFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn synthetic_range(&self) -> DateRange {
        self.synthetic_range
    }

    /// True until a non-empty credential has been obtained
    pub fn is_synthetic(&self) -> bool {
        self.credential.as_ref().map_or(true, Credential::is_empty)
    }

    /// The synthetic bundle, generated on first use
    pub fn synthetic_bundle(&mut self) -> &SyntheticBundle {
        let generator = &self.generator;
        let range = self.synthetic_range;
        let seed = self.config.seed;
        self.bundle.get_or_insert_with(|| {
            let mut rng = StdRng::seed_from_u64(seed);
            generator.generate_range(&range, &mut rng)
        })
    }

    fn get_synthetic(
        &mut self,
        data_type: DataType,
        range: &DateRange,
    ) -> Result<DeviceData, SynthError> {
        let (from_start, to_end) = range.offsets_within(&self.synthetic_range)?;
        debug!(
            data_type = %data_type,
            days_from_start = from_start,
            days_to_end = to_end,
            "slicing synthetic data"
        );

        let bundle = self.synthetic_bundle();
        let data = match data_type {
            DataType::Activities => DeviceData::Activity(
                Some(&bundle.activity)
                    .filter(|a| range.contains(a.activity_date))
                    .cloned(),
            ),
            DataType::Bpm => DeviceData::Series(slice_series(&bundle.heart_rate, range)),
            DataType::Brpm => DeviceData::Series(slice_series(&bundle.breathing_rate, range)),
            DataType::Hrv => DeviceData::Series(slice_series(&bundle.hrv, range)),
            DataType::Spo2 => DeviceData::Series(slice_series(&bundle.spo2, range)),
            DataType::RestCals => DeviceData::Daily(slice_daily(&bundle.rest_cals, range)),
            DataType::WorkCals => DeviceData::Daily(slice_daily(&bundle.work_cals, range)),
            DataType::ActiveCals => DeviceData::Daily(slice_daily(&bundle.active_cals, range)),
            DataType::StepCals => DeviceData::Daily(slice_daily(&bundle.step_cals, range)),
            DataType::TotalCals => DeviceData::Daily(slice_daily(&bundle.total_cals, range)),
            DataType::SleepSession => {
                DeviceData::Series(slice_series(&bundle.sleep_session, range))
            }
            DataType::SleepDetail => DeviceData::SleepDetail(
                Some(&bundle.sleep_detail)
                    .filter(|d| range.contains(d.sleep_date))
                    .cloned(),
            ),
            DataType::Steps => DeviceData::Steps(slice_minutes(&bundle.steps, range)),
            DataType::Distance => DeviceData::Distance(slice_minutes(&bundle.distance, range)),
        };
        Ok(data)
    }

    fn get_real(&self, data_type: DataType, range: &DateRange) -> Result<DeviceData, SynthError> {
        let credential = self
            .credential
            .as_ref()
            .ok_or_else(|| SynthError::NotAuthenticated(self.name().to_string()))?;
        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| SynthError::Fetch("no real data fetcher attached".to_string()))?;

        debug!(data_type = %data_type, range = %range, "fetching real data");
        fetcher
            .fetch(credential, data_type, range)
            .map(DeviceData::Raw)
    }
}

impl Device for BiostrapEvo {
    fn name(&self) -> &'static str {
        "Biostrap EVO"
    }

    fn data_types(&self) -> &'static [DataType] {
        &DataType::ALL
    }

    fn authenticate(&mut self, authenticator: &dyn Authenticator) -> Result<(), SynthError> {
        let credential = authenticator.authenticate()?;
        debug!(
            device = self.name(),
            synthetic = credential.is_empty(),
            "device authenticated"
        );
        self.credential = Some(credential);
        Ok(())
    }

    fn get_data(
        &mut self,
        data_type: DataType,
        range: Option<DateRange>,
    ) -> Result<DeviceData, SynthError> {
        if !self.data_types().contains(&data_type) {
            return Err(SynthError::UnsupportedDataType(data_type.to_string()));
        }

        let range = range.unwrap_or(self.synthetic_range);
        if self.is_synthetic() {
            self.get_synthetic(data_type, &range)
        } else {
            self.get_real(data_type, &range)
        }
    }
}

fn slice_series(series: &SignalSeries, range: &DateRange) -> SignalSeries {
    series
        .iter()
        .filter(|(key, _)| range.contains(key.date()))
        .map(|(key, value)| (*key, *value))
        .collect()
}

fn slice_minutes<T: Copy>(series: &MinuteSeries<T>, range: &DateRange) -> MinuteSeries<T> {
    series
        .iter()
        .filter(|(timestamp, _)| range.contains(timestamp.date()))
        .map(|(timestamp, value)| (*timestamp, *value))
        .collect()
}

fn slice_daily(aggregate: &DailyAggregate, range: &DateRange) -> DailyAggregate {
    aggregate
        .iter()
        .filter(|(date, _)| range.contains(**date))
        .map(|(date, value)| (*date, *value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::StaticToken;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn device() -> BiostrapEvo {
        BiostrapEvo::new(DeviceConfig::for_range("2022-01-01", "2022-01-04", 0)).unwrap()
    }

    struct RecordingFetcher {
        calls: Rc<RefCell<Vec<(String, DataType)>>>,
    }

    impl RealDataFetcher for RecordingFetcher {
        fn fetch(
            &self,
            credential: &Credential,
            data_type: DataType,
            range: &DateRange,
        ) -> Result<serde_json::Value, SynthError> {
            self.calls
                .borrow_mut()
                .push((credential.token().to_string(), data_type));
            Ok(json!({ "range": range.to_string(), "data_type": data_type.as_str() }))
        }
    }

    #[test]
    fn test_default_range_serves_everything() {
        let mut device = device();
        let data = device.get_data(DataType::Bpm, None).unwrap();
        assert_eq!(data.len(), 4 * 8640);

        let data = device.get_data(DataType::TotalCals, None).unwrap();
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_sub_range_slicing() {
        let mut device = device();
        let range = DateRange::parse("2022-01-02", "2022-01-03").unwrap();

        match device.get_data(DataType::Steps, Some(range)).unwrap() {
            DeviceData::Steps(steps) => {
                assert_eq!(steps.len(), 2 * 1440);
                let first = steps.keys().next().unwrap();
                assert_eq!(first.to_string(), "2022-01-02 00:00:00");
                let last = steps.keys().next_back().unwrap();
                assert_eq!(last.to_string(), "2022-01-03 23:59:00");
            }
            other => panic!("unexpected data {other:?}"),
        }

        match device.get_data(DataType::RestCals, Some(range)).unwrap() {
            DeviceData::Daily(daily) => {
                let keys: Vec<String> = daily.keys().map(|d| d.to_string()).collect();
                assert_eq!(keys, vec!["2022-01-02", "2022-01-03"]);
            }
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn test_slices_come_from_one_bundle() {
        let mut device = device();
        let whole = device.get_data(DataType::Hrv, None).unwrap();
        let day = DateRange::parse("2022-01-03", "2022-01-03").unwrap();
        let part = device.get_data(DataType::Hrv, Some(day)).unwrap();

        match (whole, part) {
            (DeviceData::Series(whole), DeviceData::Series(part)) => {
                for (key, value) in &part {
                    assert_eq!(whole.get(key), Some(value));
                }
            }
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_request_fails() {
        let mut device = device();
        let range = DateRange::parse("2021-12-31", "2022-01-02").unwrap();
        let result = device.get_data(DataType::Hrv, Some(range));
        assert!(matches!(result, Err(SynthError::InvalidRange(_))));
    }

    #[test]
    fn test_empty_token_stays_synthetic() {
        let mut device = device();
        device.authenticate(&StaticToken::new("")).unwrap();
        assert!(device.is_synthetic());
        let data = device.get_data(DataType::SleepDetail, None).unwrap();
        assert!(matches!(data, DeviceData::SleepDetail(Some(_))));
    }

    #[test]
    fn test_midpoint_records_follow_slice() {
        let mut device =
            BiostrapEvo::new(DeviceConfig::for_range("2022-01-01", "2022-01-09", 0)).unwrap();

        let early = DateRange::parse("2022-01-01", "2022-01-02").unwrap();
        let activity = device.get_data(DataType::Activities, Some(early)).unwrap();
        assert_eq!(activity, DeviceData::Activity(None));
        assert!(activity.is_empty());
        let sleep = device.get_data(DataType::SleepDetail, Some(early)).unwrap();
        assert_eq!(sleep, DeviceData::SleepDetail(None));
        assert!(sleep.to_json().unwrap().is_null());

        let middle = DateRange::parse("2022-01-04", "2022-01-06").unwrap();
        match device.get_data(DataType::Activities, Some(middle)).unwrap() {
            DeviceData::Activity(Some(activity)) => {
                assert_eq!(activity.activity_date.to_string(), "2022-01-05");
            }
            other => panic!("unexpected data {other:?}"),
        }
        match device.get_data(DataType::SleepDetail, Some(middle)).unwrap() {
            DeviceData::SleepDetail(Some(detail)) => {
                assert_eq!(detail.sleep_date.to_string(), "2022-01-05");
            }
            other => panic!("unexpected data {other:?}"),
        }
    }

    #[test]
    fn test_real_mode_uses_fetcher() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let fetcher = RecordingFetcher {
            calls: Rc::clone(&calls),
        };
        let mut device = device().with_fetcher(Box::new(fetcher));
        device.authenticate(&StaticToken::new("token-123")).unwrap();
        assert!(!device.is_synthetic());

        let data = device.get_data(DataType::Spo2, None).unwrap();
        match data {
            DeviceData::Raw(value) => {
                assert_eq!(value["data_type"], "spo2");
                assert_eq!(value["range"], "2022-01-01..=2022-01-04");
            }
            other => panic!("unexpected data {other:?}"),
        }
        assert_eq!(
            calls.borrow().as_slice(),
            &[("token-123".to_string(), DataType::Spo2)]
        );
    }

    #[test]
    fn test_real_mode_without_fetcher_fails() {
        let mut device = device();
        device.authenticate(&StaticToken::new("token")).unwrap();
        let result = device.get_data(DataType::Bpm, None);
        assert!(matches!(result, Err(SynthError::Fetch(_))));
    }

    #[test]
    fn test_device_data_json() {
        let mut device = device();
        let day = DateRange::parse("2022-01-01", "2022-01-01").unwrap();
        let json = device
            .get_data(DataType::Brpm, Some(day))
            .unwrap()
            .to_json()
            .unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 1440);
        assert_eq!(records[0]["timestamp"], "2022-01-01 00:00:00");
        assert_eq!(records[0]["tz_offset_minutes"], -420);
    }
}
