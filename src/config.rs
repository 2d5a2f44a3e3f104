//! Generator and device configuration
//!
//! Everything the generator would otherwise hard-code (timezone offset, noise
//! levels, the nocturnal window) lives here, loadable from TOML. Devices take a
//! [`DeviceConfig`] at construction instead of carrying their own defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SynthError;
use crate::range::DateRange;

/// Pacific Daylight Time, in minutes from UTC
pub const DEFAULT_TZ_OFFSET_MINUTES: i32 = -420;

/// Largest UTC offset accepted (14 hours)
const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Offset stamped on every offset-keyed sample
    pub timezone_offset_minutes: i32,
    pub noise: NoiseConfig,
    pub sleep: SleepConfig,
}

/// Standard deviations of the Gaussian noise added to each signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub heart_rate_sigma: f64,
    pub breathing_rate_sigma: f64,
    pub hrv_sigma: f64,
    pub spo2_sigma: f64,
}

/// Nocturnal window and restlessness threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    /// First hour of the nocturnal window (inclusive)
    pub start_hour: u32,
    /// Hour the nocturnal window ends (exclusive)
    pub end_hour: u32,
    /// Heart rate above which a nocturnal sample counts as movement (bpm)
    pub movement_threshold_bpm: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            timezone_offset_minutes: DEFAULT_TZ_OFFSET_MINUTES,
            noise: NoiseConfig::default(),
            sleep: SleepConfig::default(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            heart_rate_sigma: 0.5,
            breathing_rate_sigma: 1.0,
            hrv_sigma: 1.0,
            spo2_sigma: 0.05,
        }
    }
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            start_hour: 23,
            end_hour: 6,
            movement_threshold_bpm: 65.0,
        }
    }
}

impl SleepConfig {
    /// Whether a local hour falls inside the nocturnal window.
    ///
    /// Windows wrap midnight when `start_hour > end_hour`.
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }
}

impl SynthConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, SynthError> {
        let config: SynthConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, SynthError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, SynthError> {
        toml::to_string_pretty(self).map_err(|e| SynthError::EncodingError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SynthError> {
        if self.timezone_offset_minutes.abs() > MAX_TZ_OFFSET_MINUTES {
            return Err(SynthError::Config(format!(
                "timezone offset {} is beyond +/-{} minutes",
                self.timezone_offset_minutes, MAX_TZ_OFFSET_MINUTES
            )));
        }

        let sigmas = [
            ("heart_rate_sigma", self.noise.heart_rate_sigma),
            ("breathing_rate_sigma", self.noise.breathing_rate_sigma),
            ("hrv_sigma", self.noise.hrv_sigma),
            ("spo2_sigma", self.noise.spo2_sigma),
        ];
        for (name, sigma) in sigmas {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(SynthError::Config(format!(
                    "{name} must be a finite, non-negative number (got {sigma})"
                )));
            }
        }

        if self.sleep.start_hour > 23 || self.sleep.end_hour > 23 {
            return Err(SynthError::Config(format!(
                "sleep window hours must be 0-23 (got {}..{})",
                self.sleep.start_hour, self.sleep.end_hour
            )));
        }
        if self.sleep.start_hour == self.sleep.end_hour {
            return Err(SynthError::Config(format!(
                "sleep window is empty (start_hour and end_hour are both {})",
                self.sleep.start_hour
            )));
        }
        if !self.sleep.movement_threshold_bpm.is_finite() {
            return Err(SynthError::Config(
                "movement_threshold_bpm must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

/// Construction parameters for a device facade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Seed for the device's synthetic data
    pub seed: u64,
    /// First day of synthetic data (`YYYY-MM-DD`)
    pub synthetic_start_date: String,
    /// Last day of synthetic data (`YYYY-MM-DD`)
    pub synthetic_end_date: String,
    pub synth: SynthConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            synthetic_start_date: "2022-03-01".to_string(),
            synthetic_end_date: "2022-06-17".to_string(),
            synth: SynthConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Config covering an explicit range
    pub fn for_range(start: &str, end: &str, seed: u64) -> Self {
        Self {
            seed,
            synthetic_start_date: start.to_string(),
            synthetic_end_date: end.to_string(),
            synth: SynthConfig::default(),
        }
    }

    /// Parsed synthetic range
    pub fn synthetic_range(&self) -> Result<DateRange, SynthError> {
        DateRange::parse(&self.synthetic_start_date, &self.synthetic_end_date)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SynthError> {
        let config: DeviceConfig = toml::from_str(content)?;
        config.synthetic_range()?;
        config.synth.validate()?;
        Ok(config)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, SynthError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, SynthError> {
        toml::to_string_pretty(self).map_err(|e| SynthError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SynthConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timezone_offset_minutes, -420);
    }

    #[test]
    fn test_sleep_window_wraps_midnight() {
        let sleep = SleepConfig::default();
        assert!(sleep.contains_hour(23));
        assert!(sleep.contains_hour(0));
        assert!(sleep.contains_hour(5));
        assert!(!sleep.contains_hour(6));
        assert!(!sleep.contains_hour(22));

        let daytime = SleepConfig {
            start_hour: 1,
            end_hour: 7,
            ..Default::default()
        };
        assert!(daytime.contains_hour(1));
        assert!(!daytime.contains_hour(7));
        assert!(!daytime.contains_hour(0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SynthConfig::from_toml_str(
            r#"
            timezone_offset_minutes = 60

            [noise]
            heart_rate_sigma = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.timezone_offset_minutes, 60);
        assert_eq!(config.noise.heart_rate_sigma, 0.25);
        assert_eq!(config.noise.hrv_sigma, 1.0);
        assert_eq!(config.sleep, SleepConfig::default());
    }

    #[test]
    fn test_invalid_sigma_rejected() {
        let result = SynthConfig::from_toml_str(
            r#"
            [noise]
            spo2_sigma = -1.0
            "#,
        );
        assert!(matches!(result, Err(SynthError::Config(_))));
    }

    #[test]
    fn test_empty_sleep_window_rejected() {
        let result = SynthConfig::from_toml_str(
            r#"
            [sleep]
            start_hour = 4
            end_hour = 4
            "#,
        );
        assert!(matches!(result, Err(SynthError::Config(_))));

        let config = SynthConfig {
            sleep: SleepConfig {
                start_hour: 0,
                end_hour: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SynthError::Config(_))));
    }

    #[test]
    fn test_invalid_offset_rejected() {
        let config = SynthConfig {
            timezone_offset_minutes: 15 * 60,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SynthError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SynthConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(SynthConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_device_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            seed = 7
            synthetic_start_date = "2023-01-01"
            synthetic_end_date = "2023-01-10"
            "#
        )
        .unwrap();

        let config = DeviceConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.synthetic_range().unwrap().num_days(), 10);
    }

    #[test]
    fn test_device_config_round_trip() {
        let config = DeviceConfig::for_range("2022-01-01", "2022-01-31", 3);
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[synth.noise]"));
        assert_eq!(DeviceConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_device_config_rejects_reversed_range() {
        let result = DeviceConfig::from_toml_str(
            r#"
            synthetic_start_date = "2023-01-10"
            synthetic_end_date = "2023-01-01"
            "#,
        );
        assert!(matches!(result, Err(SynthError::InvalidRange(_))));
    }
}
