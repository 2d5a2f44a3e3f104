//! Base physiological signals
//!
//! Heart rate, HRV and blood oxygen are sampled every 10 seconds as a daily
//! sinusoid plus Gaussian noise. Breathing rate is derived once per minute from
//! the trailing minute of heart rate.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::collections::VecDeque;
use std::f64::consts::PI;

use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::range::{DateRange, SECONDS_PER_DAY};
use crate::types::{SampleKey, SignalSeries};

/// Cadence of the high-frequency signals (seconds)
pub const TICK_SECONDS: i64 = 10;

/// Heart-rate samples making up one minute
const HEART_RATE_WINDOW: usize = 6;

pub const BREATHING_RATE_MIN: f64 = 12.0;
pub const BREATHING_RATE_MAX: f64 = 20.0;
pub const SPO2_MIN: f64 = 95.0;
pub const SPO2_MAX: f64 = 100.0;

/// Output of the base signal stage
#[derive(Debug, Clone, Default)]
pub struct VitalSigns {
    pub heart_rate: SignalSeries,
    pub breathing_rate: SignalSeries,
    pub hrv: SignalSeries,
    pub spo2: SignalSeries,
}

/// Produces the base signals for a date range
pub struct VitalsSynthesizer {
    heart_rate_noise: Normal<f64>,
    breathing_rate_noise: Normal<f64>,
    hrv_noise: Normal<f64>,
    spo2_noise: Normal<f64>,
    tz_offset_minutes: i32,
}

impl VitalsSynthesizer {
    pub fn new(config: &SynthConfig) -> Result<Self, SynthError> {
        let noise = &config.noise;
        Ok(Self {
            heart_rate_noise: gaussian("heart rate", noise.heart_rate_sigma)?,
            breathing_rate_noise: gaussian("breathing rate", noise.breathing_rate_sigma)?,
            hrv_noise: gaussian("hrv", noise.hrv_sigma)?,
            spo2_noise: gaussian("spo2", noise.spo2_sigma)?,
            tz_offset_minutes: config.timezone_offset_minutes,
        })
    }

    /// Sample every tick of `range`.
    ///
    /// Per tick the draw order is heart rate, breathing rate (minute marks
    /// only), HRV, SpO2.
    pub fn synthesize<R: Rng + ?Sized>(&self, range: &DateRange, rng: &mut R) -> VitalSigns {
        let mut vitals = VitalSigns::default();
        let mut recent_heart_rate: VecDeque<f64> = VecDeque::with_capacity(HEART_RATE_WINDOW);

        for (elapsed, timestamp) in range.ticks(TICK_SECONDS) {
            let key = SampleKey::new(timestamp, self.tz_offset_minutes);

            let heart_rate = heart_rate_baseline(elapsed) + self.heart_rate_noise.sample(rng);
            vitals.heart_rate.insert(key, heart_rate);

            recent_heart_rate.push_back(heart_rate);
            while recent_heart_rate.len() > HEART_RATE_WINDOW {
                recent_heart_rate.pop_front();
            }

            if key.is_minute_mark() {
                let avg = recent_heart_rate.iter().sum::<f64>() / recent_heart_rate.len() as f64;
                let breathing_rate = (breathing_rate_baseline(avg)
                    + self.breathing_rate_noise.sample(rng))
                .clamp(BREATHING_RATE_MIN, BREATHING_RATE_MAX);
                vitals.breathing_rate.insert(key, breathing_rate);
            }

            let hrv = hrv_baseline(elapsed) + self.hrv_noise.sample(rng);
            vitals.hrv.insert(key, hrv);

            let spo2 = (spo2_baseline(elapsed) + self.spo2_noise.sample(rng))
                .clamp(SPO2_MIN, SPO2_MAX);
            vitals.spo2.insert(key, spo2);
        }

        vitals
    }
}

fn gaussian(signal: &str, sigma: f64) -> Result<Normal<f64>, SynthError> {
    Normal::new(0.0, sigma).map_err(|e| SynthError::Config(format!("{signal} noise: {e}")))
}

/// Position in the daily cycle (radians)
fn daily_phase(elapsed_seconds: i64) -> f64 {
    2.0 * PI * elapsed_seconds as f64 / SECONDS_PER_DAY as f64
}

/// Integer heart-rate baseline (bpm), truncated before noise is added
pub fn heart_rate_baseline(elapsed_seconds: i64) -> f64 {
    (60.0 + 5.0 * daily_phase(elapsed_seconds).sin()).trunc()
}

/// HRV baseline (ms)
pub fn hrv_baseline(elapsed_seconds: i64) -> f64 {
    40.0 + 5.0 * daily_phase(elapsed_seconds).cos()
}

/// SpO2 baseline (percent)
pub fn spo2_baseline(elapsed_seconds: i64) -> f64 {
    98.0 + 0.1 * daily_phase(elapsed_seconds).sin()
}

/// Unclamped, noiseless breathing rate for a mean heart rate
pub fn breathing_rate_baseline(avg_heart_rate: f64) -> f64 {
    12.0 + (avg_heart_rate - 60.0) / 10.0
}
