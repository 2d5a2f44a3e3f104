//! Steps and distance
//!
//! One step count per minute, driven by the heart rate at that minute and by
//! whether the wearer should be asleep.

use rand::Rng;
use std::ops::RangeInclusive;

use crate::config::SleepConfig;
use crate::types::{MinuteSeries, SignalSeries};

/// Step counts drawn while asleep: mostly still, occasionally tossing and turning
const SLEEP_STEP_CHOICES: [u32; 6] = [0, 0, 0, 0, 1, 2];

/// Meters per step
const STRIDE_METERS: std::ops::Range<f64> = 0.7..0.8;

/// Output of the movement stage
#[derive(Debug, Clone, Default)]
pub struct Movement {
    pub steps: MinuteSeries<u32>,
    pub distance: MinuteSeries<f64>,
}

/// Step-count range for an awake minute at the given heart rate
pub fn awake_step_range(heart_rate: f64) -> RangeInclusive<u32> {
    if heart_rate < 60.0 {
        0..=20
    } else if heart_rate < 80.0 {
        20..=40
    } else {
        40..=120
    }
}

/// Derive per-minute steps and distance from the heart-rate series.
///
/// Only minute-mark samples are used. Per minute, the step count is drawn
/// first, then the stride length.
pub fn synthesize_movement<R: Rng + ?Sized>(
    heart_rate: &SignalSeries,
    sleep: &SleepConfig,
    rng: &mut R,
) -> Movement {
    let mut movement = Movement::default();

    for (key, &bpm) in heart_rate.iter().filter(|(key, _)| key.is_minute_mark()) {
        let steps = if sleep.contains_hour(key.hour()) {
            SLEEP_STEP_CHOICES[rng.gen_range(0..SLEEP_STEP_CHOICES.len())]
        } else {
            rng.gen_range(awake_step_range(bpm))
        };
        let distance = steps as f64 * rng.gen_range(STRIDE_METERS);

        movement.steps.insert(key.timestamp, steps);
        movement.distance.insert(key.timestamp, distance);
    }

    movement
}
