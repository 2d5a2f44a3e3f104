//! Daily calorie aggregates
//!
//! Resting, workout and active calories are drawn per day; step calories are
//! derived from the day's step total. The daily total is their exact sum.

use chrono::NaiveDate;
use rand::Rng;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::types::{DailyAggregate, MinuteSeries, SignalSeries};

/// Calories burned per step
pub const STEP_CALORIE_FACTOR: f64 = 0.05;

const RESTING_CALORIES: RangeInclusive<u32> = 1000..=1300;
const WORKOUT_CALORIES: RangeInclusive<u32> = 300..=600;

/// Output of the calorie stage, one entry per date for every map
#[derive(Debug, Clone, Default)]
pub struct DailyCalories {
    pub rest: DailyAggregate,
    pub work: DailyAggregate,
    pub active: DailyAggregate,
    pub step: DailyAggregate,
    pub total: DailyAggregate,
}

/// Active-calorie range for a day with the given mean heart rate
pub fn active_calorie_range(avg_heart_rate: f64) -> RangeInclusive<u32> {
    if avg_heart_rate < 60.0 {
        50..=100
    } else if avg_heart_rate < 80.0 {
        100..=200
    } else {
        200..=300
    }
}

/// Sum of the four calorie components.
///
/// The integer-valued components are added before the step component.
pub fn total_calories(rest: f64, work: f64, active: f64, step: f64) -> f64 {
    rest + work + active + step
}

/// Aggregate calories for every date present in `heart_rate`.
///
/// Per date the draw order is active, resting, workout.
pub fn synthesize_calories<R: Rng + ?Sized>(
    heart_rate: &SignalSeries,
    steps: &MinuteSeries<u32>,
    rng: &mut R,
) -> DailyCalories {
    let mut heart_rate_by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (key, bpm) in heart_rate {
        let entry = heart_rate_by_date.entry(key.date()).or_insert((0.0, 0));
        entry.0 += bpm;
        entry.1 += 1;
    }

    let mut steps_by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for (timestamp, count) in steps {
        *steps_by_date.entry(timestamp.date()).or_insert(0) += u64::from(*count);
    }

    let mut calories = DailyCalories::default();

    for (date, (sum, count)) in heart_rate_by_date {
        let avg_heart_rate = sum / count as f64;

        let active = f64::from(rng.gen_range(active_calorie_range(avg_heart_rate)));
        let rest = f64::from(rng.gen_range(RESTING_CALORIES));
        let work = f64::from(rng.gen_range(WORKOUT_CALORIES));
        let step = steps_by_date.get(&date).copied().unwrap_or(0) as f64 * STEP_CALORIE_FACTOR;

        calories.rest.insert(date, rest);
        calories.work.insert(date, work);
        calories.active.insert(date, active);
        calories.step.insert(date, step);
        calories
            .total
            .insert(date, total_calories(rest, work, active, step));
    }

    calories
}
