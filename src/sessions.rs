//! Session summaries
//!
//! A workout and a night of sleep anchored at the middle of the range, plus the
//! restless moments pulled out of the nocturnal heart rate.

use rand::Rng;

use crate::config::SleepConfig;
use crate::range::DateRange;
use crate::types::{ActivityRecord, ActivityType, Intensity, SignalSeries, SleepDetail};

/// Length of the synthetic night (hours)
pub const TOTAL_SLEEP_HOURS: f64 = 8.0;

/// Draw one workout on the midpoint date.
///
/// Draw order: duration, distance, calories, average bpm, peak bpm, steps,
/// intensity.
pub fn synthesize_activity<R: Rng + ?Sized>(range: &DateRange, rng: &mut R) -> ActivityRecord {
    ActivityRecord {
        activity_date: range.midpoint(),
        activity_type: ActivityType::Running,
        duration_minutes: rng.gen_range(20..=60),
        distance_km: rng.gen_range(3.0..10.0),
        calories_burned: rng.gen_range(200..=500),
        avg_bpm: rng.gen_range(80..=150),
        peak_bpm: rng.gen_range(150..=180),
        steps_taken: rng.gen_range(3000..=10000),
        intensity: Intensity::ALL[rng.gen_range(0..Intensity::ALL.len())],
    }
}

/// Heart-rate samples inside the nocturnal window that exceed the movement
/// threshold
pub fn extract_sleep_session(heart_rate: &SignalSeries, sleep: &SleepConfig) -> SignalSeries {
    heart_rate
        .iter()
        .filter(|(key, bpm)| {
            sleep.contains_hour(key.hour()) && **bpm > sleep.movement_threshold_bpm
        })
        .map(|(key, bpm)| (*key, *bpm))
        .collect()
}

/// Draw one night of sleep on the midpoint date.
///
/// REM takes whatever light and deep sleep leave of [`TOTAL_SLEEP_HOURS`].
pub fn synthesize_sleep_detail<R: Rng + ?Sized>(range: &DateRange, rng: &mut R) -> SleepDetail {
    let light_sleep_hours = rng.gen_range(0.4..0.6) * TOTAL_SLEEP_HOURS;
    let deep_sleep_hours = rng.gen_range(0.2..0.3) * TOTAL_SLEEP_HOURS;
    let rem_sleep_hours = TOTAL_SLEEP_HOURS - (light_sleep_hours + deep_sleep_hours);

    SleepDetail {
        sleep_date: range.midpoint(),
        light_sleep_hours,
        deep_sleep_hours,
        rem_sleep_hours,
        awake_time_hours: rng.gen_range(0.1..0.3),
        times_awoken: rng.gen_range(1..=5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SampleKey, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn key(s: &str) -> SampleKey {
        SampleKey::new(NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap(), -420)
    }

    #[test]
    fn test_activity_fields_in_range() {
        let range = DateRange::parse("2022-01-01", "2022-01-09").unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..50 {
            let activity = synthesize_activity(&range, &mut rng);
            assert_eq!(activity.activity_date.to_string(), "2022-01-05");
            assert_eq!(activity.activity_type, ActivityType::Running);
            assert!((20..=60).contains(&activity.duration_minutes));
            assert!(activity.distance_km >= 3.0 && activity.distance_km < 10.0);
            assert!((200..=500).contains(&activity.calories_burned));
            assert!((80..=150).contains(&activity.avg_bpm));
            assert!((150..=180).contains(&activity.peak_bpm));
            assert!(activity.avg_bpm <= activity.peak_bpm);
            assert!((3000..=10000).contains(&activity.steps_taken));
        }
    }

    #[test]
    fn test_sleep_session_filters_hour_and_threshold() {
        let mut hr = SignalSeries::new();
        hr.insert(key("2022-01-01 02:00:00"), 66.0);
        hr.insert(key("2022-01-01 02:00:10"), 64.0);
        hr.insert(key("2022-01-01 05:59:50"), 65.0);
        hr.insert(key("2022-01-01 12:00:00"), 90.0);
        hr.insert(key("2022-01-01 23:30:00"), 70.0);

        let session = extract_sleep_session(&hr, &SleepConfig::default());
        let keys: Vec<String> = session.keys().map(|k| k.timestamp_string()).collect();
        assert_eq!(keys, vec!["2022-01-01 02:00:00", "2022-01-01 23:30:00"]);
    }

    #[test]
    fn test_sleep_detail_sums_to_total() {
        let range = DateRange::parse("2022-01-01", "2022-01-02").unwrap();
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..100 {
            let detail = synthesize_sleep_detail(&range, &mut rng);
            assert_eq!(detail.sleep_date.to_string(), "2022-01-01");
            assert!((detail.total_sleep_hours() - TOTAL_SLEEP_HOURS).abs() < 1e-9);
            assert!(detail.light_sleep_hours >= 3.2 && detail.light_sleep_hours < 4.8);
            assert!(detail.deep_sleep_hours >= 1.6 && detail.deep_sleep_hours < 2.4);
            assert!(detail.rem_sleep_hours > 0.8);
            assert!((1..=5).contains(&detail.times_awoken));
        }
    }
}
