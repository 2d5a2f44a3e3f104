//! Property tests over short generated ranges

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use synheart_synth::calories::total_calories;
use synheart_synth::{generate, SynthError};

fn day(offset: i64) -> String {
    let base = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    (base + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn series_sizes_follow_day_count(start in 0i64..400, span in 0i64..2, seed in any::<u64>()) {
        let bundle = generate(&day(start), &day(start + span), seed).unwrap();
        let days = (span + 1) as usize;

        prop_assert_eq!(bundle.heart_rate.len(), days * 8640);
        prop_assert_eq!(bundle.hrv.len(), days * 8640);
        prop_assert_eq!(bundle.spo2.len(), days * 8640);
        prop_assert_eq!(bundle.breathing_rate.len(), days * 1440);
        prop_assert_eq!(bundle.steps.len(), days * 1440);
        prop_assert_eq!(bundle.distance.len(), days * 1440);
        prop_assert_eq!(bundle.total_cals.len(), days);
    }

    #[test]
    fn clamped_signals_stay_in_bounds(seed in any::<u64>()) {
        let bundle = generate("2022-05-01", "2022-05-01", seed).unwrap();

        prop_assert!(bundle.spo2.values().all(|v| (95.0..=100.0).contains(v)));
        prop_assert!(bundle.breathing_rate.values().all(|v| (12.0..=20.0).contains(v)));
        prop_assert!(bundle.hrv.values().all(|v| v.is_finite()));
    }

    #[test]
    fn total_calories_are_the_component_sum(seed in any::<u64>()) {
        let bundle = generate("2022-01-01", "2022-01-02", seed).unwrap();

        for (date, total) in &bundle.total_cals {
            let expected = total_calories(
                bundle.rest_cals[date],
                bundle.work_cals[date],
                bundle.active_cals[date],
                bundle.step_cals[date],
            );
            prop_assert_eq!(*total, expected);
        }
    }

    #[test]
    fn sleep_detail_totals_eight_hours(seed in any::<u64>()) {
        let bundle = generate("2022-01-01", "2022-01-01", seed).unwrap();
        let detail = &bundle.sleep_detail;

        prop_assert!((detail.total_sleep_hours() - 8.0).abs() < 1e-9);
        prop_assert!(detail.rem_sleep_hours >= 0.0);
    }

    #[test]
    fn equal_seeds_give_equal_bundles(seed in any::<u64>()) {
        let a = generate("2022-03-01", "2022-03-01", seed).unwrap();
        let b = generate("2022-03-01", "2022-03-01", seed).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn reversed_ranges_are_rejected(start in 1i64..400, back in 1i64..30) {
        let result = generate(&day(start), &day(start - back), 0);
        prop_assert!(matches!(result, Err(SynthError::InvalidRange(_))));
    }
}
