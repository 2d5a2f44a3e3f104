//! Pipeline orchestration
//!
//! This module provides the public generation API. It runs the stages in a
//! fixed order against a single random source:
//! base signals → movement → daily calories → activity → sleep session →
//! sleep detail.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::calories::synthesize_calories;
use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::movement::synthesize_movement;
use crate::range::DateRange;
use crate::sessions::{extract_sleep_session, synthesize_activity, synthesize_sleep_detail};
use crate::types::SyntheticBundle;
use crate::vitals::VitalsSynthesizer;

/// Generate a bundle with the default configuration.
///
/// # Arguments
/// * `start_date` - First day, `YYYY-MM-DD` (inclusive)
/// * `end_date` - Last day, `YYYY-MM-DD` (inclusive)
/// * `seed` - Seed for the random source; equal seeds give equal bundles
///
/// # Example
/// ```ignore
/// let bundle = generate("2022-01-01", "2022-01-07", 0)?;
/// assert_eq!(bundle.heart_rate.len(), 7 * 8640);
/// ```
pub fn generate(
    start_date: &str,
    end_date: &str,
    seed: u64,
) -> Result<SyntheticBundle, SynthError> {
    SyntheticGenerator::new(SynthConfig::default())?.generate(start_date, end_date, seed)
}

/// Configured generator, reusable across ranges and seeds.
///
/// The generator itself holds no random state; every call either seeds its own
/// source or borrows one from the caller. A caller-owned source must not be
/// shared between threads without external synchronization.
pub struct SyntheticGenerator {
    config: SynthConfig,
    vitals: VitalsSynthesizer,
}

impl SyntheticGenerator {
    /// Validate `config` and build a generator
    pub fn new(config: SynthConfig) -> Result<Self, SynthError> {
        config.validate()?;
        let vitals = VitalsSynthesizer::new(&config)?;
        Ok(Self { config, vitals })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Generate with a fresh `StdRng` seeded from `seed`
    pub fn generate(
        &self,
        start_date: &str,
        end_date: &str,
        seed: u64,
    ) -> Result<SyntheticBundle, SynthError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_with_rng(start_date, end_date, &mut rng)
    }

    /// Generate, drawing from a caller-owned random source
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        start_date: &str,
        end_date: &str,
        rng: &mut R,
    ) -> Result<SyntheticBundle, SynthError> {
        let range = DateRange::parse(start_date, end_date)?;
        Ok(self.generate_range(&range, rng))
    }

    /// Generate for an already validated range
    pub fn generate_range<R: Rng + ?Sized>(
        &self,
        range: &DateRange,
        rng: &mut R,
    ) -> SyntheticBundle {
        debug!(range = %range, days = range.num_days(), "generating synthetic biometrics");

        // Stage 1: base physiological signals
        let vitals = self.vitals.synthesize(range, rng);

        // Stage 2: steps and distance from heart rate
        let movement = synthesize_movement(&vitals.heart_rate, &self.config.sleep, rng);

        // Stage 3: daily calorie aggregates
        let calories = synthesize_calories(&vitals.heart_rate, &movement.steps, rng);

        // Stage 4-6: session summaries
        let activity = synthesize_activity(range, rng);
        let sleep_session = extract_sleep_session(&vitals.heart_rate, &self.config.sleep);
        let sleep_detail = synthesize_sleep_detail(range, rng);

        info!(
            range = %range,
            heart_rate_samples = vitals.heart_rate.len(),
            minute_samples = movement.steps.len(),
            restless_samples = sleep_session.len(),
            "synthetic biometrics generated"
        );

        SyntheticBundle {
            range: *range,
            tz_offset_minutes: self.config.timezone_offset_minutes,
            activity,
            heart_rate: vitals.heart_rate,
            breathing_rate: vitals.breathing_rate,
            hrv: vitals.hrv,
            spo2: vitals.spo2,
            rest_cals: calories.rest,
            work_cals: calories.work,
            active_cals: calories.active,
            step_cals: calories.step,
            total_cals: calories.total,
            sleep_session,
            sleep_detail,
            steps: movement.steps,
            distance: movement.distance,
        }
    }
}
