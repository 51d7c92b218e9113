//! Seeded synthetic health series for demo and fallback use.
//!
//! Generation never touches ambient random state: callers pass the RNG (or a seed),
//! so the same seed and end date always give the same series.

use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Exp1, StandardNormal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{HealthRecord, HealthSeries};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Seed used when no real data exists and the caller does not choose one
pub const DEFAULT_SEED: u64 = 42;

/// Shape of a generated series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SyntheticProfile {
    /// One month of stationary readings, standing in for vitals extracted from a document
    DocumentSample,

    /// Three months of readings with slow sinusoidal drift, used for the demo dashboard
    DemoTrend,
}

impl SyntheticProfile {
    /// Number of daily rows generated
    pub fn days(&self) -> usize {
        match self {
            SyntheticProfile::DocumentSample => 31,
            SyntheticProfile::DemoTrend => 91,
        }
    }
}

/// Deterministic RNG for the given seed
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generate a series ending at `end_date` with the given profile
pub fn generate_series<R: Rng + ?Sized>(
    profile: SyntheticProfile,
    end_date: NaiveDate,
    rng: &mut R,
) -> HealthSeries {
    let days = profile.days();
    let start = end_date - Duration::days(days as i64 - 1);

    let records = (0..days)
        .map(|i| {
            let date = start + Duration::days(i as i64);
            match profile {
                SyntheticProfile::DocumentSample => document_sample_row(date, rng),
                SyntheticProfile::DemoTrend => demo_trend_row(date, i as f64, rng),
            }
        })
        .collect();

    debug!("Generated {} synthetic records ({:?})", days, profile);
    HealthSeries::from_ordered(records)
}

/// Convenience wrapper seeding a fresh RNG
pub fn generate_with_seed(profile: SyntheticProfile, end_date: NaiveDate, seed: u64) -> HealthSeries {
    generate_series(profile, end_date, &mut seeded_rng(seed))
}

fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

fn document_sample_row<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> HealthRecord {
    HealthRecord {
        date,
        heart_rate: gaussian(rng, 75.0, 8.0),
        systolic_bp: gaussian(rng, 125.0, 12.0),
        diastolic_bp: gaussian(rng, 82.0, 8.0),
        blood_glucose: gaussian(rng, 98.0, 15.0),
        temperature: Some(gaussian(rng, 98.6, 0.8)),
        weight: Some(gaussian(rng, 70.0, 2.0)),
        sleep_hours: Some(gaussian(rng, 7.5, 1.2)),
    }
}

fn demo_trend_row<R: Rng + ?Sized>(date: NaiveDate, i: f64, rng: &mut R) -> HealthRecord {
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let jitter: f64 = rng.sample(Exp1);

    HealthRecord {
        date,
        heart_rate: gaussian(rng, 72.0, 6.0) + (i * 0.1).sin() * 3.0,
        systolic_bp: gaussian(rng, 120.0, 8.0) + (i * 0.05).sin() * 5.0,
        diastolic_bp: gaussian(rng, 80.0, 6.0) + (i * 0.05).sin() * 3.0,
        blood_glucose: gaussian(rng, 95.0, 12.0) + sign * jitter * 2.0,
        temperature: None,
        weight: Some(gaussian(rng, 70.0, 0.5)),
        sleep_hours: Some(gaussian(rng, 7.5, 1.0)),
    }
}
