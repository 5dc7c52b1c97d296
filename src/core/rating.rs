use crate::models::RatingBounds;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of uniform samples used to synthesize display ratings
pub trait RatingSource: Send + Sync {
    /// Uniform sample in `[low, high)`
    fn sample(&self, low: f64, high: f64) -> f64;
}

/// Thread-local RNG; a new draw on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RatingSource for ThreadRngSource {
    fn sample(&self, low: f64, high: f64) -> f64 {
        rand::thread_rng().gen_range(low..high)
    }
}

/// Seeded RNG for reproducible ratings
#[derive(Debug)]
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RatingSource for SeededSource {
    fn sample(&self, low: f64, high: f64) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(low..high)
    }
}

/// Draw a display rating within `bounds`, truncated to one decimal
///
/// Truncation keeps the result strictly below `bounds.max`. Empty or
/// non-finite bounds yield `bounds.min` without sampling.
pub fn synthesize_rating(source: &dyn RatingSource, bounds: RatingBounds) -> f64 {
    if !(bounds.min.is_finite() && bounds.max.is_finite()) || bounds.max <= bounds.min {
        return bounds.min;
    }
    let raw = source.sample(bounds.min, bounds.max);
    let truncated = (raw * 10.0).floor() / 10.0;
    truncated.max(bounds.min)
}
