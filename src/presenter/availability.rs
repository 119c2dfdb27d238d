use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Answers whether a calendar cell can be booked.
pub trait AvailabilityProvider {
    fn query_availability(&mut self, day: &str, time: &str) -> bool;
}

/// Independent random draw per cell.
#[derive(Debug, Clone)]
pub struct RandomAvailability {
    rng: StdRng,
    ratio: f64,
}

impl RandomAvailability {
    pub const DEFAULT_RATIO: f64 = 0.6;

    /// Seeded when `seed` is given, otherwise drawn from OS entropy.
    pub fn new(ratio: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            ratio: ratio.clamp(0.0, 1.0),
        }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

impl Default for RandomAvailability {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATIO, None)
    }
}

impl AvailabilityProvider for RandomAvailability {
    fn query_availability(&mut self, _day: &str, _time: &str) -> bool {
        self.rng.gen_bool(self.ratio)
    }
}

/// Deterministic availability: every cell is open except the blocked ones.
#[derive(Debug, Clone, Default)]
pub struct FixedAvailability {
    blocked: BTreeSet<(String, String)>,
}

impl FixedAvailability {
    pub fn all_available() -> Self {
        Self::default()
    }

    pub fn block(mut self, day: &str, time: &str) -> Self {
        self.blocked.insert((day.to_string(), time.to_string()));
        self
    }
}

impl AvailabilityProvider for FixedAvailability {
    fn query_availability(&mut self, day: &str, time: &str) -> bool {
        !self
            .blocked
            .contains(&(day.to_string(), time.to_string()))
    }
}
