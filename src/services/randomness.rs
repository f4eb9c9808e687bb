//! Injected randomness for every random-driven rule (oracle walk, dice,
//! regulation coin flip), so outcomes can be scripted or seeded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples.
pub trait RandomSource: Send {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform sample in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }

    /// Six-sided die, 1 through 6.
    fn dice_roll(&mut self) -> u8 {
        let face = (self.next_unit() * 6.0).floor() as u8 + 1;
        face.min(6)
    }
}

/// `StdRng`-backed source, reproducible when built from a seed.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when a seed is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
