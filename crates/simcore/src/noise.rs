//! Gaussian noise sources for stochastic geometry perturbation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Source of normally distributed samples
pub trait NoiseSource: Send {
    /// Draw one sample from N(mean, std_dev²).
    ///
    /// A `std_dev` of zero returns `mean` exactly.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64;
}

/// Gaussian generator backed by a seedable [`StdRng`]
///
/// Without a seed the generator is initialised from system entropy.
/// Seeded generators produce reproducible sequences, which the tests rely on.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: StdRng,
    seed: Option<u64>,
}

impl GaussianNoise {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng, seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(None)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Restart the sequence from a new seed
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = Some(seed);
    }
}

impl Default for GaussianNoise {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl NoiseSource for GaussianNoise {
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        if std_dev == 0.0 {
            return mean;
        }
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std_dev * z
    }
}
