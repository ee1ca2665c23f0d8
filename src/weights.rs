//! Random initial weights, scaled by fan-in.

use rand::{Rng, SeedableRng, StdRng};

use crate::error::ConfigurationError;

/// A source of initial weights for the connection matrices.
///
/// Weights are drawn uniformly from `(-1/sqrt(fan_in), 1/sqrt(fan_in))`,
/// where `fan_in` is the number of inputs feeding the receiving neuron. The
/// narrowing keeps initial pre-activation magnitudes roughly independent of
/// layer width.
///
/// One source is threaded through an entire network construction, so a
/// seeded source reproduces the exact initial weights of every connection.
#[derive(Debug)]
pub struct WeightSource {
    rng: StdRng,
}

impl WeightSource {
    /// Creates a source seeded from thread-local entropy.
    pub fn new() -> WeightSource {
        let mut seeder = rand::thread_rng();
        let seed: Vec<usize> = (0..4).map(|_| seeder.gen()).collect();
        WeightSource {
            rng: StdRng::from_seed(&seed[..]),
        }
    }

    /// Creates a source with a fixed seed, for reproducible weight streams.
    pub fn from_seed(seed: usize) -> WeightSource {
        WeightSource {
            rng: StdRng::from_seed(&[seed][..]),
        }
    }

    /// Draws the next initial weight for a neuron fed by `fan_in` inputs.
    ///
    /// Fails with [`ConfigurationError::InvalidFanIn`] when `fan_in` is zero.
    pub fn next_weight(&mut self, fan_in: usize) -> Result<f64, ConfigurationError> {
        if fan_in == 0 {
            return Err(ConfigurationError::InvalidFanIn);
        }
        // Two uniforms in [0, 1) summed land in [0, 2); shifting by one
        // centers the spread in (-1, 1) before the fan-in narrows it.
        let spread = self.rng.next_f64() + self.rng.next_f64() - 1.0;
        Ok(spread / (fan_in as f64).sqrt())
    }
}
