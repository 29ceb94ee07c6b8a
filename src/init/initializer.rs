use rand::prelude::*;
use rand::rngs::StdRng;
use std::f64::consts::PI;

use crate::error::{NetworkError, Result};

/// Supplies the starting parameters of one layer.
///
/// `i` indexes the layer's inputs and `j` its outputs, so `initial_weight`
/// is called once per entry of the (inputs × outputs) weight matrix and
/// `initial_bias` once per output neuron. Calls happen row by row, which
/// keeps seeded initializers reproducible.
pub trait Initializer {
    /// Checked before any value is drawn.
    fn validate(&self, _inputs: usize, _outputs: usize) -> Result<()> {
        Ok(())
    }

    fn initial_weight(&mut self, i: usize, j: usize) -> f64;

    fn initial_bias(&mut self, j: usize) -> f64;
}

/// Every weight and bias gets the same value.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    pub weight: f64,
    pub bias: f64,
}

impl Initializer for Constant {
    fn initial_weight(&mut self, _i: usize, _j: usize) -> f64 {
        self.weight
    }

    fn initial_bias(&mut self, _j: usize) -> f64 {
        self.bias
    }
}

/// Fixed tables, e.g. hand-picked weights for a worked example.
#[derive(Debug, Clone)]
pub struct Explicit {
    /// Shape (inputs × outputs).
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl Initializer for Explicit {
    fn validate(&self, inputs: usize, outputs: usize) -> Result<()> {
        if self.weights.len() != inputs {
            return Err(NetworkError::InvalidInitializer(format!(
                "expected {inputs} weight rows, got {}",
                self.weights.len()
            )));
        }
        if let Some((row, values)) = self.weights.iter().enumerate().find(|(_, r)| r.len() != outputs) {
            return Err(NetworkError::InvalidInitializer(format!(
                "weight row {row} has {} entries, expected {outputs}",
                values.len()
            )));
        }
        if self.biases.len() != outputs {
            return Err(NetworkError::InvalidInitializer(format!(
                "expected {outputs} biases, got {}",
                self.biases.len()
            )));
        }
        Ok(())
    }

    fn initial_weight(&mut self, i: usize, j: usize) -> f64 {
        self.weights[i][j]
    }

    fn initial_bias(&mut self, j: usize) -> f64 {
        self.biases[j]
    }
}

/// How a `Random` initializer draws its weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Uniform on [-limit, limit].
    Uniform { limit: f64 },
    /// Xavier (Glorot): N(0, sqrt(1 / fan_in)).
    ///
    /// Suited to Sigmoid/Tanh/Identity layers. Keeps the variance of
    /// activations and gradients roughly equal across layers.
    Xavier,
    /// He: N(0, sqrt(2 / fan_in)).
    ///
    /// Suited to ReLU layers. The variance 2/fan_in accounts for ReLU
    /// zeroing half of its inputs on average.
    He,
}

/// Seeded random weights, zero biases.
#[derive(Debug, Clone)]
pub struct Random {
    distribution: Distribution,
    fan_in: usize,
    rng: StdRng,
}

impl Random {
    pub fn new(distribution: Distribution, fan_in: usize, seed: u64) -> Random {
        Random {
            distribution,
            fan_in,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal(&mut self) -> f64 {
        // Both uniforms in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = 1.0 - self.rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

impl Initializer for Random {
    fn validate(&self, inputs: usize, _outputs: usize) -> Result<()> {
        if self.fan_in != inputs {
            return Err(NetworkError::InvalidInitializer(format!(
                "random initializer built for fan-in {}, layer has {inputs} inputs",
                self.fan_in
            )));
        }
        if let Distribution::Uniform { limit } = self.distribution {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(NetworkError::InvalidInitializer(format!(
                    "uniform limit must be positive, got {limit}"
                )));
            }
        }
        Ok(())
    }

    fn initial_weight(&mut self, _i: usize, _j: usize) -> f64 {
        match self.distribution {
            Distribution::Uniform { limit } => self.rng.gen_range(-limit..=limit),
            Distribution::Xavier => {
                let std_dev = (1.0 / self.fan_in as f64).sqrt();
                self.sample_standard_normal() * std_dev
            }
            Distribution::He => {
                let std_dev = (2.0 / self.fan_in as f64).sqrt();
                self.sample_standard_normal() * std_dev
            }
        }
    }

    fn initial_bias(&mut self, _j: usize) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_rejects_wrong_shape() {
        let init = Explicit {
            weights: vec![vec![0.1, 0.2], vec![0.3]],
            biases: vec![0.0, 0.0],
        };
        assert!(matches!(init.validate(2, 2), Err(NetworkError::InvalidInitializer(_))));
        assert!(matches!(init.validate(3, 2), Err(NetworkError::InvalidInitializer(_))));
    }

    #[test]
    fn test_random_is_reproducible_per_seed() {
        let draw = |seed| {
            let mut init = Random::new(Distribution::Xavier, 4, seed);
            (0..8).map(|k| init.initial_weight(k / 2, k % 2)).collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
        assert_ne!(draw(42), draw(43));
    }

    #[test]
    fn test_uniform_respects_limit() {
        let mut init = Random::new(Distribution::Uniform { limit: 0.25 }, 3, 1);
        for k in 0..200 {
            let w = init.initial_weight(k % 3, 0);
            assert!((-0.25..=0.25).contains(&w));
        }
        assert_eq!(init.initial_bias(0), 0.0);
    }

    #[test]
    fn test_random_checks_fan_in() {
        let init = Random::new(Distribution::He, 5, 0);
        assert!(init.validate(5, 2).is_ok());
        assert!(init.validate(4, 2).is_err());
    }
}
