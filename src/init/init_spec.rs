use serde::{Serialize, Deserialize};

use super::initializer::{Constant, Distribution, Explicit, Initializer, Random};

/// Serializable choice of initializer for one layer of a network description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitSpec {
    Constant {
        #[serde(default)]
        weight: f64,
        #[serde(default)]
        bias: f64,
    },
    Explicit {
        weights: Vec<Vec<f64>>,
        biases: Vec<f64>,
    },
    Uniform {
        limit: f64,
        #[serde(default)]
        seed: u64,
    },
    Xavier {
        #[serde(default)]
        seed: u64,
    },
    He {
        #[serde(default)]
        seed: u64,
    },
}

impl Default for InitSpec {
    fn default() -> Self {
        InitSpec::Xavier { seed: 0 }
    }
}

impl InitSpec {
    /// `fan_in` is the input dimension of the layer being initialized.
    pub fn build(&self, fan_in: usize) -> Box<dyn Initializer> {
        match self {
            InitSpec::Constant { weight, bias } => Box::new(Constant { weight: *weight, bias: *bias }),
            InitSpec::Explicit { weights, biases } => Box::new(Explicit {
                weights: weights.clone(),
                biases: biases.clone(),
            }),
            InitSpec::Uniform { limit, seed } => {
                Box::new(Random::new(Distribution::Uniform { limit: *limit }, fan_in, *seed))
            }
            InitSpec::Xavier { seed } => Box::new(Random::new(Distribution::Xavier, fan_in, *seed)),
            InitSpec::He { seed } => Box::new(Random::new(Distribution::He, fan_in, *seed)),
        }
    }
}
