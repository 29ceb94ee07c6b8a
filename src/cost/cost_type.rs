use serde::{Serialize, Deserialize};

use super::{BinaryCrossEntropy, CostFunction, HuberCost, QuadraticCost};
use crate::error::Result;

/// Selects which cost function a network description trains against.
///
/// - `Quadratic`          — `0.5·Σ(o − t)²`; pair with Identity, Sigmoid or Tanh output.
/// - `BinaryCrossEntropy` — needs a Sigmoid output; `NetworkSpec::build`
///                          rejects any other output activation.
/// - `Huber`              — robust to outliers; pair with Identity output.
///                          `delta` must be finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    #[default]
    Quadratic,
    BinaryCrossEntropy,
    Huber { delta: f64 },
}

impl CostType {
    pub fn build(self) -> Result<Box<dyn CostFunction>> {
        let cost: Box<dyn CostFunction> = match self {
            CostType::Quadratic => Box::new(QuadraticCost),
            CostType::BinaryCrossEntropy => Box::new(BinaryCrossEntropy),
            CostType::Huber { delta } => Box::new(HuberCost::new(delta)?),
        };
        Ok(cost)
    }
}
