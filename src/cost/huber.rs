use super::CostFunction;
use crate::error::{NetworkError, Result};

/// Huber cost: quadratic near the target, linear beyond `delta`.
#[derive(Debug, Clone, Copy)]
pub struct HuberCost {
    delta: f64,
}

impl HuberCost {
    /// `delta` must be finite and positive; anything else would let the
    /// linear branch go negative.
    pub fn new(delta: f64) -> Result<HuberCost> {
        if !delta.is_finite() || delta <= 0.0 {
            return Err(NetworkError::InvalidHyperparameter(format!(
                "huber delta must be finite and > 0, got {delta}"
            )));
        }
        Ok(HuberCost { delta })
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }
}

impl Default for HuberCost {
    fn default() -> Self {
        HuberCost { delta: 1.0 }
    }
}

impl CostFunction for HuberCost {
    fn name(&self) -> &str {
        "huber"
    }

    /// Σ h(predicted − expected)
    /// where h(x) = 0.5·x²  if |x| ≤ δ
    ///              δ·(|x| − 0.5·δ)  otherwise
    fn calculate(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| {
                let x = p - y;
                if x.abs() <= self.delta {
                    0.5 * x * x
                } else {
                    self.delta * (x.abs() - 0.5 * self.delta)
                }
            })
            .sum::<f64>()
    }

    /// Per-output gradient: x  if |x| ≤ δ,  else δ·sign(x)
    fn derivative(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| {
                let x = p - y;
                if x.abs() <= self.delta { x } else { self.delta * x.signum() }
            })
            .collect()
    }
}
