use serde::{Serialize, Deserialize};
use std::fmt;

/// An elementwise, differentiable scalar function applied after a layer's
/// affine transform.
///
/// `derivative` always receives the pre-activation value `z`, never the
/// transformed output. Variants whose derivative is naturally written in
/// terms of the output must recompute `transform(z)` first.
pub trait Activation: fmt::Debug {
    fn name(&self) -> &str;

    fn transform(&self, z: f64) -> f64;

    /// d transform / dz, evaluated at the pre-activation `z`.
    fn derivative(&self, z: f64) -> f64;

    fn transform_all(&self, z: &[f64]) -> Vec<f64> {
        z.iter().map(|&x| self.transform(x)).collect()
    }

    fn derivative_all(&self, z: &[f64]) -> Vec<f64> {
        z.iter().map(|&x| self.derivative(x)).collect()
    }
}

/// Built-in activations, selectable by name in a network description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    Tanh,
    Identity,
    #[serde(rename = "relu")]
    ReLU,
    #[serde(rename = "leaky_relu")]
    LeakyReLU { alpha: f64 },
    Elu { alpha: f64 },
    Swish,
    Softplus,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Activation for ActivationFunction {
    fn name(&self) -> &str {
        match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::Identity => "identity",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::LeakyReLU { .. } => "leaky_relu",
            ActivationFunction::Elu { .. } => "elu",
            ActivationFunction::Swish => "swish",
            ActivationFunction::Softplus => "softplus",
        }
    }

    fn transform(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Elu { alpha } => {
                if x > 0.0 { x } else { alpha * x.exp_m1() }
            }
            ActivationFunction::Swish => x * sigmoid(x),
            // ln(1 + e^x), written to stay finite for large |x|
            ActivationFunction::Softplus => x.max(0.0) + (-x.abs()).exp().ln_1p(),
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.transform(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::Tanh => {
                // (1 - a)(1 + a) with a = tanh(z)
                let a = self.transform(x);
                (1.0 - a) * (1.0 + a)
            }
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { 1.0 } else { *alpha },
            ActivationFunction::Elu { alpha } => {
                if x > 0.0 { 1.0 } else { alpha * x.exp() }
            }
            ActivationFunction::Swish => {
                let sig = sigmoid(x);
                sig + x * sig * (1.0 - sig)
            }
            ActivationFunction::Softplus => sigmoid(x),
        }
    }
}
