use std::fmt;

pub mod bce;
pub mod cost_type;
pub mod huber;
pub mod quadratic;

pub use bce::BinaryCrossEntropy;
pub use cost_type::CostType;
pub use huber::HuberCost;
pub use quadratic::QuadraticCost;

/// A differentiable scalar cost over one (output, target) pair.
///
/// Both slices have the output layer's length; the network checks this
/// before calling in.
pub trait CostFunction: fmt::Debug {
    fn name(&self) -> &str;

    fn calculate(&self, output: &[f64], target: &[f64]) -> f64;

    /// ∂cost/∂output, one entry per output neuron.
    fn derivative(&self, output: &[f64], target: &[f64]) -> Vec<f64>;
}
