use tracing::trace;

use crate::{
    activation::Activation,
    error::{NetworkError, Result},
    init::Initializer,
    math::matrix::Matrix,
};

/// Where a layer is within the current training step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Forwarded,
    BackPropagated,
}

/// One affine transform `z = input·W + b` followed by an elementwise activation.
///
/// Besides its parameters a layer keeps three groups of state:
/// - forward caches (`last_input`, `last_preactivation`), overwritten by every
///   `feed_forward`;
/// - the gradients of the latest `back_propagate`, kept after the update so
///   they can be inspected;
/// - momentum velocities, zero at construction and changed only by
///   `perform_gradient_descent`. They are never reset for the lifetime of
///   the layer.
#[derive(Debug)]
pub struct Layer {
    index: usize,
    has_previous: bool,
    weights: Matrix,
    biases: Vec<f64>,
    activation: Box<dyn Activation>,
    last_input: Option<Vec<f64>>,
    last_preactivation: Option<Vec<f64>>,
    weight_gradient: Option<Matrix>,
    bias_gradient: Option<Vec<f64>>,
    gradient_to_previous: Option<Vec<f64>>,
    weight_velocity: Matrix,
    bias_velocity: Vec<f64>,
    phase: Phase,
}

impl Layer {
    /// Allocates an (inputs × outputs) layer, drawing every parameter from
    /// `initializer` in row-major order.
    pub fn new<A>(
        inputs: usize,
        outputs: usize,
        initializer: &mut dyn Initializer,
        activation: A,
    ) -> Result<Layer>
    where
        A: Activation + 'static,
    {
        Layer::with_boxed_activation(inputs, outputs, initializer, Box::new(activation))
    }

    pub fn with_boxed_activation(
        inputs: usize,
        outputs: usize,
        initializer: &mut dyn Initializer,
        activation: Box<dyn Activation>,
    ) -> Result<Layer> {
        if inputs == 0 || outputs == 0 {
            return Err(NetworkError::InvalidShape { inputs, outputs });
        }
        initializer.validate(inputs, outputs)?;

        let weights = Matrix::from_fn(inputs, outputs, |i, j| initializer.initial_weight(i, j));
        let biases = (0..outputs).map(|j| initializer.initial_bias(j)).collect();

        Ok(Layer {
            index: 0,
            has_previous: false,
            weights,
            biases,
            activation,
            last_input: None,
            last_preactivation: None,
            weight_gradient: None,
            bias_gradient: None,
            gradient_to_previous: None,
            weight_velocity: Matrix::zeros(inputs, outputs),
            bias_velocity: vec![0.0; outputs],
            phase: Phase::Idle,
        })
    }

    /// Records this layer's position in the chain. `previous` must produce
    /// exactly as many outputs as this layer takes inputs.
    ///
    /// Only `Network` links layers, once, when it is built.
    pub(crate) fn connect(&mut self, index: usize, previous: Option<&Layer>) -> Result<()> {
        if let Some(prev) = previous {
            if prev.output_dim() != self.input_dim() {
                return Err(NetworkError::shape_mismatch(
                    format!("layer {index} <- layer {}", index.saturating_sub(1)),
                    self.input_dim(),
                    prev.output_dim(),
                ));
            }
        }
        self.index = index;
        self.has_previous = previous.is_some();
        Ok(())
    }

    /// Forward pass for this layer alone; caches the input and the
    /// pre-activation for the backward pass.
    pub fn feed_forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim() {
            return Err(NetworkError::shape_mismatch(
                format!("layer {} input", self.index),
                self.input_dim(),
                input.len(),
            ));
        }

        let mut z = self.weights.vec_mul(input);
        for (zj, bj) in z.iter_mut().zip(self.biases.iter()) {
            *zj += bj;
        }
        let a = self.activation.transform_all(&z);

        self.last_input = Some(input.to_vec());
        self.last_preactivation = Some(z);
        self.phase = Phase::Forwarded;
        Ok(a)
    }

    /// Computes this layer's parameter gradients from ∂cost/∂output and
    /// returns ∂cost/∂input for the previous layer, or `None` when this is
    /// the first layer.
    pub fn back_propagate(&mut self, cost_gradient: &[f64]) -> Result<Option<Vec<f64>>> {
        if cost_gradient.len() != self.output_dim() {
            return Err(NetworkError::shape_mismatch(
                format!("layer {} output gradient", self.index),
                self.output_dim(),
                cost_gradient.len(),
            ));
        }
        let (input, z) = match (self.phase, &self.last_input, &self.last_preactivation) {
            (Phase::Forwarded, Some(input), Some(z)) => (input, z),
            _ => {
                return Err(NetworkError::StaleState {
                    layer: self.index,
                    operation: "back_propagate",
                })
            }
        };

        // δ = σ'(z) ⊙ ∂C/∂a
        let node_delta: Vec<f64> = self
            .activation
            .derivative_all(z)
            .iter()
            .zip(cost_gradient.iter())
            .map(|(d, g)| d * g)
            .collect();

        self.weight_gradient = Some(Matrix::outer(input, &node_delta));
        self.gradient_to_previous = if self.has_previous {
            Some(self.weights.mul_vec(&node_delta))
        } else {
            None
        };
        self.bias_gradient = Some(node_delta);
        self.phase = Phase::BackPropagated;

        trace!(layer = self.index, "computed gradients");
        Ok(self.gradient_to_previous.clone())
    }

    /// Momentum update of weights and biases from the latest gradients:
    /// `v = momentum·v − lr·grad; param += v`.
    pub fn perform_gradient_descent(&mut self, learning_rate: f64, momentum: f64) -> Result<()> {
        let (weight_gradient, bias_gradient) =
            match (self.phase, &self.weight_gradient, &self.bias_gradient) {
                (Phase::BackPropagated, Some(w), Some(b)) => (w, b),
                _ => {
                    return Err(NetworkError::StaleState {
                        layer: self.index,
                        operation: "perform_gradient_descent",
                    })
                }
            };

        self.weight_velocity.zip_apply(weight_gradient, |v, g| {
            *v = momentum * *v - learning_rate * g;
        });
        self.weights.zip_apply(&self.weight_velocity, |w, v| *w += v);

        let biases = self.biases.iter_mut().zip(self.bias_velocity.iter_mut());
        for ((b, v), g) in biases.zip(bias_gradient.iter()) {
            *v = momentum * *v - learning_rate * g;
            *b += *v;
        }

        self.phase = Phase::Idle;
        Ok(())
    }

    pub fn input_dim(&self) -> usize {
        self.weights.rows
    }

    pub fn output_dim(&self) -> usize {
        self.weights.cols
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    pub fn activation(&self) -> &dyn Activation {
        self.activation.as_ref()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// Entry-wise write access to weights and biases, e.g. for numerical
    /// gradient checks. The shapes cannot change through it.
    pub fn parameters_mut(&mut self) -> ParametersMut<'_> {
        ParametersMut {
            weights: &mut self.weights,
            biases: &mut self.biases,
        }
    }

    pub fn last_input(&self) -> Option<&[f64]> {
        self.last_input.as_deref()
    }

    pub fn last_preactivation(&self) -> Option<&[f64]> {
        self.last_preactivation.as_deref()
    }

    pub fn weight_gradient(&self) -> Option<&Matrix> {
        self.weight_gradient.as_ref()
    }

    pub fn bias_gradient(&self) -> Option<&[f64]> {
        self.bias_gradient.as_deref()
    }

    pub fn gradient_to_previous(&self) -> Option<&[f64]> {
        self.gradient_to_previous.as_deref()
    }

    pub fn weight_velocity(&self) -> &Matrix {
        &self.weight_velocity
    }

    pub fn bias_velocity(&self) -> &[f64] {
        &self.bias_velocity
    }
}

/// Mutable view of one layer's weights and biases. Indices panic when out
/// of range, like slice indexing.
#[derive(Debug)]
pub struct ParametersMut<'a> {
    weights: &'a mut Matrix,
    biases: &'a mut [f64],
}

impl ParametersMut<'_> {
    pub fn weight_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.weights.data[i][j]
    }

    pub fn bias_mut(&mut self, j: usize) -> &mut f64 {
        &mut self.biases[j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::init::{Constant, Explicit};
    use approx::assert_abs_diff_eq;

    fn identity_layer() -> Layer {
        let mut init = Explicit {
            weights: vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            biases: vec![0.5, -0.5],
        };
        Layer::new(3, 2, &mut init, ActivationFunction::Identity).unwrap()
    }

    #[test]
    fn test_layer_creation() {
        let layer = identity_layer();
        assert_eq!((layer.input_dim(), layer.output_dim()), (3, 2));
        assert_eq!(layer.parameter_count(), 8);
        assert_eq!(layer.weight_velocity(), &Matrix::zeros(3, 2));
        assert_eq!(layer.bias_velocity(), &[0.0, 0.0]);
    }

    #[test]
    fn test_zero_dimension_is_invalid_shape() {
        let mut init = Constant { weight: 0.0, bias: 0.0 };
        let err = Layer::new(0, 2, &mut init, ActivationFunction::Sigmoid).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidShape { inputs: 0, outputs: 2 }));
        let err = Layer::new(2, 0, &mut init, ActivationFunction::Sigmoid).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidShape { .. }));
    }

    #[test]
    fn test_forward_pass_caches_input_and_preactivation() {
        let mut layer = identity_layer();
        let out = layer.feed_forward(&[1.0, 0.0, -1.0]).unwrap();
        // [1 - 5 + 0.5, 2 - 6 - 0.5]
        assert_eq!(out, vec![-3.5, -4.5]);
        assert_eq!(layer.last_input(), Some(&[1.0, 0.0, -1.0][..]));
        assert_eq!(layer.last_preactivation(), Some(&[-3.5, -4.5][..]));
    }

    #[test]
    fn test_forward_rejects_wrong_input_length() {
        let mut layer = identity_layer();
        let err = layer.feed_forward(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_back_propagate_without_forward_is_stale() {
        let mut layer = identity_layer();
        let err = layer.back_propagate(&[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, NetworkError::StaleState { operation: "back_propagate", .. }));
    }

    #[test]
    fn test_update_without_backward_is_stale() {
        let mut layer = identity_layer();
        layer.feed_forward(&[1.0, 1.0, 1.0]).unwrap();
        let err = layer.perform_gradient_descent(0.1, 0.0).unwrap_err();
        assert!(matches!(err, NetworkError::StaleState { operation: "perform_gradient_descent", .. }));
    }

    #[test]
    fn test_second_update_in_same_step_is_stale() {
        let mut layer = identity_layer();
        layer.feed_forward(&[1.0, 1.0, 1.0]).unwrap();
        layer.back_propagate(&[1.0, 1.0]).unwrap();
        layer.perform_gradient_descent(0.1, 0.0).unwrap();
        assert!(layer.perform_gradient_descent(0.1, 0.0).is_err());
        assert!(layer.back_propagate(&[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_gradients_for_identity_activation() {
        let mut layer = identity_layer();
        layer.feed_forward(&[1.0, 2.0, 3.0]).unwrap();
        let upstream = layer.back_propagate(&[1.0, -1.0]).unwrap();

        // Unconnected layers behave as the first layer: nothing to hand back.
        assert!(upstream.is_none());
        assert!(layer.gradient_to_previous().is_none());

        let wg = layer.weight_gradient().unwrap();
        assert_eq!(wg.data, vec![vec![1.0, -1.0], vec![2.0, -2.0], vec![3.0, -3.0]]);
        assert_eq!(layer.bias_gradient(), Some(&[1.0, -1.0][..]));
    }

    #[test]
    fn test_gradient_to_previous_when_connected() {
        let mut prev_init = Constant { weight: 0.0, bias: 0.0 };
        let prev = Layer::new(1, 3, &mut prev_init, ActivationFunction::Identity).unwrap();
        let mut layer = identity_layer();
        layer.connect(1, Some(&prev)).unwrap();

        layer.feed_forward(&[1.0, 2.0, 3.0]).unwrap();
        let upstream = layer.back_propagate(&[1.0, -1.0]).unwrap().unwrap();
        // W · δ = [1 - 2, 3 - 4, 5 - 6]
        assert_eq!(upstream, vec![-1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_connect_rejects_mismatched_neighbour() {
        let mut prev_init = Constant { weight: 0.0, bias: 0.0 };
        let prev = Layer::new(1, 4, &mut prev_init, ActivationFunction::Identity).unwrap();
        let mut layer = identity_layer();
        let err = layer.connect(1, Some(&prev)).unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { expected: 3, actual: 4, .. }));
    }

    #[test]
    fn test_parameters_mut_edits_in_place() {
        let mut layer = identity_layer();
        {
            let mut params = layer.parameters_mut();
            *params.weight_mut(2, 1) = 0.0;
            *params.bias_mut(0) += 1.0;
        }
        assert_eq!(layer.weights().get(2, 1), 0.0);
        assert_eq!(layer.biases(), &[1.5, -0.5]);
        assert_eq!((layer.input_dim(), layer.output_dim()), (3, 2));
    }

    #[test]
    fn test_zero_momentum_is_plain_gradient_descent() {
        let mut layer = identity_layer();
        let before = layer.weights().clone();
        let biases_before = layer.biases().to_vec();

        layer.feed_forward(&[1.0, 2.0, 3.0]).unwrap();
        layer.back_propagate(&[0.5, -0.25]).unwrap();
        layer.perform_gradient_descent(0.1, 0.0).unwrap();

        let grad = layer.weight_gradient().unwrap().clone();
        for i in 0..3 {
            for j in 0..2 {
                assert_abs_diff_eq!(
                    layer.weights().get(i, j),
                    before.get(i, j) - 0.1 * grad.get(i, j),
                    epsilon = 1e-12
                );
            }
        }
        assert_abs_diff_eq!(layer.biases()[0], biases_before[0] - 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.biases()[1], biases_before[1] + 0.025, epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_accumulates_across_steps() {
        let mut layer = identity_layer();
        let start = layer.biases()[0];

        for _ in 0..2 {
            layer.feed_forward(&[0.0, 0.0, 0.0]).unwrap();
            layer.back_propagate(&[1.0, 0.0]).unwrap();
            layer.perform_gradient_descent(0.1, 0.9).unwrap();
        }

        // v1 = -0.1, v2 = 0.9·(-0.1) - 0.1 = -0.19
        assert_abs_diff_eq!(layer.bias_velocity()[0], -0.19, epsilon = 1e-12);
        assert_abs_diff_eq!(layer.biases()[0], start - 0.29, epsilon = 1e-12);
        // Zero input means zero weight gradient, so weights never moved.
        assert_eq!(layer.weight_velocity(), &Matrix::zeros(3, 2));
    }
}
