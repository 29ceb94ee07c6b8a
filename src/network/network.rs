use tracing::{debug, trace};

use crate::{
    cost::CostFunction,
    error::{NetworkError, Result},
    layers::dense::{Layer, ParametersMut},
    train::{train_config::validate_step, TrainingExample, TrainingProgress},
};

/// An ordered chain of layers plus the cost it is trained against.
///
/// Layer 0 is the input boundary (no previous layer) and the last layer is
/// the output boundary; for a single-layer network they are the same layer.
/// The topology is fixed at construction; training only changes each
/// layer's numeric state. Layers are linked only here, so the chain cannot
/// be re-wired from outside:
///
/// ```compile_fail
/// # use backprop_nn::{ActivationFunction, Layer, Network, QuadraticCost};
/// # use backprop_nn::init::Constant;
/// let mut init = Constant { weight: 0.1, bias: 0.0 };
/// let layer = Layer::new(2, 1, &mut init, ActivationFunction::Sigmoid).unwrap();
/// let mut net = Network::new(vec![layer], QuadraticCost).unwrap();
/// net.layers_mut()[0].connect(5, None).unwrap();
/// ```
///
/// ```compile_fail
/// # use backprop_nn::{ActivationFunction, Layer};
/// # use backprop_nn::init::Constant;
/// let mut init = Constant { weight: 0.1, bias: 0.0 };
/// let mut layer = Layer::new(2, 1, &mut init, ActivationFunction::Sigmoid).unwrap();
/// layer.connect(3, None).unwrap();
/// ```
#[derive(Debug)]
pub struct Network {
    layers: Vec<Layer>,
    cost: Box<dyn CostFunction>,
}

impl Network {
    /// Connects `layers` in order. Fails with `EmptyLayout` for an empty
    /// sequence and `ShapeMismatch` when neighbouring dimensions disagree.
    pub fn new<C>(layers: Vec<Layer>, cost: C) -> Result<Network>
    where
        C: CostFunction + 'static,
    {
        Network::with_boxed_cost(layers, Box::new(cost))
    }

    pub fn with_boxed_cost(mut layers: Vec<Layer>, cost: Box<dyn CostFunction>) -> Result<Network> {
        if layers.is_empty() {
            return Err(NetworkError::EmptyLayout);
        }

        layers[0].connect(0, None)?;
        for i in 1..layers.len() {
            let (head, tail) = layers.split_at_mut(i);
            tail[0].connect(i, head.last())?;
        }

        for layer in &layers {
            debug!(
                layer = layer.index(),
                inputs = layer.input_dim(),
                outputs = layer.output_dim(),
                activation = layer.activation().name(),
                "connected layer"
            );
        }

        Ok(Network { layers, cost })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Write access to one layer's weights and biases. `None` when `index`
    /// is past the last layer.
    pub fn layer_parameters_mut(&mut self, index: usize) -> Option<ParametersMut<'_>> {
        self.layers.get_mut(index).map(Layer::parameters_mut)
    }

    pub fn first_layer(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn last_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn cost(&self) -> &dyn CostFunction {
        self.cost.as_ref()
    }

    pub fn input_dim(&self) -> usize {
        self.first_layer().input_dim()
    }

    pub fn output_dim(&self) -> usize {
        self.last_layer().output_dim()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    /// Evaluates the network. The result depends only on the current
    /// parameters and `input`; the per-layer forward caches it overwrites
    /// are internal.
    pub fn query(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)
    }

    /// One full forward / backward / update cycle on a single example.
    /// Returns the example's cost measured before the update.
    pub fn train_one_example(
        &mut self,
        input: &[f64],
        target: &[f64],
        learning_rate: f64,
        momentum: f64,
    ) -> Result<f64> {
        validate_step(learning_rate, momentum)?;
        self.check_example(input, target)?;

        let output = self.forward(input)?;
        let gradient = self.cost.derivative(&output, target);
        self.backward(gradient)?;
        for layer in &mut self.layers {
            layer.perform_gradient_descent(learning_rate, momentum)?;
        }

        let cost = self.cost.calculate(&output, target);
        trace!(cost, "trained one example");
        Ok(cost)
    }

    /// Trains for `epochs` passes over `examples`, strictly in order, and
    /// returns the mean cost of the last epoch.
    ///
    /// `observer` is called after every example with the running mean cost
    /// of the current epoch.
    pub fn train(
        &mut self,
        examples: &[TrainingExample],
        epochs: usize,
        learning_rate: f64,
        momentum: f64,
        mut observer: Option<&mut dyn FnMut(&TrainingProgress)>,
    ) -> Result<f64> {
        validate_step(learning_rate, momentum)?;
        if epochs == 0 {
            return Err(NetworkError::InvalidHyperparameter(
                "number of epochs must be at least 1".to_string(),
            ));
        }
        if examples.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        // Reject bad data before the first update touches any parameter.
        for example in examples {
            self.check_example(&example.input, &example.target)?;
        }

        let mut mean_cost = 0.0;
        for epoch in 0..epochs {
            let mut total = 0.0;
            for (i, example) in examples.iter().enumerate() {
                total += self.train_one_example(
                    &example.input,
                    &example.target,
                    learning_rate,
                    momentum,
                )?;
                mean_cost = total / (i + 1) as f64;

                if let Some(notify) = observer.as_deref_mut() {
                    notify(&TrainingProgress {
                        epoch,
                        total_epochs: epochs,
                        example: i,
                        total_examples: examples.len(),
                        mean_cost,
                    });
                }
            }
            debug!(epoch, mean_cost, "finished epoch");
        }

        Ok(mean_cost)
    }

    /// Left to right: each layer's output feeds the next.
    fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let mut current = self.layers[0].feed_forward(input)?;
        for layer in &mut self.layers[1..] {
            current = layer.feed_forward(&current)?;
        }
        Ok(current)
    }

    /// Right to left: each layer hands ∂cost/∂input to its predecessor. The
    /// first layer returns `None`, which ends the pass.
    fn backward(&mut self, cost_gradient: Vec<f64>) -> Result<()> {
        let mut gradient = Some(cost_gradient);
        for layer in self.layers.iter_mut().rev() {
            let Some(g) = gradient.take() else { break };
            gradient = layer.back_propagate(&g)?;
        }
        Ok(())
    }

    fn check_example(&self, input: &[f64], target: &[f64]) -> Result<()> {
        if input.len() != self.input_dim() {
            return Err(NetworkError::shape_mismatch("network input", self.input_dim(), input.len()));
        }
        if target.len() != self.output_dim() {
            return Err(NetworkError::shape_mismatch("target", self.output_dim(), target.len()));
        }
        Ok(())
    }
}
