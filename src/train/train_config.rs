use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// Hyperparameters for a `train_network` run.
///
/// # Fields
/// - `epochs`        — full passes over the training data, at least 1
/// - `learning_rate` — gradient descent step size, positive
/// - `momentum`      — velocity decay in [0, 1); 0 disables momentum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    #[serde(default)]
    pub momentum: f64,
}

impl TrainConfig {
    /// Plain gradient descent (no momentum).
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            momentum: 0.0,
        }
    }

    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NetworkError::InvalidHyperparameter(
                "number of epochs must be at least 1".to_string(),
            ));
        }
        validate_step(self.learning_rate, self.momentum)
    }
}

/// Checks the per-step hyperparameters: `learning_rate > 0` and
/// `momentum ∈ [0, 1)`.
pub(crate) fn validate_step(learning_rate: f64, momentum: f64) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(NetworkError::InvalidHyperparameter(format!(
            "learning rate must be positive, got {learning_rate}"
        )));
    }
    if !(0.0..1.0).contains(&momentum) {
        return Err(NetworkError::InvalidHyperparameter(format!(
            "momentum must be in [0, 1), got {momentum}"
        )));
    }
    Ok(())
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(1000, 0.1)
    }
}
