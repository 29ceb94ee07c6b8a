pub mod activation;
pub mod cost;
pub mod error;
pub mod init;
pub mod layers;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::{Activation, ActivationFunction};
pub use cost::{CostFunction, CostType, QuadraticCost};
pub use error::{NetworkError, Result};
pub use init::{InitSpec, Initializer};
pub use layers::dense::{Layer, ParametersMut};
pub use math::matrix::Matrix;
pub use network::{LayerSpec, Network, NetworkSpec};
pub use train::{train_network, TrainConfig, TrainingExample, TrainingProgress};
