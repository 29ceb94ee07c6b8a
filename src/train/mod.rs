pub mod example;
pub mod progress;
pub mod train_config;
pub mod trainer;

pub use example::{load_examples, TrainingExample};
pub use progress::TrainingProgress;
pub use train_config::TrainConfig;
pub use trainer::{evaluate, train_network};
