use std::time::Instant;

use tracing::{debug, info};

use crate::{
    error::{NetworkError, Result},
    network::network::Network,
    train::{TrainConfig, TrainingExample, TrainingProgress},
};

/// Trains `network` on `examples` with the hyperparameters in `config` and
/// returns the mean cost of the last epoch.
///
/// Logs one `debug!` line per epoch and an `info!` summary at the end. If
/// `observer` is given it is called after every example, exactly as in
/// `Network::train`.
pub fn train_network(
    network: &mut Network,
    examples: &[TrainingExample],
    config: &TrainConfig,
    mut observer: Option<&mut dyn FnMut(&TrainingProgress)>,
) -> Result<f64> {
    config.validate()?;

    info!(
        epochs = config.epochs,
        examples = examples.len(),
        learning_rate = config.learning_rate,
        momentum = config.momentum,
        cost = network.cost().name(),
        "starting training"
    );
    let t_start = Instant::now();

    let mut logging = |progress: &TrainingProgress| {
        if progress.is_epoch_end() {
            debug!(
                epoch = progress.epoch + 1,
                total_epochs = progress.total_epochs,
                mean_cost = progress.mean_cost,
                "epoch complete"
            );
        }
        if let Some(notify) = observer.as_deref_mut() {
            notify(progress);
        }
    };

    let final_cost = network.train(
        examples,
        config.epochs,
        config.learning_rate,
        config.momentum,
        Some(&mut logging),
    )?;

    info!(
        final_cost,
        elapsed_ms = t_start.elapsed().as_millis() as u64,
        "training finished"
    );
    Ok(final_cost)
}

/// Mean cost over `examples` without touching any parameter. An empty set
/// has no mean and is rejected, as in training.
pub fn evaluate(network: &mut Network, examples: &[TrainingExample]) -> Result<f64> {
    if examples.is_empty() {
        return Err(NetworkError::EmptyDataset);
    }
    let mut total = 0.0;
    for example in examples {
        let output = network.query(&example.input)?;
        if example.target.len() != output.len() {
            return Err(NetworkError::shape_mismatch(
                "target",
                output.len(),
                example.target.len(),
            ));
        }
        total += network.cost().calculate(&output, &example.target);
    }
    Ok(total / examples.len() as f64)
}
