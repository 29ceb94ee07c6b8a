use serde::{Serialize, Deserialize};

/// Snapshot handed to a training observer after every example.
///
/// Indices are 0-based. `mean_cost` is the running mean over the examples
/// seen so far in the current epoch, so at the last example of an epoch it
/// equals that epoch's mean cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgress {
    pub epoch: usize,
    pub total_epochs: usize,
    pub example: usize,
    pub total_examples: usize,
    pub mean_cost: f64,
}

impl TrainingProgress {
    pub fn is_epoch_end(&self) -> bool {
        self.example + 1 == self.total_examples
    }
}
