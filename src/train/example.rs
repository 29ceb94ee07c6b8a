use serde::{Serialize, Deserialize};

use crate::error::Result;

/// One (input, target) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl TrainingExample {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> TrainingExample {
        TrainingExample { input, target }
    }
}

/// Reads a JSON array of `{"input": [...], "target": [...]}` objects.
pub fn load_examples(path: &str) -> Result<Vec<TrainingExample>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
