use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::{Activation, ActivationFunction};
use crate::cost::CostType;
use crate::error::{NetworkError, Result};
use crate::init::InitSpec;
use crate::layers::dense::Layer;
use crate::network::network::Network;
use crate::train::TrainConfig;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `inputs`     — values feeding into this layer (the previous layer's
///                  `outputs`, or the raw input dimension for the first layer)
/// - `outputs`    — number of neurons in this layer
/// - `activation` — activation function applied after the affine transform
/// - `init`       — where the starting weights and biases come from;
///                  defaults to Xavier with seed 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub inputs: usize,
    pub outputs: usize,
    pub activation: ActivationFunction,
    #[serde(default)]
    pub init: InitSpec,
}

/// A serializable description of a network layout, its cost function and,
/// optionally, the hyperparameters to train it with.
///
/// This describes how to *build* a network; trained parameters are never
/// written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, only used in logs.
    #[serde(default)]
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub cost: CostType,
    #[serde(default)]
    pub training: Option<TrainConfig>,
}

impl NetworkSpec {
    /// Builds every layer from its initializer and connects them.
    ///
    /// Binary cross-entropy is only accepted on a sigmoid output layer.
    pub fn build(&self) -> Result<Network> {
        debug!(name = %self.name, layers = self.layers.len(), "building network");
        let cost = self.cost.build()?;
        if self.cost == CostType::BinaryCrossEntropy {
            if let Some(last) = self.layers.last() {
                if last.activation != ActivationFunction::Sigmoid {
                    return Err(NetworkError::IncompatibleCost {
                        cost: "binary_cross_entropy",
                        required: "sigmoid",
                        actual: last.activation.name().to_string(),
                    });
                }
            }
        }
        let layers = self.layers
            .iter()
            .map(|spec| {
                let mut init = spec.init.build(spec.inputs);
                Layer::new(spec.inputs, spec.outputs, init.as_mut(), spec.activation)
            })
            .collect::<Result<Vec<_>>>()?;
        Network::with_boxed_cost(layers, cost)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XOR: &str = r#"{
        "name": "xor",
        "layers": [
            { "inputs": 2, "outputs": 3, "activation": "tanh",
              "init": { "kind": "uniform", "limit": 0.5, "seed": 7 } },
            { "inputs": 3, "outputs": 1, "activation": "sigmoid",
              "init": { "kind": "explicit", "weights": [[0.1],[0.2],[0.3]], "biases": [0.0] } }
        ],
        "training": { "epochs": 10, "learning_rate": 0.5, "momentum": 0.9 }
    }"#;

    #[test]
    fn test_parse_and_build() {
        let spec: NetworkSpec = serde_json::from_str(XOR).unwrap();
        assert_eq!(spec.cost, CostType::Quadratic);
        assert_eq!(spec.training, Some(TrainConfig::new(10, 0.5).with_momentum(0.9)));

        let net = spec.build().unwrap();
        assert_eq!((net.input_dim(), net.output_dim()), (2, 1));
        assert_eq!(net.last_layer().weights().to_column_major(), vec![0.1, 0.2, 0.3]);
        assert_eq!(net.first_layer().activation().name(), "tanh");
    }

    #[test]
    fn test_build_is_reproducible() {
        let spec: NetworkSpec = serde_json::from_str(XOR).unwrap();
        let a = spec.build().unwrap();
        let b = spec.build().unwrap();
        assert_eq!(a.first_layer().weights(), b.first_layer().weights());
    }

    #[test]
    fn test_build_reports_layout_errors() {
        let mut spec: NetworkSpec = serde_json::from_str(XOR).unwrap();
        spec.layers[1].inputs = 4;
        spec.layers[1].init = InitSpec::default();
        assert!(matches!(spec.build(), Err(NetworkError::ShapeMismatch { .. })));

        spec.layers.clear();
        assert!(matches!(spec.build(), Err(NetworkError::EmptyLayout)));
    }

    #[test]
    fn test_cost_is_validated_against_output_layer() {
        let mut spec: NetworkSpec = serde_json::from_str(XOR).unwrap();
        spec.cost = CostType::BinaryCrossEntropy;
        let mut net = spec.build().unwrap();
        let cost = net.train_one_example(&[1.0, 0.0], &[1.0], 0.1, 0.0).unwrap();
        assert!(cost.is_finite());

        spec.layers[1].activation = ActivationFunction::Tanh;
        let err = spec.build().unwrap_err();
        assert!(matches!(err, NetworkError::IncompatibleCost { required: "sigmoid", .. }));

        spec.layers[1].activation = ActivationFunction::Identity;
        spec.cost = CostType::Huber { delta: 0.0 };
        assert!(matches!(spec.build(), Err(NetworkError::InvalidHyperparameter(_))));
        spec.cost = CostType::Huber { delta: 1.5 };
        assert_eq!(spec.build().unwrap().cost().name(), "huber");
    }

    #[test]
    fn test_explicit_init_shape_is_checked() {
        let mut spec: NetworkSpec = serde_json::from_str(XOR).unwrap();
        spec.layers[1].outputs = 2;
        assert!(matches!(spec.build(), Err(NetworkError::InvalidInitializer(_))));
    }
}
