use super::CostFunction;

/// Binary cross-entropy for outputs in (0, 1).
///
/// The output layer must be a sigmoid: outside (0, 1) the logarithms are
/// undefined and the cost comes out NaN. `NetworkSpec::build` enforces the
/// pairing; a network assembled by hand with `Network::new` must respect it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCrossEntropy;

const EPS: f64 = 1e-12;

impl CostFunction for BinaryCrossEntropy {
    fn name(&self) -> &str {
        "binary_cross_entropy"
    }

    /// Scalar BCE: -Σ(y·log(p+ε) + (1-y)·log(1-p+ε))
    fn calculate(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln()))
            .sum::<f64>()
    }

    /// ∂/∂p of each term: the target pulls toward 1 with weight y/p and
    /// toward 0 with weight (1 − y)/(1 − p), both guarded by ε.
    fn derivative(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| {
                let toward_one = y / (p + EPS);
                let toward_zero = (1.0 - y) / (1.0 - p + EPS);
                toward_zero - toward_one
            })
            .collect()
    }
}
