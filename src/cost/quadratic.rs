use super::CostFunction;

/// Quadratic cost: `0.5 · Σ (output - target)²`.
///
/// The 0.5 factor makes the gradient exactly `output - target`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticCost;

impl CostFunction for QuadraticCost {
    fn name(&self) -> &str {
        "quadratic"
    }

    fn calculate(&self, output: &[f64], target: &[f64]) -> f64 {
        0.5 * output.iter().zip(target.iter())
            .map(|(o, t)| (o - t).powi(2))
            .sum::<f64>()
    }

    fn derivative(&self, output: &[f64], target: &[f64]) -> Vec<f64> {
        output.iter().zip(target.iter())
            .map(|(o, t)| o - t)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_value_is_half_sum_of_squares() {
        let cost = QuadraticCost.calculate(&[1.0, 2.0], &[0.0, 4.0]);
        assert_abs_diff_eq!(cost, 2.5);
    }

    #[test]
    fn test_gradient_is_difference() {
        assert_eq!(QuadraticCost.derivative(&[1.0, 2.0], &[0.5, 4.0]), vec![0.5, -2.0]);
    }

    #[test]
    fn test_zero_at_target() {
        assert_eq!(QuadraticCost.calculate(&[0.3, 0.7], &[0.3, 0.7]), 0.0);
    }
}
