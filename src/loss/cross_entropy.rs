/// Cross-entropy cost against a one-hot target, paired with a Softmax output.
pub struct CrossEntropyLoss;

/// Keeps `ln` finite when a probability underflows to zero.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// `-Σ t·ln(a + ε)`. Only the target class contributes for a one-hot `t`.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        -predicted
            .iter()
            .zip(expected)
            .filter(|(_, &t)| t != 0.0)
            .map(|(&a, &t)| t * (a + EPS).ln())
            .sum::<f64>()
    }

    /// `∂C/∂z = a - t` for Softmax logits. Softmax reports a derivative of 1,
    /// so the output delta is exactly this value.
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        predicted - expected
    }
}
