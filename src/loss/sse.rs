/// Sum-of-squared-error loss, halved so its gradient is exactly
/// `predicted - expected`.
pub struct SseLoss;

impl SseLoss {
    /// Scalar SSE: ½ · sum((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        0.5 * predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
    }

    /// Per-output gradient w.r.t. the prediction: predicted - expected
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        predicted - expected
    }
}
