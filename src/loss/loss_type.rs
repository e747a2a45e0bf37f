use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::loss::sse::SseLoss;
use crate::math::matrix::Matrix;

/// Selects which cost the trainer scores predictions with.
///
/// - `SumSquaredError` — ½·Σ(a - t)²; pair with Sigmoid, ReLU or Identity output.
/// - `CrossEntropy`    — categorical cross-entropy; pair with Softmax output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    SumSquaredError,
    CrossEntropy,
}

impl LossType {
    /// Scalar cost of `predicted` against `expected` (same shape).
    pub fn cost(&self, predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        if predicted.shape() != expected.shape() {
            return Err(Error::mismatch("cost", predicted.shape(), expected.shape()));
        }
        let (p, e) = (predicted.as_slice(), expected.as_slice());
        Ok(match self {
            LossType::SumSquaredError => SseLoss::loss(p, e),
            LossType::CrossEntropy => CrossEntropyLoss::loss(p, e),
        })
    }

    /// Writes ∂cost/∂prediction into `out`. For `CrossEntropy` this is already
    /// the gradient w.r.t. the Softmax logits.
    pub fn derivative_into(
        &self,
        predicted: &Matrix,
        expected: &Matrix,
        out: &mut Matrix,
    ) -> Result<()> {
        match self {
            LossType::SumSquaredError => predicted.elementwise_into(expected, out, SseLoss::derivative),
            LossType::CrossEntropy => predicted.elementwise_into(expected, out, CrossEntropyLoss::derivative),
        }
    }

    /// Whether this cost may be paired with `output` as the last activation.
    pub fn pairs_with(&self, output: ActivationFunction) -> bool {
        match self {
            LossType::CrossEntropy => output == ActivationFunction::Softmax,
            LossType::SumSquaredError => output.is_elementwise(),
        }
    }
}
