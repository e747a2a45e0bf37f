use serde::{Deserialize, Serialize};
use std::f64::consts::E;

use crate::error::Result;
use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    Sigmoid,
    ReLU,
    /// Softmax is vector-valued: `activate()` normalizes each column of the
    /// pre-activation matrix. It is only valid on the output layer paired with
    /// cross-entropy, where the combined gradient is `predicted - expected`.
    Softmax,
}

impl ActivationFunction {
    /// Element-wise activation.
    ///
    /// For `Softmax` this is the unnormalized numerator `e^x`; `activate()`
    /// shifts by the column maximum first and divides by the column sum after.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Softmax => x.exp(),
        }
    }

    /// Derivative of the activation with respect to the pre-activation `x`.
    ///
    /// For `Softmax` the output delta already folds the Jacobian in, so this
    /// returns `1.0` and the delta passes through unchanged.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Softmax => 1.0,
        }
    }

    pub fn is_elementwise(&self) -> bool {
        !matches!(self, ActivationFunction::Softmax)
    }

    /// Writes `activation(z)` into `a`. Both must have the same shape.
    pub fn activate(&self, z: &Matrix, a: &mut Matrix) -> Result<()> {
        a.copy_from(z)?;
        match self {
            ActivationFunction::Softmax => softmax_columns(a),
            _ => a.apply(|x| self.function(x)),
        }
        Ok(())
    }

    /// Multiplies `delta` in place by the derivative evaluated at `z`.
    pub fn scale_by_derivative(&self, delta: &mut Matrix, z: &Matrix) -> Result<()> {
        delta.zip_apply(z, |d, x| d * self.derivative(x))
    }
}

/// Normalizes every column: subtract the column max, exponentiate, divide by
/// the sum.
fn softmax_columns(m: &mut Matrix) {
    let (rows, cols) = m.shape();
    let data = m.as_mut_slice();
    for j in 0..cols {
        let max = (0..rows)
            .map(|i| data[i * cols + j])
            .fold(f64::NEG_INFINITY, f64::max);
        let mut sum = 0.0;
        for i in 0..rows {
            let e = ActivationFunction::Softmax.function(data[i * cols + j] - max);
            data[i * cols + j] = e;
            sum += e;
        }
        for i in 0..rows {
            data[i * cols + j] /= sum;
        }
    }
}
