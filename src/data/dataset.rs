use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Ordered sequence of labeled samples. Each input is a column vector.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    inputs: Vec<Matrix>,
    labels: Vec<usize>,
}

impl Dataset {
    /// Pairs inputs with labels; both sequences must have the same length.
    pub fn new(inputs: Vec<Matrix>, labels: Vec<usize>) -> Result<Dataset> {
        if inputs.len() != labels.len() {
            return Err(Error::DataLoad(format!(
                "{} samples but {} labels",
                inputs.len(),
                labels.len()
            )));
        }
        Ok(Dataset { inputs, labels })
    }

    /// Builds a dataset from `(sample, label)` pairs, e.g. toy problems.
    pub fn from_pairs(pairs: Vec<(Vec<f64>, usize)>) -> Dataset {
        let (inputs, labels) = pairs.into_iter()
            .map(|(x, y)| (Matrix::column(&x), y))
            .unzip();
        Dataset { inputs, labels }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<(&Matrix, usize)> {
        Some((self.inputs.get(index)?, *self.labels.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Matrix, usize)> {
        self.inputs.iter().zip(self.labels.iter().copied())
    }

    pub fn inputs(&self) -> &[Matrix] {
        &self.inputs
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Keeps only the first `n` samples.
    pub fn truncate(&mut self, n: usize) {
        self.inputs.truncate(n);
        self.labels.truncate(n);
    }

    /// Checks every sample against the network it is about to be fed to, so
    /// bad data is reported before the first training step.
    pub fn validate(&self, input_size: usize, num_classes: usize) -> Result<()> {
        for (i, (input, label)) in self.iter().enumerate() {
            if input.shape() != (input_size, 1) {
                return Err(Error::DataLoad(format!(
                    "sample {} has shape {:?}, expected ({}, 1)",
                    i,
                    input.shape(),
                    input_size
                )));
            }
            if label >= num_classes {
                return Err(Error::DataLoad(format!(
                    "sample {} has label {}, expected a class below {}",
                    i, label, num_classes
                )));
            }
        }
        Ok(())
    }
}
