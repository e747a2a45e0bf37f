use rand::Rng;

use crate::error::{Error, Result};
use crate::layers::dense::Layer;
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::gradients::GradientSet;
use crate::network::spec::{NetworkSpec, WeightInit};

/// Ordered chain of dense layers.
///
/// A training step is `forward` followed by `backward`, then either
/// `apply_gradients` or accumulation into a `GradientSet`. The forward cache
/// and gradient buffers live inside the layers and are reused every step.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    loss: LossType,
    input: Matrix,
    pending_backward: bool,
}

impl Network {
    /// Builds a network from `spec`, drawing random weights from `rng`.
    pub fn new<R: Rng>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        spec.validate()?;

        let mut weights = Vec::with_capacity(spec.layers.len());
        let mut biases = Vec::with_capacity(spec.layers.len());
        let mut fan_in = spec.input_size;
        for layer in &spec.layers {
            let (w, b) = match spec.init {
                WeightInit::Uniform => (
                    Matrix::random_uniform(layer.size, fan_in, rng),
                    Matrix::zeros(layer.size, 1),
                ),
                WeightInit::Xavier => (Matrix::xavier(layer.size, fan_in, rng), Matrix::zeros(layer.size, 1)),
                WeightInit::He => (Matrix::he(layer.size, fan_in, rng), Matrix::zeros(layer.size, 1)),
                WeightInit::Constant { value } => (
                    Matrix::filled(layer.size, fan_in, value),
                    Matrix::filled(layer.size, 1, value),
                ),
            };
            weights.push(w);
            biases.push(b);
            fan_in = layer.size;
        }

        Network::from_parameters(spec, weights, biases)
    }

    /// Builds a network with explicit parameters. `weights[i]` must be
    /// `(layers[i].size × previous size)` and `biases[i]` `(layers[i].size × 1)`.
    pub fn from_parameters(
        spec: &NetworkSpec,
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
    ) -> Result<Network> {
        spec.validate()?;
        let n = spec.layers.len();
        if weights.len() != n || biases.len() != n {
            return Err(Error::Config(format!(
                "{} layers need {} weight and bias matrices, got {} and {}",
                n, n, weights.len(), biases.len()
            )));
        }

        let mut layers = Vec::with_capacity(n);
        let mut fan_in = spec.input_size;
        for ((layer, w), b) in spec.layers.iter().zip(weights).zip(biases) {
            if w.shape() != (layer.size, fan_in) {
                return Err(Error::mismatch("from_parameters", (layer.size, fan_in), w.shape()));
            }
            if b.shape() != (layer.size, 1) {
                return Err(Error::mismatch("from_parameters", (layer.size, 1), b.shape()));
            }
            layers.push(Layer::from_parameters(w, b, layer.activation));
            fan_in = layer.size;
        }

        Ok(Network {
            layers,
            loss: spec.loss,
            input: Matrix::zeros(spec.input_size, 1),
            pending_backward: false,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn loss(&self) -> LossType {
        self.loss
    }

    pub fn input_size(&self) -> usize {
        self.input.rows()
    }

    pub fn output_size(&self) -> usize {
        self.output().rows()
    }

    /// Activation of the output layer from the last forward pass.
    pub fn output(&self) -> &Matrix {
        // Validation guarantees at least one layer.
        self.layers[self.layers.len() - 1].output()
    }

    /// Forward pass; caches `z` and `a` in each layer for the following
    /// `backward` and returns the prediction.
    pub fn forward(&mut self, input: &Matrix) -> Result<&Matrix> {
        self.pending_backward = false;
        if input.shape() != self.input.shape() {
            return Err(Error::mismatch("forward", self.input.shape(), input.shape()));
        }
        self.input.copy_from(input)?;

        for i in 0..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            let prev = done.last().map_or(&self.input, Layer::output);
            rest[0].feed_from(prev)?;
        }

        self.pending_backward = true;
        Ok(self.output())
    }

    /// Backward pass against `target`; fills every layer's gradient buffers.
    ///
    /// Must follow a `forward` in the same step.
    pub fn backward(&mut self, target: &Matrix) -> Result<()> {
        if !self.pending_backward {
            return Err(Error::BackwardWithoutForward);
        }
        let expected = self.output().shape();
        if target.shape() != expected {
            return Err(Error::mismatch("backward", expected, target.shape()));
        }

        let loss = self.loss;
        let last = self.layers.len() - 1;
        self.layers[last].set_output_delta(|output, delta| {
            loss.derivative_into(output, target, delta)
        })?;

        for i in (0..=last).rev() {
            let (before, from_here) = self.layers.split_at_mut(i);
            let Some((current, after)) = from_here.split_first_mut() else {
                continue;
            };
            if let Some(next) = after.first() {
                current.backpropagate_from(next)?;
            }
            let inputs = before.last().map_or(&self.input, Layer::output);
            current.compute_gradients(inputs)?;
        }

        self.pending_backward = false;
        Ok(())
    }

    /// `W[i] -= lr·dW[i]`, `b[i] -= lr·dB[i]` for every layer.
    pub fn apply_gradients(&mut self, learning_rate: f64) -> Result<()> {
        for layer in &mut self.layers {
            layer.apply_gradients(learning_rate)?;
        }
        Ok(())
    }

    /// Applies the mean of the gradients accumulated in `set`.
    /// An empty set leaves the parameters untouched.
    pub fn apply_gradient_set(&mut self, set: &GradientSet, learning_rate: f64) -> Result<()> {
        if set.samples() == 0 {
            return Ok(());
        }
        if set.len() != self.layers.len() {
            return Err(Error::mismatch(
                "apply_gradient_set",
                (self.layers.len(), 1),
                (set.len(), 1),
            ));
        }
        let step = learning_rate / set.samples() as f64;
        for (layer, (w, b)) in self.layers.iter_mut().zip(set.iter()) {
            layer.apply_external_gradients(w, b, step)?;
        }
        Ok(())
    }

    /// Forward pass for inference only; does not arm `backward`.
    pub fn infer(&mut self, input: &Matrix) -> Result<&Matrix> {
        self.forward(input)?;
        self.pending_backward = false;
        Ok(self.output())
    }

    /// Index of the most confident output unit for `input`.
    pub fn predict(&mut self, input: &Matrix) -> Result<usize> {
        Ok(self.infer(input)?.argmax().unwrap_or(0))
    }
}
