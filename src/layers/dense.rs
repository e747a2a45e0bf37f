use crate::{activation::activation::ActivationFunction, error::Result, math::matrix::Matrix};

/// One transition of the chain: `a = activation(W·a_prev + b)`.
///
/// Besides the parameters the layer owns its forward cache (`pre_neurons`,
/// `neurons`) and its gradient buffers. All of them are allocated once and
/// overwritten in place on every step.
#[derive(Debug, Clone)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    pre_neurons: Matrix,  // z = W·a_prev + b, needed for the derivative
    neurons: Matrix,      // a = activation(z)
    delta: Matrix,
    weights_grad: Matrix,
    biases_grad: Matrix,
}

impl Layer {
    /// Wraps already-shaped parameters. `weights` must be `size × input_size`
    /// and `biases` `size × 1`; the caller validates that.
    pub(crate) fn from_parameters(
        weights: Matrix,
        biases: Matrix,
        activator: ActivationFunction,
    ) -> Layer {
        let size = weights.rows();
        let input_size = weights.cols();
        Layer {
            size,
            input_size,
            pre_neurons: Matrix::zeros(size, 1),
            neurons: Matrix::zeros(size, 1),
            delta: Matrix::zeros(size, 1),
            weights_grad: weights.zeros_like(),
            biases_grad: biases.zeros_like(),
            weights,
            biases,
            activator,
        }
    }

    /// Forward step from the previous layer's activation (or the network input).
    pub fn feed_from(&mut self, input: &Matrix) -> Result<()> {
        self.weights.multiply_into(input, &mut self.pre_neurons)?;
        self.pre_neurons.accumulate_into(&self.biases)?;
        self.activator.activate(&self.pre_neurons, &mut self.neurons)
    }

    /// Post-activation output of the last forward step.
    pub fn output(&self) -> &Matrix {
        &self.neurons
    }

    pub fn pre_activation(&self) -> &Matrix {
        &self.pre_neurons
    }

    pub fn delta(&self) -> &Matrix {
        &self.delta
    }

    /// Output-layer delta: `∂cost/∂a ⊙ activation'(z)`, where `loss_grad`
    /// writes `∂cost/∂a` into the buffer it is handed.
    pub fn set_output_delta<F>(&mut self, loss_grad: F) -> Result<()>
    where
        F: FnOnce(&Matrix, &mut Matrix) -> Result<()>,
    {
        loss_grad(&self.neurons, &mut self.delta)?;
        self.activator.scale_by_derivative(&mut self.delta, &self.pre_neurons)
    }

    /// Hidden-layer delta: `(W_nextᵗ · δ_next) ⊙ activation'(z)`.
    pub fn backpropagate_from(&mut self, next: &Layer) -> Result<()> {
        next.weights.transpose_multiply_into(&next.delta, &mut self.delta)?;
        self.activator.scale_by_derivative(&mut self.delta, &self.pre_neurons)
    }

    /// Fills the gradient buffers from the current delta:
    /// `dW = δ · inputᵗ`, `dB = δ`.
    pub fn compute_gradients(&mut self, inputs: &Matrix) -> Result<()> {
        self.delta.multiply_transpose_right_into(inputs, &mut self.weights_grad)?;
        self.biases_grad.copy_from(&self.delta)
    }

    pub fn gradients(&self) -> (&Matrix, &Matrix) {
        (&self.weights_grad, &self.biases_grad)
    }

    /// `W -= lr·dW`, `b -= lr·dB` using the layer's own gradient buffers.
    pub fn apply_gradients(&mut self, lr: f64) -> Result<()> {
        self.weights.scaled_add(&self.weights_grad, -lr)?;
        self.biases.scaled_add(&self.biases_grad, -lr)
    }

    /// `W -= lr·weights_grad`, `b -= lr·biases_grad` with external gradients.
    pub fn apply_external_gradients(
        &mut self,
        weights_grad: &Matrix,
        biases_grad: &Matrix,
        lr: f64,
    ) -> Result<()> {
        self.weights.scaled_add(weights_grad, -lr)?;
        self.biases.scaled_add(biases_grad, -lr)
    }
}
