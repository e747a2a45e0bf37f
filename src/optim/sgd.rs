use crate::{error::Result, network::{gradients::GradientSet, network::Network}};

/// Fixed-learning-rate gradient descent.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies the gradients from the network's last backward pass.
    pub fn step(&self, network: &mut Network) -> Result<()> {
        network.apply_gradients(self.learning_rate)
    }

    /// Applies the mean of an accumulated mini-batch, then clears it.
    pub fn step_batch(&self, network: &mut Network, batch: &mut GradientSet) -> Result<()> {
        network.apply_gradient_set(batch, self.learning_rate)?;
        batch.reset();
        Ok(())
    }
}
