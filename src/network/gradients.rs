use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Sum of per-sample gradients over a mini-batch.
///
/// Each worker or batch owns one of these; `Network::apply_gradient_set`
/// applies the mean and is the only writer of the parameters.
#[derive(Debug, Clone)]
pub struct GradientSet {
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
    samples: usize,
}

impl GradientSet {
    /// Zeroed accumulator shaped like `network`'s parameters.
    pub fn for_network(network: &Network) -> GradientSet {
        let (weights, biases) = network.layers().iter()
            .map(|layer| {
                let (w, b) = layer.gradients();
                (w.zeros_like(), b.zeros_like())
            })
            .unzip();
        GradientSet { weights, biases, samples: 0 }
    }

    /// Adds the gradients from the network's last `backward` call.
    pub fn accumulate(&mut self, network: &Network) -> Result<()> {
        for ((w_acc, b_acc), layer) in self.weights.iter_mut()
            .zip(self.biases.iter_mut())
            .zip(network.layers())
        {
            let (w, b) = layer.gradients();
            w_acc.accumulate_into(w)?;
            b_acc.accumulate_into(b)?;
        }
        self.samples += 1;
        Ok(())
    }

    /// Number of samples accumulated since the last reset.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Number of layers covered.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Matrix, &Matrix)> {
        self.weights.iter().zip(self.biases.iter())
    }

    pub fn reset(&mut self) {
        self.weights.iter_mut().for_each(|m| m.fill(0.0));
        self.biases.iter_mut().for_each(|m| m.fill(0.0));
        self.samples = 0;
    }
}
