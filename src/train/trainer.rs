use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;
use crate::network::gradients::GradientSet;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;
use crate::optim::sgd::Sgd;
use crate::train::train_config::TrainConfig;
use crate::train::window::ConvergenceWindow;

/// Result of a single training step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Cost of the prediction made before the update.
    pub cost: f64,
    /// Largest output activation, used as the convergence signal.
    pub confidence: f64,
    pub predicted_class: usize,
    pub correct: bool,
}

/// Mean cost and accuracy over a dataset, without touching the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub samples: usize,
    pub mean_cost: f64,
    pub accuracy: f64,
}

/// Drives a `Network` through training steps.
///
/// Owns the seeded RNG used for weight initialization and shuffling, the
/// one-hot target buffer, the mini-batch accumulator and the convergence
/// window.
pub struct Trainer {
    pub(crate) network: Network,
    pub(crate) config: TrainConfig,
    pub(crate) optimizer: Sgd,
    pub(crate) rng: StdRng,
    pub(crate) window: ConvergenceWindow,
    pub(crate) target: Matrix,
    pub(crate) batch: GradientSet,
    pub(crate) steps: usize,
}

impl Trainer {
    /// Builds a fresh network from `spec`, seeding it from `config.seed`.
    pub fn new(spec: &NetworkSpec, config: TrainConfig) -> Result<Trainer> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let network = Network::new(spec, &mut rng)?;
        Ok(Trainer::assemble(network, config, rng))
    }

    /// Trains an existing network. Shuffling is still seeded from `config.seed`.
    pub fn with_network(network: Network, config: TrainConfig) -> Result<Trainer> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Trainer::assemble(network, config, rng))
    }

    fn assemble(network: Network, config: TrainConfig, rng: StdRng) -> Trainer {
        Trainer {
            optimizer: Sgd::new(config.learning_rate),
            window: ConvergenceWindow::new(config.convergence_window),
            target: Matrix::zeros(network.output_size(), 1),
            batch: GradientSet::for_network(&network),
            steps: 0,
            network,
            config,
            rng,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Training steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The one-hot target of the most recent step.
    pub fn target(&self) -> &Matrix {
        &self.target
    }

    /// One forward/backward/update cycle on a single sample.
    ///
    /// With `batch_size > 1` the gradients are accumulated and applied once
    /// the batch is full; `flush_batch` applies a partial batch.
    pub fn step(&mut self, input: &Matrix, label: usize) -> Result<StepOutcome> {
        one_hot(label, &mut self.target)?;

        self.network.forward(input)?;
        let output = self.network.output();
        let confidence = output.max().unwrap_or(0.0);
        let predicted_class = output.argmax().unwrap_or(0);
        let cost = self.network.loss().cost(output, &self.target)?;

        self.network.backward(&self.target)?;

        if self.config.batch_size == 1 {
            self.optimizer.step(&mut self.network)?;
        } else {
            self.batch.accumulate(&self.network)?;
            if self.batch.samples() >= self.config.batch_size {
                self.optimizer.step_batch(&mut self.network, &mut self.batch)?;
            }
        }

        self.steps += 1;
        Ok(StepOutcome { cost, confidence, predicted_class, correct: predicted_class == label })
    }

    /// Applies whatever is left in the mini-batch accumulator.
    pub fn flush_batch(&mut self) -> Result<()> {
        self.optimizer.step_batch(&mut self.network, &mut self.batch)
    }

    /// Mean cost and accuracy of the current parameters on `data`.
    pub fn evaluate(&mut self, data: &Dataset) -> Result<Evaluation> {
        data.validate(self.network.input_size(), self.network.output_size())?;
        if data.is_empty() {
            return Ok(Evaluation { samples: 0, mean_cost: 0.0, accuracy: 0.0 });
        }

        let mut target = self.target.zeros_like();
        let mut total_cost = 0.0;
        let mut correct = 0usize;
        for (input, label) in data.iter() {
            one_hot(label, &mut target)?;
            self.network.infer(input)?;
            let output = self.network.output();
            if output.argmax() == Some(label) {
                correct += 1;
            }
            total_cost += self.network.loss().cost(output, &target)?;
        }

        let n = data.len() as f64;
        Ok(Evaluation {
            samples: data.len(),
            mean_cost: total_cost / n,
            accuracy: correct as f64 / n,
        })
    }
}

/// Writes the one-hot encoding of `label` into the column vector `target`.
pub fn one_hot(label: usize, target: &mut Matrix) -> Result<()> {
    let num_classes = target.rows();
    if label >= num_classes {
        return Err(Error::InvalidLabel { label, num_classes });
    }
    target.fill(0.0);
    target.set(label, 0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_sets_a_single_unit() {
        let mut t = Matrix::filled(4, 1, 7.0);
        one_hot(2, &mut t).unwrap();
        assert_eq!(t.as_slice(), &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn one_hot_rejects_out_of_range_label() {
        let mut t = Matrix::zeros(3, 1);
        assert!(matches!(
            one_hot(3, &mut t),
            Err(Error::InvalidLabel { label: 3, num_classes: 3 })
        ));
    }
}
