use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Order in which samples are visited within an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Dataset order, every epoch.
    Sequential,
    /// A fresh permutation per epoch, drawn from the trainer's seeded RNG.
    #[default]
    Shuffled,
}

/// Configuration for a `Trainer` run.
///
/// # Fields
/// - `learning_rate`        — fixed gradient-descent step size, must be > 0
/// - `epoch_limit`          — maximum number of full passes over the data
/// - `batch_size`           — samples per gradient update; `1` is online SGD
/// - `report_interval`      — a `ProgressSnapshot` is emitted every this many steps
/// - `early_stop_threshold` — stop once the mean output confidence over the
///                            last `convergence_window` steps reaches this value
/// - `convergence_window`   — length of that sliding window
/// - `sampling`             — sample order within an epoch
/// - `seed`                 — seeds weight initialization and shuffling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub epoch_limit: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_report_interval")]
    pub report_interval: usize,
    #[serde(default)]
    pub early_stop_threshold: Option<f64>,
    #[serde(default = "default_convergence_window")]
    pub convergence_window: usize,
    #[serde(default)]
    pub sampling: Sampling,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_batch_size() -> usize { 1 }
fn default_report_interval() -> usize { 1000 }
fn default_convergence_window() -> usize { 100 }
fn default_seed() -> u64 { 42 }

impl TrainConfig {
    /// Creates a `TrainConfig` with defaults for everything but the learning
    /// rate and epoch limit.
    pub fn new(learning_rate: f64, epoch_limit: usize) -> Self {
        TrainConfig {
            learning_rate,
            epoch_limit,
            batch_size: default_batch_size(),
            report_interval: default_report_interval(),
            early_stop_threshold: None,
            convergence_window: default_convergence_window(),
            sampling: Sampling::default(),
            seed: default_seed(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_report_interval(mut self, report_interval: usize) -> Self {
        self.report_interval = report_interval;
        self
    }

    pub fn with_early_stop(mut self, threshold: f64, window: usize) -> Self {
        self.early_stop_threshold = Some(threshold);
        self.convergence_window = window;
        self
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::Config(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        if self.report_interval == 0 {
            return Err(Error::Config("report_interval must be at least 1".into()));
        }
        if self.convergence_window == 0 {
            return Err(Error::Config("convergence_window must be at least 1".into()));
        }
        if let Some(t) = self.early_stop_threshold {
            if !(t > 0.0 && t <= 1.0) {
                return Err(Error::Config(format!(
                    "early_stop_threshold must lie in (0, 1], got {}",
                    t
                )));
            }
        }
        Ok(())
    }
}
