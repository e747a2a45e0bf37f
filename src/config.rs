//! Run configuration loaded from JSON.
//!
//! ```json
//! {
//!   "network": {
//!     "input_size": 784,
//!     "layers": [
//!       { "size": 64, "activation": "Sigmoid" },
//!       { "size": 10, "activation": "Softmax" }
//!     ],
//!     "loss": "cross_entropy"
//!   },
//!   "training": {
//!     "learning_rate": 0.05,
//!     "epoch_limit": 5,
//!     "report_interval": 5000,
//!     "early_stop_threshold": 0.97
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::loss::loss_type::LossType;
use crate::network::spec::NetworkSpec;
use crate::train::train_config::TrainConfig;

/// Architecture plus training hyperparameters for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub network: NetworkSpec,
    pub training: TrainConfig,
}

impl RunConfig {
    /// 784 → 64 (Sigmoid) → 10 (Softmax), cross-entropy, lr 0.05, 5 epochs.
    pub fn mnist_default() -> Result<RunConfig> {
        let network = NetworkSpec::from_sizes(
            &[784, 64, 10],
            &[ActivationFunction::Sigmoid, ActivationFunction::Softmax],
            LossType::CrossEntropy,
        )?;
        let training = TrainConfig::new(0.05, 5).with_report_interval(5000);
        Ok(RunConfig { network, training })
    }

    /// Checks both halves of the configuration.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.training.validate()
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads and validates a configuration file.
    pub fn load_json(path: &str) -> Result<RunConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: RunConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
