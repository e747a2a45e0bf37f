pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optim;
pub mod data;
pub mod train;
pub mod config;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use loss::loss_type::LossType;
pub use network::{GradientSet, LayerSpec, Network, NetworkSpec, WeightInit};
pub use optim::sgd::Sgd;
pub use data::{load_idx_pair, parse_idx_pair, Dataset};
pub use train::{
    EpochStats, Evaluation, LogSink, ProgressSink, ProgressSnapshot, Sampling, StopReason,
    TrainConfig, TrainEvent, TrainReport, Trainer,
};
pub use config::RunConfig;
