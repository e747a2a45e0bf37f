pub mod epoch_stats;
pub mod loop_fn;
pub mod sink;
pub mod train_config;
pub mod trainer;
pub mod window;

pub use epoch_stats::{EpochStats, ProgressSnapshot, TrainEvent};
pub use loop_fn::{StopReason, TrainReport};
pub use sink::{LogSink, ProgressSink};
pub use train_config::{Sampling, TrainConfig};
pub use trainer::{one_hot, Evaluation, StepOutcome, Trainer};
pub use window::ConvergenceWindow;
