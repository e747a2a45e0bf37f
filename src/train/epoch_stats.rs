use serde::{Serialize, Deserialize};

/// Progress record emitted every `report_interval` steps and on early stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total training steps taken so far, across epochs.
    pub step: usize,
    /// Cost of the sample that triggered this snapshot.
    pub cost: f64,
    /// Network output for that sample.
    pub predicted: Vec<f64>,
    /// One-hot target for that sample.
    pub actual: Vec<f64>,
}

/// Per-epoch training statistics.
///
/// One is emitted at the end of every epoch, including a partial final epoch
/// cut short by early stopping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Epoch limit for this run.
    pub total_epochs: usize,
    /// Samples visited in this epoch.
    pub samples: usize,
    /// Mean cost over those samples.
    pub mean_cost: f64,
    /// Fraction of those samples whose argmax matched the label.
    pub accuracy: f64,
    /// Wall-clock duration of the epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Everything a `ProgressSink` can be sent, as one value for channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrainEvent {
    Snapshot(ProgressSnapshot),
    Epoch(EpochStats),
}
