use std::ops::ControlFlow;
use std::sync::mpsc;

use tracing::info;

use crate::train::epoch_stats::{EpochStats, ProgressSnapshot, TrainEvent};

/// Receives progress from a training run. Returning `ControlFlow::Break`
/// stops training after the current step.
pub trait ProgressSink {
    fn snapshot(&mut self, snapshot: &ProgressSnapshot) -> ControlFlow<()>;

    fn epoch_finished(&mut self, _stats: &EpochStats) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn snapshot(&mut self, s: &ProgressSnapshot) -> ControlFlow<()> {
        info!(
            epoch = s.epoch,
            step = s.step,
            cost = s.cost,
            predicted = ?s.predicted,
            actual = ?s.actual,
            "progress"
        );
        ControlFlow::Continue(())
    }

    fn epoch_finished(&mut self, s: &EpochStats) -> ControlFlow<()> {
        info!(
            epoch = s.epoch,
            total_epochs = s.total_epochs,
            samples = s.samples,
            mean_cost = s.mean_cost,
            accuracy = s.accuracy,
            elapsed_ms = s.elapsed_ms,
            "epoch finished"
        );
        ControlFlow::Continue(())
    }
}

/// Forwards events over a channel; a dropped receiver stops training.
impl ProgressSink for mpsc::Sender<TrainEvent> {
    fn snapshot(&mut self, s: &ProgressSnapshot) -> ControlFlow<()> {
        match self.send(TrainEvent::Snapshot(s.clone())) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }

    fn epoch_finished(&mut self, s: &EpochStats) -> ControlFlow<()> {
        match self.send(TrainEvent::Epoch(s.clone())) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }
}

/// Collects every event in memory.
impl ProgressSink for Vec<TrainEvent> {
    fn snapshot(&mut self, s: &ProgressSnapshot) -> ControlFlow<()> {
        self.push(TrainEvent::Snapshot(s.clone()));
        ControlFlow::Continue(())
    }

    fn epoch_finished(&mut self, s: &EpochStats) -> ControlFlow<()> {
        self.push(TrainEvent::Epoch(s.clone()));
        ControlFlow::Continue(())
    }
}
