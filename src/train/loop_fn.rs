use std::time::Instant;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::data::dataset::Dataset;
use crate::error::{Error, Result};
use crate::train::epoch_stats::{EpochStats, ProgressSnapshot};
use crate::train::sink::ProgressSink;
use crate::train::train_config::Sampling;
use crate::train::trainer::Trainer;

/// Why a `train` run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// All `epoch_limit` epochs completed.
    EpochLimit,
    /// The convergence window crossed `early_stop_threshold`.
    Converged,
    /// The progress sink asked to stop.
    Interrupted,
}

/// Summary of a finished `train` run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub stop_reason: StopReason,
    /// Epochs started, including a partial final one.
    pub epochs_run: usize,
    pub steps: usize,
    pub last_epoch: Option<EpochStats>,
}

// ---------------------------------------------------------------------------
// Epoch loop
// ---------------------------------------------------------------------------

impl Trainer {
    /// Trains on `data` for up to `config.epoch_limit` epochs.
    ///
    /// The dataset is validated against the network before the first step.
    /// Snapshots go to `sink` every `report_interval` steps and when early
    /// stopping triggers; `EpochStats` go to it after every epoch.
    pub fn train(&mut self, data: &Dataset, sink: &mut dyn ProgressSink) -> Result<TrainReport> {
        if data.is_empty() {
            return Err(Error::DataLoad("training set is empty".into()));
        }
        data.validate(self.network.input_size(), self.network.output_size())?;
        // Convergence is judged on this run's steps only.
        self.window.clear();

        let mut order: Vec<usize> = (0..data.len()).collect();
        let mut last_epoch = None;

        for epoch in 1..=self.config.epoch_limit {
            if self.config.sampling == Sampling::Shuffled {
                order.shuffle(&mut self.rng);
            }
            debug!(epoch, samples = order.len(), "starting epoch");

            let t_start = Instant::now();
            let mut total_cost = 0.0;
            let mut correct = 0usize;
            let mut seen = 0usize;
            let mut stop = None;

            for &idx in &order {
                let (input, label) = (&data.inputs()[idx], data.labels()[idx]);
                let outcome = self.step(input, label)?;
                total_cost += outcome.cost;
                correct += usize::from(outcome.correct);
                seen += 1;

                self.window.push(outcome.confidence);
                let converged = self
                    .config
                    .early_stop_threshold
                    .is_some_and(|t| self.window.reached(t));

                if self.steps % self.config.report_interval == 0 || converged {
                    let snapshot = self.snapshot(epoch, outcome.cost);
                    if sink.snapshot(&snapshot).is_break() {
                        warn!(epoch, step = self.steps, "progress sink stopped training");
                        stop = Some(StopReason::Interrupted);
                        break;
                    }
                }
                if converged {
                    info!(
                        epoch,
                        step = self.steps,
                        window_mean = self.window.mean().unwrap_or(0.0),
                        "convergence threshold reached, stopping early"
                    );
                    stop = Some(StopReason::Converged);
                    break;
                }
            }

            self.flush_batch()?;

            let stats = EpochStats {
                epoch,
                total_epochs: self.config.epoch_limit,
                samples: seen,
                mean_cost: total_cost / seen.max(1) as f64,
                accuracy: correct as f64 / seen.max(1) as f64,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            let sink_flow = sink.epoch_finished(&stats);
            last_epoch = Some(stats);

            if stop.is_none() && sink_flow.is_break() {
                warn!(epoch, "progress sink stopped training");
                stop = Some(StopReason::Interrupted);
            }
            if let Some(stop_reason) = stop {
                return Ok(TrainReport { stop_reason, epochs_run: epoch, steps: self.steps, last_epoch });
            }
        }

        Ok(TrainReport {
            stop_reason: StopReason::EpochLimit,
            epochs_run: self.config.epoch_limit,
            steps: self.steps,
            last_epoch,
        })
    }

    /// Snapshot of the most recent step: its output and one-hot target.
    fn snapshot(&self, epoch: usize, cost: f64) -> ProgressSnapshot {
        ProgressSnapshot {
            epoch,
            step: self.steps,
            cost,
            predicted: self.network.output().to_vec(),
            actual: self.target.to_vec(),
        }
    }
}
