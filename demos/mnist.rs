/// MNIST digit classification example for digitnet.
///
/// Architecture: 784 → 128 (ReLU) → 64 (ReLU) → 10 (Softmax)
/// Loss:         cross-entropy (combined with Softmax, gradient is predicted - expected)
/// Optimizer:    SGD, lr = 0.01
/// Batch size:   32
/// Epochs:       10
///
/// Run with:
///   cargo run --example mnist --release
///
/// Data files must be present at data/ (IDX binary format).

use std::io::{self, Write};
use std::ops::ControlFlow;

use digitnet::{
    load_idx_pair, ActivationFunction, EpochStats, LossType, NetworkSpec, ProgressSink,
    ProgressSnapshot, TrainConfig, Trainer, WeightInit,
};

/// Prints a dot per snapshot and one table row per epoch.
struct DotSink;

impl ProgressSink for DotSink {
    fn snapshot(&mut self, _snapshot: &ProgressSnapshot) -> ControlFlow<()> {
        print!(".");
        // A failed flush only delays the dots.
        let _ = io::stdout().flush();
        ControlFlow::Continue(())
    }

    fn epoch_finished(&mut self, s: &EpochStats) -> ControlFlow<()> {
        println!(
            "]  CE Loss: {:>10.6}  Train Acc: {:>6.2}%  ({} ms)",
            s.mean_cost,
            s.accuracy * 100.0,
            s.elapsed_ms
        );
        if s.epoch < s.total_epochs {
            print!("{:>6}  [", s.epoch + 1);
        }
        ControlFlow::Continue(())
    }
}

fn main() -> digitnet::Result<()> {
    println!("Loading MNIST data...");
    let train = load_idx_pair("data/train-images-idx3-ubyte", "data/train-labels-idx1-ubyte")?;
    let test = load_idx_pair("data/t10k-images-idx3-ubyte", "data/t10k-labels-idx1-ubyte")?;
    println!("  Training set: {} samples", train.len());
    println!("  Test set:     {} samples", test.len());

    let spec = NetworkSpec::from_sizes(
        &[784, 128, 64, 10],
        &[ActivationFunction::ReLU, ActivationFunction::ReLU, ActivationFunction::Softmax],
        LossType::CrossEntropy,
    )?
    .with_init(WeightInit::He);

    // One dot per 6,400 samples, ~9 per epoch.
    let config = TrainConfig::new(0.01, 10)
        .with_batch_size(32)
        .with_report_interval(6_400)
        .with_early_stop(0.995, 2_000);

    let mut trainer = Trainer::new(&spec, config)?;

    let baseline = trainer.evaluate(&test)?;
    println!("\nPre-training accuracy (random weights): {:.2}%", baseline.accuracy * 100.0);
    println!("  (Expected ~10% for a 10-class random classifier)\n");

    println!("{:>6}  {:>12}  {:>10}  {:>10}", "Epoch", "Progress", "CE Loss", "Train Acc");
    println!("{}", "─".repeat(60));
    print!("{:>6}  [", 1);
    let report = trainer.train(&train, &mut DotSink)?;
    println!("\nStopped after {} epochs: {:?}", report.epochs_run, report.stop_reason);

    let eval = trainer.evaluate(&test)?;
    println!("\nTest accuracy: {:.2}%  (mean CE {:.4})", eval.accuracy * 100.0, eval.mean_cost);

    println!("\nSample predictions (first 10 test images):");
    println!("{:>12}  {:>12}", "True Label", "Predicted");
    println!("{}", "-".repeat(27));
    for (input, label) in test.iter().take(10) {
        let predicted = trainer.network_mut().predict(input)?;
        println!("{:>12}  {:>12}", label, predicted);
    }
    Ok(())
}
