//! digitnet command-line trainer.
//!
//! Trains a feed-forward classifier on an IDX image/label pair and logs
//! progress. Run with:
//!   cargo run --release -- --images data/train-images.idx3-ubyte \
//!                          --labels data/train-labels.idx1-ubyte

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use digitnet::{load_idx_pair, LogSink, RunConfig, Trainer};

#[derive(Parser)]
#[command(name = "digitnet")]
#[command(about = "Train a small digit classifier by backpropagation", long_about = None)]
struct Cli {
    /// JSON run configuration; built-in MNIST defaults when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// IDX3 training images
    #[arg(long, default_value = "./data/train-images.idx3-ubyte")]
    images: String,

    /// IDX1 training labels
    #[arg(long, default_value = "./data/train-labels.idx1-ubyte")]
    labels: String,

    /// IDX3 images to evaluate on after training
    #[arg(long, requires = "test_labels")]
    test_images: Option<String>,

    /// IDX1 labels to evaluate on after training
    #[arg(long, requires = "test_images")]
    test_labels: Option<String>,

    /// Train on at most this many samples
    #[arg(long)]
    limit: Option<usize>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Log level when not verbose
    #[arg(long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        _ if cli.verbose => Level::DEBUG,
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        _ => Level::ERROR,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => RunConfig::load_json(path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => RunConfig::mnist_default()?,
    };

    let mut train_set = load_idx_pair(&cli.images, &cli.labels)
        .with_context(|| format!("loading training data from {} and {}", cli.images, cli.labels))?;
    if let Some(limit) = cli.limit {
        train_set.truncate(limit);
    }
    info!(
        samples = train_set.len(),
        layers = ?config.network.layer_sizes(),
        learning_rate = config.training.learning_rate,
        epoch_limit = config.training.epoch_limit,
        "starting training"
    );

    let mut trainer = Trainer::new(&config.network, config.training.clone())?;
    let report = trainer.train(&train_set, &mut LogSink)?;
    info!(
        stop_reason = ?report.stop_reason,
        epochs = report.epochs_run,
        steps = report.steps,
        "training finished"
    );

    if let (Some(images), Some(labels)) = (&cli.test_images, &cli.test_labels) {
        let test_set = load_idx_pair(images, labels)
            .with_context(|| format!("loading test data from {} and {}", images, labels))?;
        let eval = trainer.evaluate(&test_set)?;
        info!(
            samples = eval.samples,
            mean_cost = eval.mean_cost,
            accuracy = eval.accuracy,
            "evaluation"
        );
    }

    Ok(())
}
