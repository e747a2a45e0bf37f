use digitnet::{
    ActivationFunction, Dataset, LossType, NetworkSpec, Sampling, TrainConfig, TrainEvent,
    Trainer, WeightInit,
};

fn main() -> digitnet::Result<()> {
    let spec = NetworkSpec::from_sizes(
        &[2, 4, 2],
        &[ActivationFunction::Sigmoid, ActivationFunction::Softmax],
        LossType::CrossEntropy,
    )?
    .with_init(WeightInit::Uniform);

    // Class 1 when exactly one input is set.
    let data = Dataset::from_pairs(vec![
        (vec![1.0, 0.0], 1),
        (vec![1.0, 1.0], 0),
        (vec![0.0, 1.0], 1),
        (vec![0.0, 0.0], 0),
    ]);

    let config = TrainConfig::new(0.5, 5000)
        .with_sampling(Sampling::Shuffled)
        .with_report_interval(4000)
        .with_seed(7);

    let mut trainer = Trainer::new(&spec, config)?;
    let mut events: Vec<TrainEvent> = Vec::new();
    let report = trainer.train(&data, &mut events)?;
    println!(
        "stopped after {} epochs ({:?}), {} progress events",
        report.epochs_run,
        report.stop_reason,
        events.len()
    );

    for (input, label) in data.iter() {
        let output = trainer.network_mut().infer(input)?;
        println!("Input: {:?} -> {:.4?} (expected class {})", input.as_slice(), output.as_slice(), label);
    }
    Ok(())
}
