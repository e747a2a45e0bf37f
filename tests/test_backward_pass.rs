// Backpropagated gradients against hand-computed values and central finite
// differences.

use approx::assert_abs_diff_eq;
use digitnet::{
    ActivationFunction::{self, *},
    Error, GradientSet, LossType, Matrix, Network, NetworkSpec, WeightInit,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f64 = 1e-6;

fn parameters(net: &Network) -> (Vec<Matrix>, Vec<Matrix>) {
    net.layers().iter().map(|l| (l.weights.clone(), l.biases.clone())).unzip()
}

fn cost_with(spec: &NetworkSpec, w: Vec<Matrix>, b: Vec<Matrix>, x: &Matrix, t: &Matrix) -> f64 {
    let mut net = Network::from_parameters(spec, w, b).unwrap();
    let output = net.forward(x).unwrap().clone();
    spec.loss.cost(&output, t).unwrap()
}

/// Compares every analytic gradient with `(C(p + ε) - C(p - ε)) / 2ε`.
fn check_gradients(spec: &NetworkSpec, seed: u64, x: &Matrix, t: &Matrix) {
    let mut net = Network::new(spec, &mut StdRng::seed_from_u64(seed)).unwrap();
    net.forward(x).unwrap();
    net.backward(t).unwrap();
    let (weights, biases) = parameters(&net);

    for (l, layer) in net.layers().iter().enumerate() {
        let (dw, db) = layer.gradients();

        for k in 0..weights[l].len() {
            let mut plus = weights.clone();
            plus[l].as_mut_slice()[k] += EPS;
            let mut minus = weights.clone();
            minus[l].as_mut_slice()[k] -= EPS;
            let numeric = (cost_with(spec, plus, biases.clone(), x, t)
                - cost_with(spec, minus, biases.clone(), x, t))
                / (2.0 * EPS);
            assert_abs_diff_eq!(dw.as_slice()[k], numeric, epsilon = 1e-6);
        }

        for k in 0..biases[l].len() {
            let mut plus = biases.clone();
            plus[l].as_mut_slice()[k] += EPS;
            let mut minus = biases.clone();
            minus[l].as_mut_slice()[k] -= EPS;
            let numeric = (cost_with(spec, weights.clone(), plus, x, t)
                - cost_with(spec, weights.clone(), minus, x, t))
                / (2.0 * EPS);
            assert_abs_diff_eq!(db.as_slice()[k], numeric, epsilon = 1e-6);
        }
    }
}

fn spec(sizes: &[usize], activations: &[ActivationFunction], loss: LossType) -> NetworkSpec {
    NetworkSpec::from_sizes(sizes, activations, loss).unwrap()
}

#[test]
fn sigmoid_sse_gradients_match_finite_differences() {
    let s = spec(&[3, 4, 2], &[Sigmoid, Sigmoid], LossType::SumSquaredError);
    check_gradients(&s, 1, &Matrix::column(&[0.2, -0.4, 0.9]), &Matrix::column(&[1.0, 0.0]));
}

#[test]
fn softmax_cross_entropy_gradients_match_finite_differences() {
    let s = spec(&[4, 5, 3, 3], &[Sigmoid, Sigmoid, Softmax], LossType::CrossEntropy);
    check_gradients(
        &s,
        2,
        &Matrix::column(&[0.5, 0.1, 0.0, 0.8]),
        &Matrix::column(&[0.0, 0.0, 1.0]),
    );
}

#[test]
fn relu_hidden_gradients_match_finite_differences() {
    let s = spec(&[3, 6, 2], &[ReLU, Softmax], LossType::CrossEntropy).with_init(WeightInit::He);
    check_gradients(&s, 3, &Matrix::column(&[0.7, 0.3, 0.5]), &Matrix::column(&[0.0, 1.0]));
}

#[test]
fn hand_computed_output_weight_gradient() {
    let s = spec(&[2, 2, 1], &[Sigmoid, Sigmoid], LossType::SumSquaredError);
    let w1 = Matrix::from_rows(&[vec![0.15, 0.20], vec![0.25, 0.30]]).unwrap();
    let w2 = Matrix::from_rows(&[vec![0.40, 0.45]]).unwrap();
    let mut net = Network::from_parameters(
        &s,
        vec![w1, w2],
        vec![Matrix::column(&[0.35, 0.35]), Matrix::column(&[0.60])],
    )
    .unwrap();

    net.forward(&Matrix::column(&[0.05, 0.10])).unwrap();
    net.backward(&Matrix::column(&[0.01])).unwrap();

    let (dw2, db2) = net.layers()[1].gradients();
    assert_abs_diff_eq!(dw2.get(0, 0).unwrap(), 0.082167041, epsilon = 1e-8);
    assert_abs_diff_eq!(db2.get(0, 0).unwrap(), 0.138498562, epsilon = 1e-8);
    assert_eq!(net.layers()[0].gradients().0.shape(), (2, 2));
}

#[test]
fn one_step_reduces_cost() {
    let s = spec(&[2, 2, 1], &[Sigmoid, Sigmoid], LossType::SumSquaredError)
        .with_init(WeightInit::Uniform);
    let mut net = Network::new(&s, &mut StdRng::seed_from_u64(42)).unwrap();
    let x = Matrix::column(&[0.05, 0.10]);
    let t = Matrix::column(&[0.01]);

    let before = s.loss.cost(net.forward(&x).unwrap(), &t).unwrap();
    net.backward(&t).unwrap();
    net.apply_gradients(0.5).unwrap();
    let after = s.loss.cost(net.infer(&x).unwrap(), &t).unwrap();

    assert!(after < before, "cost went from {} to {}", before, after);
}

#[test]
fn backward_rejects_wrong_target_shape() {
    let s = spec(&[2, 3], &[Sigmoid], LossType::SumSquaredError);
    let mut net = Network::new(&s, &mut StdRng::seed_from_u64(0)).unwrap();
    net.forward(&Matrix::column(&[1.0, 0.0])).unwrap();
    assert!(matches!(
        net.backward(&Matrix::column(&[1.0, 0.0])),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn gradient_set_applies_the_mean() {
    let s = spec(&[2, 3, 2], &[Sigmoid, Softmax], LossType::CrossEntropy);
    let mut net = Network::new(&s, &mut StdRng::seed_from_u64(5)).unwrap();
    let samples = [
        (Matrix::column(&[1.0, 0.0]), Matrix::column(&[1.0, 0.0])),
        (Matrix::column(&[0.0, 1.0]), Matrix::column(&[0.0, 1.0])),
    ];

    // Expected: W - lr * (g1 + g2) / 2, computed by hand from the per-sample gradients.
    let mut expected = parameters(&net).0;
    let mut set = GradientSet::for_network(&net);
    for (x, t) in &samples {
        net.forward(x).unwrap();
        net.backward(t).unwrap();
        set.accumulate(&net).unwrap();
        for (w, layer) in expected.iter_mut().zip(net.layers()) {
            w.scaled_add(layer.gradients().0, -0.1 / 2.0).unwrap();
        }
    }
    assert_eq!(set.samples(), 2);

    net.apply_gradient_set(&set, 0.1).unwrap();
    for (w, layer) in expected.iter().zip(net.layers()) {
        for (a, b) in w.as_slice().iter().zip(layer.weights.as_slice()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    set.reset();
    assert_eq!(set.samples(), 0);
    let snapshot = parameters(&net).0;
    net.apply_gradient_set(&set, 0.1).unwrap();
    assert_eq!(parameters(&net).0, snapshot);
}
