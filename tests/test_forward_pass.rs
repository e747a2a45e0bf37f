use approx::assert_abs_diff_eq;
use digitnet::{
    ActivationFunction::{self, *},
    Error, LossType, Matrix, Network, NetworkSpec, WeightInit,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn zero_network(activations: &[ActivationFunction], loss: LossType) -> Network {
    let spec = NetworkSpec::from_sizes(&[3, 4, 2], activations, loss)
        .unwrap()
        .with_init(WeightInit::Constant { value: 0.0 });
    Network::new(&spec, &mut StdRng::seed_from_u64(0)).unwrap()
}

#[test]
fn zero_parameters_give_sigmoid_half_everywhere() {
    let mut net = zero_network(&[Sigmoid, Sigmoid], LossType::SumSquaredError);
    let output = net.forward(&Matrix::column(&[0.3, -2.0, 7.0])).unwrap().clone();

    assert!(output.as_slice().iter().all(|&a| a == 0.5));
    let hidden = &net.layers()[0];
    assert!(hidden.pre_activation().as_slice().iter().all(|&z| z == 0.0));
    assert!(hidden.output().as_slice().iter().all(|&a| a == 0.5));
}

#[test]
fn zero_parameters_give_relu_zero_and_uniform_softmax() {
    let mut net = zero_network(&[ReLU, Softmax], LossType::CrossEntropy);
    let output = net.forward(&Matrix::column(&[1.0, 1.0, 1.0])).unwrap().clone();

    assert!(net.layers()[0].output().as_slice().iter().all(|&a| a == 0.0));
    for &p in output.as_slice() {
        assert_abs_diff_eq!(p, 0.5, epsilon = 1e-12);
    }
}

#[test]
fn hand_computed_two_layer_forward() {
    let spec = NetworkSpec::from_sizes(&[2, 2, 1], &[Sigmoid, Sigmoid], LossType::SumSquaredError)
        .unwrap();
    let w1 = Matrix::from_rows(&[vec![0.15, 0.20], vec![0.25, 0.30]]).unwrap();
    let b1 = Matrix::column(&[0.35, 0.35]);
    let w2 = Matrix::from_rows(&[vec![0.40, 0.45]]).unwrap();
    let b2 = Matrix::column(&[0.60]);
    let mut net = Network::from_parameters(&spec, vec![w1, w2], vec![b1, b2]).unwrap();

    let output = net.forward(&Matrix::column(&[0.05, 0.10])).unwrap().clone();
    assert_abs_diff_eq!(output.get(0, 0).unwrap(), 0.751365070, epsilon = 1e-8);

    let hidden = &net.layers()[0];
    assert_abs_diff_eq!(hidden.pre_activation().get(0, 0).unwrap(), 0.3775, epsilon = 1e-12);
    assert_abs_diff_eq!(hidden.output().get(0, 0).unwrap(), 0.593269992, epsilon = 1e-8);
    assert_abs_diff_eq!(hidden.output().get(1, 0).unwrap(), 0.596884378, epsilon = 1e-8);
}

#[test]
fn softmax_output_is_a_distribution() {
    let spec = NetworkSpec::from_sizes(&[4, 8, 10], &[ReLU, Softmax], LossType::CrossEntropy)
        .unwrap()
        .with_init(WeightInit::He);
    let mut net = Network::new(&spec, &mut StdRng::seed_from_u64(9)).unwrap();
    let output = net.forward(&Matrix::column(&[0.1, 0.9, 0.4, 0.0])).unwrap();

    assert_abs_diff_eq!(output.sum(), 1.0, epsilon = 1e-12);
    assert!(output.as_slice().iter().all(|&p| p > 0.0 && p < 1.0));
}

#[test]
fn forward_rejects_wrong_input_shape() {
    let mut net = zero_network(&[Sigmoid, Sigmoid], LossType::SumSquaredError);
    assert!(matches!(
        net.forward(&Matrix::column(&[1.0, 2.0])),
        Err(Error::DimensionMismatch { .. })
    ));
    assert!(matches!(
        net.forward(&Matrix::zeros(1, 3)),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn predict_returns_argmax() {
    let spec = NetworkSpec::from_sizes(&[2, 3], &[Identity], LossType::SumSquaredError).unwrap();
    let w = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
    let mut net = Network::from_parameters(&spec, vec![w], vec![Matrix::zeros(3, 1)]).unwrap();

    assert_eq!(net.predict(&Matrix::column(&[2.0, -5.0])).unwrap(), 0);
    assert_eq!(net.predict(&Matrix::column(&[1.0, 1.0])).unwrap(), 2);
}
