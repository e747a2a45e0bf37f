use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::loss::loss_type::LossType;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `size`       — number of neurons in this layer
/// - `activation` — activation applied after the linear transform
///
/// The layer's input size is implied by its predecessor (or by
/// `NetworkSpec::input_size` for the first layer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub activation: ActivationFunction,
}

/// How weight matrices are filled at construction.
///
/// Random policies leave the biases at zero; `Constant` fills both weights
/// and biases with `value`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform in `[-1, 1)`.
    Uniform,
    #[default]
    Xavier,
    He,
    Constant { value: f64 },
}

/// A fully serializable description of a network architecture plus the cost
/// it is trained against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Length of every input sample.
    pub input_size: usize,
    /// Ordered list of layers (first hidden → output).
    pub layers: Vec<LayerSpec>,
    pub loss: LossType,
    #[serde(default)]
    pub init: WeightInit,
}

impl NetworkSpec {
    pub fn new(input_size: usize, layers: Vec<LayerSpec>, loss: LossType) -> NetworkSpec {
        NetworkSpec { input_size, layers, loss, init: WeightInit::default() }
    }

    /// Builds a spec from the flat configuration form: `layer_sizes` lists the
    /// input size first and the output size last, with one activation per
    /// transition between consecutive sizes.
    pub fn from_sizes(
        layer_sizes: &[usize],
        activations: &[ActivationFunction],
        loss: LossType,
    ) -> Result<NetworkSpec> {
        if layer_sizes.len() < 2 {
            return Err(Error::Config(format!(
                "layer_sizes needs an input and at least one more layer, got {} entries",
                layer_sizes.len()
            )));
        }
        if activations.len() != layer_sizes.len() - 1 {
            return Err(Error::Config(format!(
                "{} layer sizes need {} activations, got {}",
                layer_sizes.len(),
                layer_sizes.len() - 1,
                activations.len()
            )));
        }
        let layers = layer_sizes[1..].iter().zip(activations)
            .map(|(&size, &activation)| LayerSpec { size, activation })
            .collect();
        Ok(NetworkSpec::new(layer_sizes[0], layers, loss))
    }

    pub fn with_init(mut self, init: WeightInit) -> NetworkSpec {
        self.init = init;
        self
    }

    /// Number of output classes (size of the last layer).
    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// `[input_size, layer sizes...]`.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size)
            .chain(self.layers.iter().map(|l| l.size))
            .collect()
    }

    /// Checks the structural rules every network must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(Error::Config("input_size must be at least 1".into()));
        }
        let Some(output) = self.layers.last() else {
            return Err(Error::Config("a network needs at least one layer".into()));
        };
        if let Some(i) = self.layers.iter().position(|l| l.size == 0) {
            return Err(Error::Config(format!("layer {} has size 0", i)));
        }
        let hidden = &self.layers[..self.layers.len() - 1];
        if let Some(i) = hidden.iter().position(|l| !l.activation.is_elementwise()) {
            return Err(Error::Config(format!(
                "layer {} uses {:?}, which is only valid on the output layer",
                i, hidden[i].activation
            )));
        }
        if !self.loss.pairs_with(output.activation) {
            return Err(Error::Config(format!(
                "{:?} loss cannot be paired with a {:?} output layer",
                self.loss, output.activation
            )));
        }
        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
