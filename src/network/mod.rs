pub mod gradients;
pub mod network;
pub mod spec;

pub use gradients::GradientSet;
pub use network::Network;
pub use spec::{LayerSpec, NetworkSpec, WeightInit};
