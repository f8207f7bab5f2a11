//! Feed-forward networks evolved by genetic operators.
//!
//! A [`NeuralNet`] is an ordered stack of weight and bias [`Layer`]s. There is
//! no activation function and no gradient: networks change only through
//! mutation, clamping and crossover.

pub mod error;
pub mod layer;
pub mod network;

pub use error::NetworkError;
pub use layer::{CutIndex, Layer, LayerKind};
pub use network::{NetworkBuilder, NeuralNet, argmax, cross_over_index_pairs};
