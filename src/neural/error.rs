use thiserror::Error;

use super::layer::{CutIndex, LayerKind};

/// Errors raised by network construction and the genetic operators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    #[error("network must contain at least one layer")]
    Empty,
    #[error("bias layer must have exactly one row, got {rows}")]
    BiasShape { rows: usize },
    #[error("layer {index} input {actual} does not match previous output {expected}")]
    Topology {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("input has {actual} values, network expects {expected}")]
    InputWidth { expected: usize, actual: usize },
    #[error("layer kinds differ: {left:?} vs {right:?}")]
    KindMismatch { left: LayerKind, right: LayerKind },
    #[error("layer shapes differ: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("networks differ in depth: {left} vs {right} layers")]
    LayerCountMismatch { left: usize, right: usize },
    #[error("parent lists differ in length: {left} vs {right}")]
    ParentCountMismatch { left: usize, right: usize },
    #[error("expected one cut list per layer ({expected}), got {actual}")]
    CutListMismatch { expected: usize, actual: usize },
    #[error("cut {cut:?} lies outside a {rows}x{cols} layer")]
    CutOutOfRange {
        cut: CutIndex,
        rows: usize,
        cols: usize,
    },
    #[error("probability {0} must be between 0.0 and 1.0")]
    InvalidProbability(f64),
    #[error("cannot sample normal noise with mean {mean} and std {std}")]
    InvalidDistribution { mean: f64, std: f64 },
    #[error("invalid clamp range [{min}, {max}]")]
    InvalidBounds { min: f64, max: f64 },
}
