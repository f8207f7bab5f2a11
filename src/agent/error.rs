use thiserror::Error;

use crate::neural::NetworkError;

/// Errors raised when pairing a network with a game
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AgentError {
    #[error("network expects {actual} inputs but the sensors produce {expected}")]
    SensorWidthMismatch { expected: usize, actual: usize },
    #[error("network produces {actual} outputs but there are {expected} actions")]
    ActionWidthMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Network(#[from] NetworkError),
}
