use thiserror::Error;

use crate::agent::AgentError;
use crate::neural::NetworkError;

/// Errors that abort a generation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolutionError {
    #[error("tournament bracket size must be at least 1")]
    EmptyBracket,
    #[error("cannot draw a bracket of {bracket} from {remaining} remaining candidates")]
    ExhaustedPool { bracket: usize, remaining: usize },
    #[error("population is empty")]
    EmptyPopulation,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Agent(#[from] AgentError),
}
