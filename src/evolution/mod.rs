//! Genetic algorithm over snake-playing agents.
//!
//! Each generation runs as ordered phases with a full barrier between them:
//! every agent is played to death, scored, then selected, copied, mutated
//! and recombined into the next population.

pub mod config;
pub mod error;
pub mod fitness;
pub mod persistence;
pub mod population;
pub mod selection;

pub use config::{EvolutionConfig, ReplacementPolicy};
pub use error::EvolutionError;
pub use fitness::{Fitness, FitnessFormula};
pub use persistence::{ChampionSnapshot, load_snapshot, save_snapshot};
pub use population::{
    Champion, Evolution, GenerationReport, evaluate_headless, promote_champion, recombine,
    reproduce,
};
pub use selection::tournament_select;
