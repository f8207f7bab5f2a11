//! Genetic algorithm configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::fitness::FitnessFormula;
use crate::game::GameConfig;

/// What happens to the previous generation once new candidates are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// The new candidates become the whole population
    #[default]
    Replace,
    /// New candidates are appended to the history; the newest
    /// `population_size` members are evaluated each generation
    Append,
}

/// Configuration for the evolutionary loop
///
/// # Example
///
/// ```rust
/// use evo_snake::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig {
///     population_size: 50,
///     generations: 10,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Agents evaluated per generation
    ///
    /// Must be a multiple of `tournament_size`.
    ///
    /// Default: 200
    pub population_size: usize,

    /// Number of generations to run
    ///
    /// Default: 50
    pub generations: usize,

    /// Bracket size for tournament selection
    ///
    /// Each winner is also copied this many times, so the population
    /// size is preserved from one generation to the next.
    ///
    /// Default: 2
    pub tournament_size: usize,

    /// Mean of the Gaussian mutation noise
    ///
    /// Default: 0.0
    pub mutation_mean: f64,

    /// Standard deviation of the Gaussian mutation noise
    ///
    /// Default: 1/200
    pub mutation_std: f64,

    /// Weights are clipped to `[-weight_cap, weight_cap]` after mutation
    ///
    /// Default: 1.0
    pub weight_cap: f64,

    /// Per-parameter swap probability for uniform crossover
    ///
    /// Default: 0.5
    pub crossover_probability: f64,

    /// Widths of the hidden layers; each gets a weights and a bias layer
    ///
    /// Default: [64, 64]
    pub hidden_layers: Vec<usize>,

    /// Mean of the initial weights
    ///
    /// Default: 0.0
    pub init_mean: f64,

    /// Standard deviation of the initial weights
    ///
    /// Default: 1/25
    pub init_std: f64,

    /// Default: [`ReplacementPolicy::Replace`]
    pub replacement: ReplacementPolicy,

    /// Default: length² × ticks alive
    pub fitness: FitnessFormula,

    /// Seed for every random draw in the run; `None` seeds from entropy
    pub seed: Option<u64>,

    /// Evaluate agents on the rayon thread pool
    ///
    /// Default: false
    pub parallel: bool,

    pub game: GameConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 200,
            generations: 50,
            tournament_size: 2,
            mutation_mean: 0.0,
            mutation_std: 1.0 / 200.0,
            weight_cap: 1.0,
            crossover_probability: 0.5,
            hidden_layers: vec![64, 64],
            init_mean: 0.0,
            init_std: 1.0 / 25.0,
            replacement: ReplacementPolicy::default(),
            fitness: FitnessFormula::default(),
            seed: None,
            parallel: false,
            game: GameConfig::default(),
        }
    }
}

impl EvolutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".to_string());
        }

        if self.population_size == 0 {
            return Err("population_size must be positive".to_string());
        }

        if self.population_size % self.tournament_size != 0 {
            return Err(format!(
                "population_size ({}) must be a multiple of tournament_size ({})",
                self.population_size, self.tournament_size
            ));
        }

        if !self.mutation_std.is_finite() || self.mutation_std < 0.0 {
            return Err(format!(
                "mutation_std must be non-negative, got {}",
                self.mutation_std
            ));
        }

        if !self.init_std.is_finite() || self.init_std < 0.0 {
            return Err(format!(
                "init_std must be non-negative, got {}",
                self.init_std
            ));
        }

        if !self.mutation_mean.is_finite() || !self.init_mean.is_finite() {
            return Err("mutation_mean and init_mean must be finite".to_string());
        }

        if !self.weight_cap.is_finite() || self.weight_cap <= 0.0 {
            return Err(format!(
                "weight_cap must be positive, got {}",
                self.weight_cap
            ));
        }

        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(format!(
                "crossover_probability must be in [0, 1], got {}",
                self.crossover_probability
            ));
        }

        if self.hidden_layers.contains(&0) {
            return Err("hidden layer widths must be positive".to_string());
        }

        self.fitness.validate()?;
        self.game.validate()
    }
}
