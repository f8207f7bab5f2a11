//! Headless evolution mode
//!
//! Runs the genetic algorithm without rendering, printing progress to stdout
//! and writing the champion to disk periodically and at the end.
//!
//! # Example
//!
//! ```rust,no_run
//! use evo_snake::modes::{TrainConfig, TrainMode};
//! use std::path::PathBuf;
//!
//! let config = TrainConfig::new(PathBuf::from("models/champion.json"));
//! let mut train_mode = TrainMode::new(config)?;
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::evolution::{
    ChampionSnapshot, Evolution, EvolutionConfig, GenerationReport, load_snapshot, save_snapshot,
};
use crate::metrics::EvolutionStats;

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Genetic algorithm and board settings
    pub evolution: EvolutionConfig,

    /// Where the final champion is written
    pub save_path: PathBuf,

    /// Save a checkpoint every N generations; 0 disables checkpoints
    pub checkpoint_frequency: usize,

    /// Print progress every N generations
    pub log_frequency: usize,

    /// Seed the first population from a saved champion instead of random networks
    pub resume_from: Option<PathBuf>,
}

impl TrainConfig {
    pub fn new(save_path: PathBuf) -> Self {
        Self {
            evolution: EvolutionConfig::default(),
            save_path,
            checkpoint_frequency: 10,
            log_frequency: 1,
            resume_from: None,
        }
    }
}

pub struct TrainMode {
    evolution: Evolution,
    stats: EvolutionStats,
    config: TrainConfig,
}

impl TrainMode {
    pub fn new(config: TrainConfig) -> Result<Self> {
        let evolution = match &config.resume_from {
            Some(path) => {
                let snapshot = load_snapshot(path)
                    .with_context(|| format!("Failed to resume from {:?}", path))?;
                Evolution::from_network(config.evolution.clone(), snapshot.network)
                    .context("Failed to seed population from champion")?
            }
            None => Evolution::new(config.evolution.clone())
                .context("Failed to create initial population")?,
        };

        Ok(Self {
            evolution,
            stats: EvolutionStats::new(10),
            config,
        })
    }

    /// Run every generation, then save the champion
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        while !self.evolution.is_finished() {
            let next = self.evolution.generation() + 1;
            let report = self
                .evolution
                .run_generation()
                .with_context(|| format!("Generation {} failed", next))?;
            self.stats.record(&report);

            if report.generation % self.config.log_frequency.max(1) == 0 {
                self.print_progress(&report);
            }

            if self.config.checkpoint_frequency > 0
                && report.generation % self.config.checkpoint_frequency == 0
            {
                self.save_checkpoint(report.generation)?;
            }
        }

        self.save_champion(&self.config.save_path)?;

        println!("\nEvolution complete!");
        println!("Champion saved to: {:?}", self.config.save_path);
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    pub fn evolution(&self) -> &Evolution {
        &self.evolution
    }

    pub fn stats(&self) -> &EvolutionStats {
        &self.stats
    }

    pub fn champion_snapshot(&self) -> Option<ChampionSnapshot> {
        self.evolution
            .champion()
            .map(|champion| ChampionSnapshot::new(champion, self.evolution.config()))
    }

    fn checkpoint_path(&self, generation: usize) -> PathBuf {
        self.config
            .save_path
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("checkpoint_gen{}.json", generation))
    }

    fn save_checkpoint(&self, generation: usize) -> Result<()> {
        let path = self.checkpoint_path(generation);
        self.save_champion(&path)
            .with_context(|| format!("Failed to save checkpoint to {:?}", path))?;
        println!("  Checkpoint saved: {:?}", path);
        Ok(())
    }

    fn save_champion(&self, path: &Path) -> Result<()> {
        let snapshot = self
            .champion_snapshot()
            .context("No champion to save; no generation has completed")?;
        save_snapshot(&snapshot, path)
    }

    fn print_header(&self) {
        let evolution = &self.config.evolution;
        println!("{}", "=".repeat(70));
        println!("Evolving Snake");
        println!("{}", "=".repeat(70));
        println!("Generations: {}", evolution.generations);
        println!("Population: {}", evolution.population_size);
        println!(
            "Board: {}x{} tiles (tile size {}), life time {}",
            evolution.game.columns(),
            evolution.game.rows(),
            evolution.game.tile_size,
            evolution.game.life_time
        );
        println!("Genetic operators:");
        println!("  Tournament size: {}", evolution.tournament_size);
        println!(
            "  Mutation: N({}, {})",
            evolution.mutation_mean, evolution.mutation_std
        );
        println!("  Weight cap: ±{}", evolution.weight_cap);
        println!("  Crossover probability: {}", evolution.crossover_probability);
        println!("  Hidden layers: {:?}", evolution.hidden_layers);
        println!("  Replacement: {:?}", evolution.replacement);
        println!("  Fitness: {:?}", evolution.fitness);
        if let Some(seed) = evolution.seed {
            println!("Seed: {}", seed);
        }
        if let Some(path) = &self.config.resume_from {
            println!("Resuming from: {:?}", path);
        }
        if self.config.checkpoint_frequency > 0 {
            println!(
                "Checkpoints: Every {} generations",
                self.config.checkpoint_frequency
            );
        }
        println!("Save path: {:?}", self.config.save_path);
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self, report: &GenerationReport) {
        println!(
            "[Generation {}/{}] best {:.1} | mean {:.1} | longest {} | champion {:.1}{}",
            report.generation,
            self.config.evolution.generations,
            report.best_score,
            report.mean_score,
            report.best_length,
            report.champion_score,
            if report.new_champion { " *" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use tempfile::TempDir;

    fn small_config(save_path: PathBuf) -> TrainConfig {
        let mut config = TrainConfig::new(save_path);
        config.evolution = EvolutionConfig {
            population_size: 6,
            generations: 4,
            hidden_layers: vec![5],
            seed: Some(11),
            game: GameConfig::small(),
            ..Default::default()
        };
        config.checkpoint_frequency = 2;
        config
    }

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new(PathBuf::from("champion.json"));
        assert_eq!(config.save_path, PathBuf::from("champion.json"));
        assert_eq!(config.evolution, EvolutionConfig::default());
        assert!(config.resume_from.is_none());
    }

    #[test]
    fn test_run_writes_champion_and_checkpoints() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("champion.json");

        let mut train_mode = TrainMode::new(small_config(save_path.clone())).unwrap();
        train_mode.run().unwrap();

        assert_eq!(train_mode.stats().total_generations(), 4);
        assert!(save_path.exists());
        assert!(temp_dir.path().join("checkpoint_gen2.json").exists());
        assert!(temp_dir.path().join("checkpoint_gen4.json").exists());

        let saved = load_snapshot(&save_path).unwrap();
        assert_eq!(Some(saved), train_mode.champion_snapshot());
    }

    #[test]
    fn test_resume_seeds_population_from_champion() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("champion.json");
        let mut first = TrainMode::new(small_config(save_path.clone())).unwrap();
        first.run().unwrap();

        let mut config = small_config(temp_dir.path().join("second.json"));
        config.resume_from = Some(save_path.clone());
        let second = TrainMode::new(config).unwrap();

        let champion = load_snapshot(&save_path).unwrap().network;
        assert_eq!(second.evolution().population()[0].net(), &champion);
    }

    #[test]
    fn test_resume_from_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = small_config(temp_dir.path().join("champion.json"));
        config.resume_from = Some(temp_dir.path().join("missing.json"));

        assert!(TrainMode::new(config).is_err());
    }
}
