//! Saving and loading evolved champions
//!
//! A snapshot is a single pretty-printed JSON document holding the champion's
//! network together with the configuration it was evolved under.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::EvolutionConfig;
use super::population::Champion;
use crate::neural::NeuralNet;

/// A champion network plus the metadata needed to replay it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionSnapshot {
    /// Crate version that wrote the snapshot
    pub version: String,

    /// Generation the champion was evaluated in
    pub generation: usize,

    /// Fitness score it achieved
    pub score: f64,

    /// Final snake length in its scoring game
    pub length: usize,

    /// Ticks survived in its scoring game
    pub ticks_alive: u32,

    /// Configuration of the run that produced it
    pub config: EvolutionConfig,

    pub network: NeuralNet,
}

impl ChampionSnapshot {
    pub fn new(champion: &Champion, config: &EvolutionConfig) -> Self {
        let game = champion.agent.game();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generation: champion.generation,
            score: champion.score,
            length: game.snake_len(),
            ticks_alive: game.ticks_alive(),
            config: config.clone(),
            network: champion.agent.net().clone(),
        }
    }
}

/// Write a snapshot to `path`, creating parent directories if needed
pub fn save_snapshot(snapshot: &ChampionSnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize champion")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write champion to {:?}", path))?;

    info!(path = %path.display(), score = snapshot.score, "saved champion");
    Ok(())
}

/// Read a snapshot back; the network's layer widths are re-validated on load
pub fn load_snapshot(path: &Path) -> Result<ChampionSnapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read champion from {:?}", path))?;
    let snapshot: ChampionSnapshot =
        serde_json::from_str(&json).context("Failed to deserialize champion")?;
    Ok(snapshot)
}
