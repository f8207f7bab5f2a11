use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use evo_snake::evolution::{EvolutionConfig, ReplacementPolicy};
use evo_snake::modes::{HumanMode, TrainConfig, TrainMode, WatchMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "evo_snake")]
#[command(version, about = "Snake played by neural networks evolved with a genetic algorithm")]
struct Cli {
    /// Mode to run
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON file with evolution and board settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in tiles
    #[arg(long)]
    width: Option<i32>,

    /// Board height in tiles
    #[arg(long)]
    height: Option<i32>,

    /// Ticks a snake may go without eating
    #[arg(long)]
    life_time: Option<u32>,

    /// Seed for every random draw
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generations to evolve (train)
    #[arg(long)]
    generations: Option<usize>,

    /// Agents per generation (train)
    #[arg(long)]
    population: Option<usize>,

    /// Keep every generation instead of replacing the population (train)
    #[arg(long)]
    append: bool,

    /// Evaluate agents on all cores (train)
    #[arg(long)]
    parallel: bool,

    /// Champion file written by train and read by watch
    #[arg(long, default_value = "models/champion.json")]
    model: PathBuf,

    /// Seed the first population from an existing champion (train)
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Save a checkpoint every N generations, 0 to disable (train)
    #[arg(long, default_value = "10")]
    checkpoint_frequency: usize,

    /// Number of champion copies to run side by side (watch)
    #[arg(long, default_value = "10")]
    copies: usize,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Evolve networks headlessly and save the champion
    Train,
    /// Watch a saved champion play
    Watch,
}

impl Cli {
    fn evolution_config(&self) -> Result<EvolutionConfig> {
        let mut config = match &self.config {
            Some(path) => EvolutionConfig::from_json_file(path)?,
            None => EvolutionConfig::default(),
        };

        if self.width.is_some() || self.height.is_some() {
            config.game = match config.game.resized(self.width, self.height) {
                Ok(game) => game,
                Err(message) => bail!("Invalid configuration: {}", message),
            };
        }
        if let Some(life_time) = self.life_time {
            config.game.life_time = life_time;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.append {
            config.replacement = ReplacementPolicy::Append;
        }
        if self.parallel {
            config.parallel = true;
        }

        if let Err(message) = config.validate() {
            bail!("Invalid configuration: {}", message);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.mode {
        Mode::Human => {
            let config = cli.evolution_config()?;
            let mut human_mode = HumanMode::new(config.game, cli.seed);
            human_mode.run().await?;
        }
        Mode::Train => {
            let mut train_config = TrainConfig::new(cli.model.clone());
            train_config.evolution = cli.evolution_config()?;
            train_config.checkpoint_frequency = cli.checkpoint_frequency;
            train_config.resume_from = cli.resume.clone();

            let mut train_mode = TrainMode::new(train_config)?;
            tokio::task::spawn_blocking(move || train_mode.run())
                .await
                .context("Training task panicked")??;
        }
        Mode::Watch => {
            let mut watch_mode = WatchMode::new(&cli.model, cli.copies, cli.seed)?;
            watch_mode.run().await?;
        }
    }

    Ok(())
}
