//! Playback of an evolved champion
//!
//! Loads a saved champion and runs several fresh copies of it side by side on
//! one board. Each copy gets its own food sequence, so they diverge quickly.
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - S: Toggle slow motion
//! - B: Show only the best-scoring copy
//! - R: Restart all copies
//! - Q/Esc: Quit

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::agent::Agent;
use crate::evolution::{ChampionSnapshot, Fitness, load_snapshot};
use crate::game::{Game, TickPacer};
use crate::input::{InputHandler, KeyAction, PlaybackOptions};
use crate::render::{PlaybackStatus, Renderer};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const PALETTE: [[u8; 3]; 6] = [
    [255, 255, 255],
    [0, 200, 255],
    [120, 255, 120],
    [255, 200, 0],
    [255, 120, 255],
    [255, 140, 90],
];

pub struct WatchMode {
    snapshot: ChampionSnapshot,
    agents: Vec<Agent>,
    rng: SmallRng,
    options: PlaybackOptions,
    pacer: TickPacer,
    renderer: Renderer,
    input_handler: InputHandler,
    ticks: u64,
    should_quit: bool,
}

impl WatchMode {
    /// Load a champion from `path` and prepare `copies` fresh games for it
    pub fn new(path: &Path, copies: usize, seed: Option<u64>) -> Result<Self> {
        let snapshot = load_snapshot(path)
            .with_context(|| format!("Failed to load champion from {:?}", path))?;
        if let Err(message) = snapshot.config.game.validate() {
            bail!("Invalid board in {:?}: {}", path, message);
        }

        println!("{}", "=".repeat(60));
        println!("Loaded Champion");
        println!("{}", "=".repeat(60));
        println!("Path: {:?}", path);
        println!("Generation: {}", snapshot.generation);
        println!("Score: {:.1}", snapshot.score);
        println!("Length: {}", snapshot.length);
        println!("Ticks alive: {}", snapshot.ticks_alive);
        println!(
            "Board: {}x{} tiles",
            snapshot.config.game.columns(),
            snapshot.config.game.rows()
        );
        println!("Version: {}", snapshot.version);
        println!("{}", "=".repeat(60));

        Self::from_snapshot(snapshot, copies, seed, PlaybackOptions::default())
    }

    pub fn from_snapshot(
        snapshot: ChampionSnapshot,
        copies: usize,
        seed: Option<u64>,
        options: PlaybackOptions,
    ) -> Result<Self> {
        if let Err(message) = snapshot.config.game.validate() {
            bail!("Invalid board in champion snapshot: {}", message);
        }

        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut agents = Vec::with_capacity(copies.max(1));
        for index in 0..copies.max(1) {
            let mut game = Game::seeded(snapshot.config.game.clone(), rng.r#gen());
            game.set_colour(PALETTE[index % PALETTE.len()]);
            let agent = Agent::new(game, snapshot.network.clone())
                .context("Saved network does not fit the snake sensors")?;
            agents.push(agent);
        }

        Ok(Self {
            snapshot,
            agents,
            rng,
            pacer: TickPacer::new(options.current_interval()),
            options,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            ticks: 0,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_playback_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_playback_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    if !self.options.paused && self.pacer.advance(now - last_frame) {
                        self.step();
                    }
                    last_frame = now;

                    terminal.draw(|frame| {
                        let games = self.visible_games();
                        self.renderer.render_playback(frame, &games, &self.status(), &self.options);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        let action = self.input_handler.handle_playback_key(key);
        if self.options.apply(&action) {
            self.pacer.set_interval(self.options.current_interval());
            return;
        }

        match action {
            KeyAction::Restart => self.restart(),
            KeyAction::Quit => self.should_quit = true,
            _ => {}
        }
    }

    /// Advance every live copy by one tick
    pub fn step(&mut self) {
        if !self.any_alive() {
            return;
        }
        for agent in self.agents.iter_mut().filter(|agent| agent.is_alive()) {
            agent.update();
        }
        self.ticks += 1;
    }

    /// Fresh games for every copy, keeping their colours
    pub fn restart(&mut self) {
        for agent in &mut self.agents {
            let colour = agent.game().snake().colour;
            *agent = agent.fresh_copy(&mut self.rng);
            agent.set_colour(colour);
        }
        self.ticks = 0;
        self.pacer.reset();
    }

    pub fn any_alive(&self) -> bool {
        self.agents.iter().any(Agent::is_alive)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn options(&self) -> &PlaybackOptions {
        &self.options
    }

    /// Index of the highest-scoring copy; later copies win ties
    pub fn best_index(&self) -> usize {
        let fitness = &self.snapshot.config.fitness;
        let mut best = 0;
        for (index, agent) in self.agents.iter().enumerate().skip(1) {
            if fitness.score(agent.game()) >= fitness.score(self.agents[best].game()) {
                best = index;
            }
        }
        best
    }

    /// Games to draw under the current options
    pub fn visible_games(&self) -> Vec<&Game> {
        if self.options.show_only_best {
            vec![self.agents[self.best_index()].game()]
        } else {
            self.agents.iter().map(Agent::game).collect()
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            alive: self.agents.iter().filter(|agent| agent.is_alive()).count(),
            total: self.agents.len(),
            best_length: self
                .agents
                .iter()
                .map(|agent| agent.game().snake_len())
                .max()
                .unwrap_or(0),
            ticks: self.ticks,
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
