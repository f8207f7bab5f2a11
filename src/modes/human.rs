use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;

use crate::game::{Action, Direction, Game, GameConfig, TickPacer};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Game ticks at 8 Hz
const TICK_INTERVAL: Duration = Duration::from_millis(125);

/// Frames at roughly 30 FPS
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    game: Game,
    pacer: TickPacer,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            game: Game::new(config, rng),
            pacer: TickPacer::new(TICK_INTERVAL),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            pending_direction: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
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
                    self.advance(now - last_frame);
                    last_frame = now;

                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.game, &self.metrics, self.paused);
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

        match self.input_handler.handle_key_event(key) {
            KeyAction::GameAction(Action::Move(dir)) => {
                self.pending_direction = Some(dir);
            }
            KeyAction::TogglePause => {
                self.paused = !self.paused;
                self.pacer.reset();
            }
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            _ => {}
        }
    }

    /// Feed wall-clock time to the pacer and tick the game when one is due
    fn advance(&mut self, elapsed: Duration) {
        if self.paused || !self.game.is_alive() {
            return;
        }
        if self.pacer.advance(elapsed) {
            self.update_game();
        }
    }

    fn update_game(&mut self) {
        // At most one heading change per tick
        let action = self
            .pending_direction
            .take()
            .map(Action::Move)
            .unwrap_or(Action::Continue);

        let outcome = self.game.step(action);

        if outcome.death.is_some() {
            self.metrics.on_game_over(&self.game);
        }
    }

    fn reset_game(&mut self) {
        self.game.reset();
        self.pacer.reset();
        self.metrics.on_game_start();
        self.pending_direction = None;
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
