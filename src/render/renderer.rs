use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{DeathCause, Game, Position};
use crate::input::PlaybackOptions;
use crate::metrics::GameMetrics;

/// What a single board tile shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Food,
    Head { colour: [u8; 3], alive: bool },
    Body { colour: [u8; 3], alive: bool },
}

/// Resolve the tile at `pos` across overlaid games.
///
/// Heads win over bodies, bodies over food; earlier games win ties.
pub fn cell_at(games: &[&Game], pos: Position) -> Cell {
    let mut cell = Cell::Empty;

    for game in games {
        let snake = game.snake();
        if snake.head() == pos {
            return Cell::Head {
                colour: snake.colour,
                alive: snake.alive,
            };
        }
        if cell == Cell::Empty || cell == Cell::Food {
            if snake.body_segments().contains(&pos) {
                cell = Cell::Body {
                    colour: snake.colour,
                    alive: snake.alive,
                };
            } else if game.food() == pos {
                cell = Cell::Food;
            }
        }
    }

    cell
}

/// Summary shown above a playback board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackStatus {
    pub alive: usize,
    pub total: usize,
    pub best_length: usize,
    pub ticks: u64,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Single game driven by the keyboard
    pub fn render(&self, frame: &mut Frame, game: &Game, metrics: &GameMetrics, paused: bool) {
        let chunks = Self::split(frame);

        let stats = self.render_stats(game, metrics, paused);
        frame.render_widget(stats, chunks[0]);

        if game.is_alive() {
            frame.render_widget(self.render_board(&[game], " Snake "), chunks[1]);
        } else {
            frame.render_widget(self.render_game_over(game), chunks[1]);
        }

        frame.render_widget(self.render_play_controls(), chunks[2]);
    }

    /// Several agent games overlaid on one board
    pub fn render_playback(
        &self,
        frame: &mut Frame,
        games: &[&Game],
        status: &PlaybackStatus,
        options: &PlaybackOptions,
    ) {
        let chunks = Self::split(frame);

        frame.render_widget(self.render_playback_status(status, options), chunks[0]);
        frame.render_widget(self.render_board(games, " Evolved snakes "), chunks[1]);
        frame.render_widget(self.render_playback_controls(), chunks[2]);
    }

    fn split(frame: &Frame) -> std::rc::Rc<[ratatui::layout::Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area())
    }

    fn render_board(&self, games: &[&Game], title: &'static str) -> Paragraph<'static> {
        let Some(first) = games.first() else {
            return Paragraph::new("no games").alignment(Alignment::Center);
        };
        let config = first.config();

        let mut lines = Vec::with_capacity(config.rows() as usize);
        for row in 0..config.rows() {
            let spans: Vec<Span> = (0..config.columns())
                .map(|col| {
                    let pos = Position::new(col * config.tile_size, row * config.tile_size);
                    Self::cell_span(cell_at(games, pos))
                })
                .collect();
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn cell_span(cell: Cell) -> Span<'static> {
        let tint = |colour: [u8; 3], alive: bool| {
            if alive {
                Color::Rgb(colour[0], colour[1], colour[2])
            } else {
                Color::DarkGray
            }
        };

        match cell {
            Cell::Head { colour, alive } => Span::styled(
                "■ ",
                Style::default()
                    .fg(tint(colour, alive))
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::Body { colour, alive } => {
                Span::styled("□ ", Style::default().fg(tint(colour, alive)))
            }
            Cell::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }

    fn render_stats(&self, game: &Game, metrics: &GameMetrics, paused: bool) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                game.snake_len().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Ticks: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                game.ticks_alive().to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.best_length.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];
        if paused {
            spans.push(Span::styled(
                "    PAUSED",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_playback_status(
        &self,
        status: &PlaybackStatus,
        options: &PlaybackOptions,
    ) -> Paragraph<'static> {
        let mut spans = vec![
            Span::styled("Alive: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}/{}", status.alive, status.total),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                status.best_length.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Ticks: ", Style::default().fg(Color::Yellow)),
            Span::styled(status.ticks.to_string(), Style::default().fg(Color::White)),
        ];

        let flags = [
            (options.paused, "PAUSED"),
            (options.slow_down, "SLOW"),
            (options.show_only_best, "BEST ONLY"),
        ];
        for (_, label) in flags.iter().filter(|(on, _)| *on) {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                *label,
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, game: &Game) -> Paragraph<'static> {
        let cause = match game.death() {
            Some(DeathCause::Wall) => "hit the wall",
            Some(DeathCause::SelfCollision) => "ran into itself",
            Some(DeathCause::Starvation) => "starved",
            Some(DeathCause::BoardFull) => "filled the board",
            None => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    game.snake_len().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_play_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_playback_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("S", Style::default().fg(Color::Cyan)),
            Span::raw(" slow | "),
            Span::styled("B", Style::default().fg(Color::Cyan)),
            Span::raw(" best only | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
