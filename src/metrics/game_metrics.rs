use std::time::{Duration, Instant};

use crate::game::{DeathCause, Game};

/// Session counters for interactive play
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_length: usize,
    pub games_played: u32,
    pub last_death: Option<DeathCause>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_length: 0,
            games_played: 0,
            last_death: None,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, game: &Game) {
        self.games_played += 1;
        self.best_length = self.best_length.max(game.snake_len());
        self.last_death = game.death();
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Position, Snake};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn finished_game(length: usize) -> Game {
        let segments = (0..length as i32).map(|i| Position::new(0, i)).collect();
        let snake = Snake::from_segments(segments, Direction::Up).unwrap();
        let mut game = Game::with_layout(
            GameConfig::tiles(10, 10),
            snake,
            Position::new(5, 5),
            SmallRng::seed_from_u64(0),
        );
        game.tick();
        game
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_best_length_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(&finished_game(3));
        assert_eq!(metrics.best_length, 3);
        assert_eq!(metrics.games_played, 1);
        assert_eq!(metrics.last_death, Some(DeathCause::Wall));

        metrics.on_game_over(&finished_game(2));
        assert_eq!(metrics.best_length, 3);
        assert_eq!(metrics.games_played, 2);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
