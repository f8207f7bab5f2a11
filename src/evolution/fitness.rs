//! Scoring strategies for a finished (or running) game.
//!
//! Selection only needs a total order where higher is better, so any
//! `Fn(&Game) -> f64` works as a strategy alongside the built-in formulas.

use serde::{Deserialize, Serialize};

use crate::game::Game;

pub trait Fitness {
    fn score(&self, game: &Game) -> f64;
}

impl<F> Fitness for F
where
    F: Fn(&Game) -> f64,
{
    fn score(&self, game: &Game) -> f64 {
        self(game)
    }
}

/// Built-in formulas combining snake length and survival ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessFormula {
    /// `length² × ticks_alive`
    #[default]
    LengthSquaredTimesTicks,
    /// `length × ticks_alive`
    LengthTimesTicks,
    /// `length × ticks_alive / divisor`
    ScaledLengthTimesTicks { divisor: f64 },
}

impl Fitness for FitnessFormula {
    fn score(&self, game: &Game) -> f64 {
        let length = game.snake_len() as f64;
        let ticks = f64::from(game.ticks_alive());

        match *self {
            FitnessFormula::LengthSquaredTimesTicks => length * length * ticks,
            FitnessFormula::LengthTimesTicks => length * ticks,
            FitnessFormula::ScaledLengthTimesTicks { divisor } => length * ticks / divisor,
        }
    }
}

impl FitnessFormula {
    pub fn validate(&self) -> Result<(), String> {
        if let FitnessFormula::ScaledLengthTimesTicks { divisor } = self {
            if !divisor.is_finite() || *divisor <= 0.0 {
                return Err(format!("fitness divisor must be positive, got {divisor}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Position, Snake};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Three-segment snake that has survived four ticks
    fn played_game() -> Game {
        let snake = Snake::from_segments(
            vec![Position::new(3, 5), Position::new(2, 5), Position::new(1, 5)],
            Direction::Right,
        )
        .unwrap();
        let mut game = Game::with_layout(
            GameConfig::tiles(20, 20),
            snake,
            Position::new(15, 15),
            SmallRng::seed_from_u64(1),
        );
        for _ in 0..4 {
            game.tick();
        }
        game
    }

    #[test]
    fn test_formulas() {
        let game = played_game();
        assert_eq!(game.snake_len(), 3);
        assert_eq!(game.ticks_alive(), 4);

        assert_eq!(FitnessFormula::LengthSquaredTimesTicks.score(&game), 36.0);
        assert_eq!(FitnessFormula::LengthTimesTicks.score(&game), 12.0);
        assert_eq!(
            FitnessFormula::ScaledLengthTimesTicks { divisor: 4.0 }.score(&game),
            3.0
        );
    }

    #[test]
    fn test_closure_is_a_strategy() {
        let game = played_game();
        let by_length = |game: &Game| game.snake_len() as f64;
        assert_eq!(by_length.score(&game), 3.0);
    }

    #[test]
    fn test_divisor_validation() {
        assert!(FitnessFormula::default().validate().is_ok());
        assert!(
            FitnessFormula::ScaledLengthTimesTicks { divisor: 0.0 }
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_formula_serde_names() {
        let json = serde_json::to_string(&FitnessFormula::LengthTimesTicks).unwrap();
        assert_eq!(json, "\"length_times_ticks\"");
    }
}
