//! Sensor vector fed to a snake's network.
//!
//! Layout, in order:
//! - food flags: up, down, right, left (each `100.0` or `0.0`)
//! - inverse hazard distance: left, up, right, down (scaled by `200.0`)

use ndarray::Array1;

use crate::game::{Direction, Game};

/// Number of values produced by [`sense`]
pub const SENSOR_WIDTH: usize = 8;

const FOOD_SIGNAL: f64 = 100.0;
const HAZARD_SIGNAL: f64 = 200.0;

const FOOD_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Right,
    Direction::Left,
];

const HAZARD_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Up,
    Direction::Right,
    Direction::Down,
];

/// `1 / value`, except that zero is passed through unchanged
pub fn inverse_or_raw(value: f64) -> f64 {
    if value == 0.0 { value } else { 1.0 / value }
}

/// Whether the food lies strictly on the `direction` side of the head.
///
/// Flags are independent: food up and to the left sets both.
pub fn food_lies(game: &Game, direction: Direction) -> bool {
    let head = game.snake().head();
    let food = game.food();
    match direction {
        Direction::Up => food.y < head.y,
        Direction::Down => food.y > head.y,
        Direction::Left => food.x < head.x,
        Direction::Right => food.x > head.x,
    }
}

/// Build the sensor vector for the current game state
pub fn sense(game: &Game) -> Array1<f64> {
    let food = FOOD_ORDER
        .iter()
        .map(|&direction| if food_lies(game, direction) { FOOD_SIGNAL } else { 0.0 });

    let hazards = HAZARD_ORDER.iter().map(|&direction| {
        HAZARD_SIGNAL * inverse_or_raw(f64::from(game.distance_to_hazard(direction)))
    });

    food.chain(hazards).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Position, Snake};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn game_at(head: Position, food: Position) -> Game {
        Game::with_layout(
            GameConfig::tiles(10, 10),
            Snake::new(head, Direction::Right),
            food,
            SmallRng::seed_from_u64(0),
        )
    }

    #[test]
    fn test_inverse_or_raw() {
        assert_eq!(inverse_or_raw(4.0), 0.25);
        assert_eq!(inverse_or_raw(0.0), 0.0);
        assert!(inverse_or_raw(0.0).is_finite());
    }

    #[test]
    fn test_food_flags_are_independent() {
        let game = game_at(Position::new(5, 5), Position::new(2, 1));
        let sensors = sense(&game);

        assert_eq!(sensors.len(), SENSOR_WIDTH);
        assert_eq!(sensors.as_slice().unwrap()[..4], [100.0, 0.0, 0.0, 100.0]);
    }

    #[test]
    fn test_food_in_line_sets_one_flag() {
        let game = game_at(Position::new(5, 5), Position::new(8, 5));
        assert_eq!(sense(&game).as_slice().unwrap()[..4], [0.0, 0.0, 100.0, 0.0]);
    }

    #[test]
    fn test_hazard_signals_grow_as_walls_close_in() {
        // Head in the top-left corner: left and up walls are adjacent
        let game = game_at(Position::new(0, 0), Position::new(5, 5));
        let sensors = sense(&game);

        assert_eq!(sensors[4], 200.0);
        assert_eq!(sensors[5], 200.0);
        assert_eq!(sensors[6], 200.0 / 10.0);
        assert_eq!(sensors[7], 200.0 / 10.0);
    }
}
