use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{Food, Position, Snake},
};

/// Why a snake died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Head left the board
    Wall,
    /// Head ran into the body
    SelfCollision,
    /// Went more than `life_time` ticks without eating
    Starvation,
    /// No free cell left to place food on
    BoardFull,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Set on the tick the snake died
    pub death: Option<DeathCause>,
    /// Whether the game is over after this tick
    pub terminated: bool,
}

impl TickOutcome {
    fn moved(ate_food: bool) -> Self {
        Self {
            ate_food,
            death: None,
            terminated: false,
        }
    }

    fn died(cause: DeathCause) -> Self {
        Self {
            ate_food: false,
            death: Some(cause),
            terminated: true,
        }
    }

    fn already_over() -> Self {
        Self {
            ate_food: false,
            death: None,
            terminated: true,
        }
    }
}

/// One snake, one piece of food and the rules that move them
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    snake: Snake,
    food: Food,
    rng: SmallRng,
    ticks_since_eaten: u32,
    ticks_alive: u32,
    death: Option<DeathCause>,
}

impl Game {
    /// Create a game with a centred snake and randomly placed food
    pub fn new(config: GameConfig, rng: SmallRng) -> Self {
        let snake = Snake::new(Self::centre(&config), Direction::Right);
        let food = Food::new(snake.head());
        let mut game = Self {
            config,
            snake,
            food,
            rng,
            ticks_since_eaten: 0,
            ticks_alive: 0,
            death: None,
        };
        game.reset();
        game
    }

    /// Create a game whose food placement is seeded from `seed`
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(config, SmallRng::seed_from_u64(seed))
    }

    /// Create a game with an explicit snake and food layout
    pub fn with_layout(config: GameConfig, snake: Snake, food: Position, rng: SmallRng) -> Self {
        Self {
            config,
            snake,
            food: Food::new(food),
            rng,
            ticks_since_eaten: 0,
            ticks_alive: 0,
            death: None,
        }
    }

    /// Copy of this game reset to a fresh start, with food drawn from a new seed
    pub fn fresh_copy<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self::new(self.config.clone(), SmallRng::seed_from_u64(rng.r#gen()))
    }

    /// Reinitialise the snake at the board centre and re-roll the food
    pub fn reset(&mut self) {
        let colour = self.snake.colour;
        self.snake = Snake::new(Self::centre(&self.config), Direction::Right);
        self.snake.colour = colour;
        self.ticks_since_eaten = 0;
        self.ticks_alive = 0;
        self.death = None;

        match random_free_cell(&self.config, &self.snake, &mut self.rng) {
            Some(pos) => self.food = Food::new(pos),
            None => self.kill(DeathCause::BoardFull),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food.position
    }

    pub fn is_alive(&self) -> bool {
        self.snake.alive
    }

    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    pub fn ticks_since_eaten(&self) -> u32 {
        self.ticks_since_eaten
    }

    /// Ticks survived since the last reset
    pub fn ticks_alive(&self) -> u32 {
        self.ticks_alive
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    /// Request a heading change for the next tick. Reversals are ignored.
    pub fn change_heading(&mut self, direction: Direction) -> bool {
        self.snake.change_heading(direction)
    }

    /// Display colour for the snake; has no effect on the simulation
    pub fn set_colour(&mut self, colour: [u8; 3]) {
        self.snake.colour = colour;
    }

    /// Submit an action and advance one tick
    pub fn step(&mut self, action: Action) -> TickOutcome {
        if let Action::Move(direction) = action {
            self.change_heading(direction);
        }
        self.tick()
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> TickOutcome {
        if !self.snake.alive {
            return TickOutcome::already_over();
        }

        if self.ticks_since_eaten > self.config.life_time {
            self.kill(DeathCause::Starvation);
            return TickOutcome::died(DeathCause::Starvation);
        }

        let candidate = self
            .snake
            .head()
            .shifted(self.snake.heading, self.config.tile_size);

        if let Some(cause) = self.check_collision(candidate) {
            self.kill(cause);
            return TickOutcome::died(cause);
        }

        self.snake.advance(candidate);
        self.ticks_alive += 1;

        if candidate != self.food.position {
            self.ticks_since_eaten += 1;
            return TickOutcome::moved(false);
        }

        self.snake.grow();
        self.ticks_since_eaten = 0;

        match random_free_cell(&self.config, &self.snake, &mut self.rng) {
            Some(pos) => {
                self.food = Food::new(pos);
                TickOutcome::moved(true)
            }
            None => {
                debug!(length = self.snake.len(), "no free cell left for food");
                self.kill(DeathCause::BoardFull);
                TickOutcome {
                    ate_food: true,
                    death: Some(DeathCause::BoardFull),
                    terminated: true,
                }
            }
        }
    }

    /// Tiles from the head to the nearest wall or body segment in `direction`.
    ///
    /// An adjacent hazard is at distance 1.
    pub fn distance_to_hazard(&self, direction: Direction) -> u32 {
        let tile = self.config.tile_size;
        let mut probe = self.snake.head();
        let mut distance = 0;

        loop {
            probe = probe.shifted(direction, tile);
            distance += 1;

            let off_board = !probe.is_within(self.config.board_width, self.config.board_height, tile);
            if off_board || self.snake.body_segments().contains(&probe) {
                return distance;
            }
        }
    }

    fn check_collision(&self, candidate: Position) -> Option<DeathCause> {
        if !candidate.is_within(
            self.config.board_width,
            self.config.board_height,
            self.config.tile_size,
        ) {
            return Some(DeathCause::Wall);
        }

        if self.snake.collides_on_move(candidate) {
            return Some(DeathCause::SelfCollision);
        }

        None
    }

    fn kill(&mut self, cause: DeathCause) {
        self.snake.die();
        self.death = Some(cause);
    }

    fn centre(config: &GameConfig) -> Position {
        Position::new(
            config.columns() / 2 * config.tile_size,
            config.rows() / 2 * config.tile_size,
        )
    }
}

/// Pick a uniformly random tile not covered by the snake
fn random_free_cell<R: Rng + ?Sized>(
    config: &GameConfig,
    snake: &Snake,
    rng: &mut R,
) -> Option<Position> {
    let tile = config.tile_size;
    let free: Vec<Position> = (0..config.rows())
        .flat_map(|row| (0..config.columns()).map(move |col| Position::new(col * tile, row * tile)))
        .filter(|pos| !snake.occupies(*pos))
        .collect();

    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(config: GameConfig, head: Position, heading: Direction, food: Position) -> Game {
        Game::with_layout(
            config,
            Snake::new(head, heading),
            food,
            SmallRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_reset() {
        let game = Game::seeded(GameConfig::default(), 1);

        assert!(game.is_alive());
        assert_eq!(game.snake_len(), 1);
        assert_eq!(game.snake().head(), Position::new(200, 200));
        assert_eq!(game.ticks_since_eaten(), 0);
        assert_ne!(game.food(), game.snake().head());
        assert_eq!(game.food().x % 10, 0);
        assert_eq!(game.food().y % 10, 0);
    }

    #[test]
    fn test_reset_after_death() {
        let mut game = layout(
            GameConfig::new(100, 100, 10),
            Position::new(0, 0),
            Direction::Up,
            Position::new(50, 50),
        );
        game.tick();
        assert!(!game.is_alive());

        game.reset();
        assert!(game.is_alive());
        assert_eq!(game.death(), None);
        assert_eq!(game.snake().head(), Position::new(50, 50));
        assert_eq!(game.snake().heading, Direction::Right);
        assert_ne!(game.food(), game.snake().head());
    }

    #[test]
    fn test_eats_food_after_five_ticks() {
        let mut config = GameConfig::tiles(40, 40);
        config.life_time = 200;
        let mut game = layout(config, Position::new(20, 20), Direction::Right, Position::new(25, 20));

        for _ in 0..4 {
            let outcome = game.tick();
            assert!(!outcome.ate_food);
        }
        assert_eq!(game.ticks_since_eaten(), 4);

        let outcome = game.tick();
        assert!(outcome.ate_food);
        assert_eq!(game.snake().head(), Position::new(25, 20));
        assert_eq!(game.ticks_since_eaten(), 0);
        assert_eq!(game.snake_len(), 1);
        assert!(!game.snake().occupies(game.food()));

        game.tick();
        assert_eq!(game.snake_len(), 2);
    }

    #[test]
    fn test_wall_collision_freezes_snake() {
        let mut game = layout(
            GameConfig::new(100, 100, 10),
            Position::new(0, 0),
            Direction::Up,
            Position::new(50, 50),
        );

        let outcome = game.tick();

        assert!(outcome.terminated);
        assert_eq!(outcome.death, Some(DeathCause::Wall));
        assert!(!game.is_alive());
        assert_eq!(game.snake().head(), Position::new(0, 0));
    }

    #[test]
    fn test_right_and_bottom_walls() {
        let mut game = layout(
            GameConfig::new(100, 100, 10),
            Position::new(90, 40),
            Direction::Right,
            Position::new(0, 0),
        );
        assert_eq!(game.tick().death, Some(DeathCause::Wall));
        assert_eq!(game.snake().head(), Position::new(90, 40));

        let mut game = layout(
            GameConfig::new(100, 100, 10),
            Position::new(40, 80),
            Direction::Down,
            Position::new(0, 0),
        );
        assert!(!game.tick().terminated);
        assert_eq!(game.snake().head(), Position::new(40, 90));
        assert_eq!(game.tick().death, Some(DeathCause::Wall));
    }

    #[test]
    fn test_self_collision() {
        let snake = Snake::from_segments(
            vec![
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(3, 5),
                Position::new(2, 5),
                Position::new(1, 5),
            ],
            Direction::Right,
        )
        .unwrap();
        let mut game = Game::with_layout(
            GameConfig::small(),
            snake,
            Position::new(8, 8),
            SmallRng::seed_from_u64(3),
        );

        game.step(Action::Move(Direction::Down));
        game.step(Action::Move(Direction::Left));
        let outcome = game.step(Action::Move(Direction::Up));

        assert!(outcome.terminated);
        assert_eq!(outcome.death, Some(DeathCause::SelfCollision));
        assert_eq!(game.snake().head(), Position::new(4, 6));
    }

    #[test]
    fn test_starvation() {
        let mut config = GameConfig::tiles(40, 40);
        config.life_time = 3;
        let mut game = layout(config, Position::new(0, 20), Direction::Right, Position::new(0, 0));

        for _ in 0..4 {
            assert!(!game.tick().terminated);
        }
        assert_eq!(game.ticks_since_eaten(), 4);

        let head = game.snake().head();
        let outcome = game.tick();
        assert_eq!(outcome.death, Some(DeathCause::Starvation));
        assert_eq!(game.snake().head(), head);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut game = layout(
            GameConfig::small(),
            Position::new(5, 5),
            Direction::Right,
            Position::new(0, 0),
        );

        game.step(Action::Move(Direction::Left));

        assert_eq!(game.snake().heading, Direction::Right);
        assert_eq!(game.snake().head(), Position::new(6, 5));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut game = layout(
            GameConfig::small(),
            Position::new(0, 0),
            Direction::Left,
            Position::new(5, 5),
        );
        game.tick();
        let ticks = game.ticks_alive();

        let outcome = game.tick();

        assert!(outcome.terminated);
        assert_eq!(outcome.death, None);
        assert_eq!(game.ticks_alive(), ticks);
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut game = Game::seeded(GameConfig::tiles(6, 6), 99);

        // Sweep the board row by row, steering toward food is unnecessary:
        // place food ahead of the head before every tick.
        for _ in 0..30 {
            if !game.is_alive() {
                break;
            }
            let ahead = game.snake().head().shifted(game.snake().heading, 1);
            if !ahead.is_within(6, 6, 1) || game.snake().occupies(ahead) {
                break;
            }
            game.food = Food::new(ahead);
            let outcome = game.tick();
            if outcome.ate_food && game.is_alive() {
                assert!(!game.snake().occupies(game.food()));
            }
        }
    }

    #[test]
    fn test_board_full_ends_game() {
        let snake = Snake::from_segments(
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)],
            Direction::Down,
        )
        .unwrap();
        let mut game = Game::with_layout(
            GameConfig::tiles(2, 2),
            snake,
            Position::new(0, 1),
            SmallRng::seed_from_u64(11),
        );
        game.snake.grow();

        let outcome = game.tick();

        assert!(outcome.ate_food);
        assert_eq!(outcome.death, Some(DeathCause::BoardFull));
        assert!(!game.is_alive());
    }

    #[test]
    fn test_distance_to_hazard() {
        let game = layout(
            GameConfig::tiles(10, 10),
            Position::new(2, 5),
            Direction::Right,
            Position::new(9, 9),
        );

        assert_eq!(game.distance_to_hazard(Direction::Left), 3);
        assert_eq!(game.distance_to_hazard(Direction::Right), 8);
        assert_eq!(game.distance_to_hazard(Direction::Up), 6);
        assert_eq!(game.distance_to_hazard(Direction::Down), 5);

        let snake = Snake::from_segments(
            vec![Position::new(5, 5), Position::new(5, 6), Position::new(5, 7)],
            Direction::Up,
        )
        .unwrap();
        let game = Game::with_layout(
            GameConfig::tiles(10, 10),
            snake,
            Position::new(0, 0),
            SmallRng::seed_from_u64(0),
        );
        assert_eq!(game.distance_to_hazard(Direction::Down), 1);
    }

    #[test]
    fn test_fresh_copy_is_reset() {
        let mut game = Game::seeded(GameConfig::small(), 5);
        game.tick();
        game.tick();

        let mut rng = SmallRng::seed_from_u64(8);
        let copy = game.fresh_copy(&mut rng);

        assert!(copy.is_alive());
        assert_eq!(copy.ticks_alive(), 0);
        assert_eq!(copy.snake_len(), 1);
        assert_eq!(copy.config(), game.config());
    }
}
