//! A game paired with the network that plays it.

pub mod error;
pub mod policy;
pub mod sensors;

use ndarray::Array1;
use rand::Rng;

use crate::evolution::fitness::Fitness;
use crate::game::{Action, Direction, Game, GameConfig, TickOutcome};
use crate::neural::NeuralNet;

pub use error::AgentError;
pub use policy::Policy;
pub use sensors::{SENSOR_WIDTH, inverse_or_raw, sense};

/// Number of actions the network chooses between
pub const ACTION_WIDTH: usize = Direction::ACTION_ORDER.len();

/// One population member: owns its game and its network outright
#[derive(Debug, Clone)]
pub struct Agent {
    game: Game,
    net: NeuralNet,
}

impl Agent {
    /// Pair a game with a network, rejecting networks of the wrong width
    pub fn new(game: Game, net: NeuralNet) -> Result<Self, AgentError> {
        check_widths(&net)?;
        Ok(Self { game, net })
    }

    /// Fresh game with a Gaussian-initialised network
    pub fn random<R: Rng + ?Sized>(
        config: &GameConfig,
        hidden: &[usize],
        mean: f64,
        std: f64,
        rng: &mut R,
    ) -> Result<Self, AgentError> {
        let net = NeuralNet::random(SENSOR_WIDTH, hidden, ACTION_WIDTH, mean, std, rng)?;
        let game = Game::seeded(config.clone(), rng.r#gen());
        Self::new(game, net)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn net(&self) -> &NeuralNet {
        &self.net
    }

    pub fn into_net(self) -> NeuralNet {
        self.net
    }

    pub fn is_alive(&self) -> bool {
        self.game.is_alive()
    }

    pub fn set_colour(&mut self, colour: [u8; 3]) {
        self.game.set_colour(colour);
    }

    pub fn sensors(&self) -> Array1<f64> {
        sense(&self.game)
    }

    /// The action the network wants for the current state
    pub fn decide(&self) -> Action {
        self.net.decide(&self.sensors())
    }

    /// Submit the network's chosen heading, then advance one tick
    pub fn update(&mut self) -> TickOutcome {
        let action = self.decide();
        self.game.step(action)
    }

    /// Tick until the snake dies, returning the number of ticks taken
    pub fn play_out(&mut self) -> u32 {
        let mut ticks = 0;
        while self.is_alive() {
            self.update();
            ticks += 1;
        }
        ticks
    }

    pub fn score<F: Fitness + ?Sized>(&self, fitness: &F) -> f64 {
        fitness.score(&self.game)
    }

    /// Same network, new independent game from a fresh start
    pub fn fresh_copy<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            game: self.game.fresh_copy(rng),
            net: self.net.clone(),
        }
    }

    /// Fresh copy with Gaussian noise added and weights clipped to `[-cap, cap]`
    pub fn mutated_copy<R: Rng + ?Sized>(
        &self,
        mean: f64,
        std: f64,
        cap: f64,
        rng: &mut R,
    ) -> Result<Self, AgentError> {
        let mut child = self.fresh_copy(rng);
        child.net.mutate_with_normal(mean, std, rng)?;
        child.net.cap(-cap, cap)?;
        Ok(child)
    }

    /// Uniform crossover of the two networks; both children start fresh games
    pub fn cross_over_uniform<R: Rng + ?Sized>(
        &self,
        other: &Agent,
        probability: f64,
        rng: &mut R,
    ) -> Result<(Agent, Agent), AgentError> {
        let (first, second) = self.net.cross_over_uniform(&other.net, probability, rng)?;
        Ok((
            Agent {
                game: self.game.fresh_copy(rng),
                net: first,
            },
            Agent {
                game: other.game.fresh_copy(rng),
                net: second,
            },
        ))
    }
}

fn check_widths(net: &NeuralNet) -> Result<(), AgentError> {
    if Policy::input_width(net) != SENSOR_WIDTH {
        return Err(AgentError::SensorWidthMismatch {
            expected: SENSOR_WIDTH,
            actual: Policy::input_width(net),
        });
    }
    if Policy::output_width(net) != ACTION_WIDTH {
        return Err(AgentError::ActionWidthMismatch {
            expected: ACTION_WIDTH,
            actual: Policy::output_width(net),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::fitness::FitnessFormula;
    use crate::game::{Position, Snake};
    use crate::neural::Layer;
    use ndarray::Array2;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Network that always prefers `direction`
    fn constant_net(direction: Direction) -> NeuralNet {
        let mut bias = Array1::zeros(ACTION_WIDTH);
        bias[direction.action_index()] = 1.0;
        NeuralNet::from_layers(vec![
            Layer::weights(Array2::zeros((SENSOR_WIDTH, ACTION_WIDTH))),
            Layer::bias(bias),
        ])
        .unwrap()
    }

    #[test]
    fn test_width_checked_at_construction() {
        let mut rng = SmallRng::seed_from_u64(1);
        let game = Game::seeded(GameConfig::small(), 1);

        let narrow = NeuralNet::random(6, &[4], 4, 0.0, 1.0, &mut rng).unwrap();
        assert_eq!(
            Agent::new(game.clone(), narrow).unwrap_err(),
            AgentError::SensorWidthMismatch {
                expected: 8,
                actual: 6
            }
        );

        let wide = NeuralNet::random(8, &[4], 5, 0.0, 1.0, &mut rng).unwrap();
        assert!(matches!(
            Agent::new(game, wide),
            Err(AgentError::ActionWidthMismatch { actual: 5, .. })
        ));
    }

    #[test]
    fn test_update_applies_network_heading() {
        let game = Game::with_layout(
            GameConfig::tiles(10, 10),
            Snake::new(Position::new(5, 5), Direction::Right),
            Position::new(0, 0),
            SmallRng::seed_from_u64(2),
        );
        let mut agent = Agent::new(game, constant_net(Direction::Up)).unwrap();

        agent.update();
        assert_eq!(agent.game().snake().head(), Position::new(5, 4));
        assert_eq!(agent.game().snake().heading, Direction::Up);
    }

    #[test]
    fn test_play_out_ends_at_wall() {
        let game = Game::with_layout(
            GameConfig::tiles(10, 10),
            Snake::new(Position::new(5, 5), Direction::Right),
            Position::new(0, 9),
            SmallRng::seed_from_u64(3),
        );
        let mut agent = Agent::new(game, constant_net(Direction::Right)).unwrap();

        // Four moves reach x = 9, the fifth hits the wall
        assert_eq!(agent.play_out(), 5);
        assert_eq!(agent.game().ticks_alive(), 4);
        assert_eq!(agent.score(&FitnessFormula::LengthTimesTicks), 4.0);
    }

    #[test]
    fn test_random_agent_always_terminates() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut agent = Agent::random(&GameConfig::small(), &[16], 0.0, 0.04, &mut rng).unwrap();

        agent.play_out();
        assert!(!agent.is_alive());
    }

    #[test]
    fn test_mutated_copy_is_independent() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut parent = Agent::random(&GameConfig::small(), &[8], 0.0, 0.5, &mut rng).unwrap();
        parent.play_out();
        let before = parent.net().clone();

        let child = parent.mutated_copy(0.0, 0.1, 1.0, &mut rng).unwrap();

        assert_eq!(parent.net(), &before);
        assert_ne!(child.net(), &before);
        assert!(child.is_alive());
        assert_eq!(child.game().ticks_alive(), 0);
        assert!(
            child
                .net()
                .layers()
                .iter()
                .flat_map(|layer| layer.array().iter())
                .all(|v| v.abs() <= 1.0)
        );
    }

    #[test]
    fn test_crossover_children_start_fresh() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut a = Agent::random(&GameConfig::small(), &[8], 0.0, 0.5, &mut rng).unwrap();
        let b = Agent::random(&GameConfig::small(), &[8], 0.0, 0.5, &mut rng).unwrap();
        a.play_out();

        let (c, d) = a.cross_over_uniform(&b, 1.0, &mut rng).unwrap();
        assert_eq!(c.net(), b.net());
        assert_eq!(d.net(), a.net());
        assert!(c.is_alive() && d.is_alive());
    }
}
