use ndarray::Array1;

use crate::game::{Action, Direction};
use crate::neural::NeuralNet;

/// Anything that turns a sensor vector into an action index
pub trait Policy {
    fn input_width(&self) -> usize;

    fn output_width(&self) -> usize;

    /// Index into [`Direction::ACTION_ORDER`]
    fn act(&self, sensors: &Array1<f64>) -> usize;

    /// Map the chosen index to a game action; out-of-range indices keep the heading
    fn decide(&self, sensors: &Array1<f64>) -> Action {
        Direction::from_action_index(self.act(sensors))
            .map(Action::Move)
            .unwrap_or(Action::Continue)
    }
}

impl Policy for NeuralNet {
    fn input_width(&self) -> usize {
        NeuralNet::input_width(self)
    }

    fn output_width(&self) -> usize {
        NeuralNet::output_width(self)
    }

    fn act(&self, sensors: &Array1<f64>) -> usize {
        self.best_output(sensors)
    }
}
