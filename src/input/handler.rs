use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    Restart,
    TogglePause,
    ToggleSlow,
    ToggleShowBest,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Keys for human play: arrows or WASD steer
    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if Self::is_ctrl_c(&key) {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::GameAction(Action::Move(Direction::Up)),
            KeyCode::Down => KeyAction::GameAction(Action::Move(Direction::Down)),
            KeyCode::Left => KeyAction::GameAction(Action::Move(Direction::Left)),
            KeyCode::Right => KeyAction::GameAction(Action::Move(Direction::Right)),

            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::GameAction(Action::Move(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::GameAction(Action::Move(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::GameAction(Action::Move(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::GameAction(Action::Move(Direction::Right))
            }

            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }

    /// Keys for watching evolved agents: Space pauses, S slows down, B shows only the best
    pub fn handle_playback_key(&self, key: KeyEvent) -> KeyAction {
        if Self::is_ctrl_c(&key) {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::ToggleSlow,
            KeyCode::Char('b') | KeyCode::Char('B') => KeyAction::ToggleShowBest,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }

    fn is_ctrl_c(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Up)),
            KeyAction::GameAction(Action::Move(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Down)),
            KeyAction::GameAction(Action::Move(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Left)),
            KeyAction::GameAction(Action::Move(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Right)),
            KeyAction::GameAction(Action::Move(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('w'))),
            KeyAction::GameAction(Action::Move(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('s'))),
            KeyAction::GameAction(Action::Move(Direction::Down))
        );

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::GameAction(Action::Move(Direction::Up))
        );
    }

    #[test]
    fn test_play_controls() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(key(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('r'))),
            KeyAction::Restart
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char(' '))),
            KeyAction::TogglePause
        );
        assert_eq!(
            handler.handle_key_event(key(KeyCode::Char('x'))),
            KeyAction::None
        );
    }

    #[test]
    fn test_playback_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_playback_key(key(KeyCode::Char(' '))),
            KeyAction::TogglePause
        );
        assert_eq!(
            handler.handle_playback_key(key(KeyCode::Char('s'))),
            KeyAction::ToggleSlow
        );
        assert_eq!(
            handler.handle_playback_key(key(KeyCode::Char('B'))),
            KeyAction::ToggleShowBest
        );
        assert_eq!(
            handler.handle_playback_key(key(KeyCode::Up)),
            KeyAction::None
        );
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
        assert_eq!(handler.handle_playback_key(ctrl_c), KeyAction::Quit);
    }
}
