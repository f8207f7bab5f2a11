//! Read-only terminal views of game state

pub mod renderer;

pub use renderer::{Cell, PlaybackStatus, Renderer, cell_at};
