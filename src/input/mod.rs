pub mod handler;
pub mod playback;

pub use handler::{InputHandler, KeyAction};
pub use playback::PlaybackOptions;
