//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Both interactive play and headless fitness evaluation drive the same [`Game`].

pub mod action;
pub mod config;
pub mod engine;
pub mod pacer;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{DeathCause, Game, TickOutcome};
pub use pacer::TickPacer;
pub use state::{Food, Position, Snake};
