//! Evo Snake - neural snake controllers evolved by a genetic algorithm
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - Feed-forward networks and their genetic operators (neural module)
//! - Agents pairing a game with a network (agent module)
//! - The generational loop, fitness strategies and persistence (evolution module)
//! - TUI rendering, input and the human/train/watch modes

pub mod agent;
pub mod evolution;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod neural;
pub mod render;
