//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Front-ends feed it [`GameCommand`]s, call [`GameEngine::step`] on every tick and
//! draw the [`GameSnapshot`] it hands back.

pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{CommandOutcome, Direction, GameCommand};
pub use board::{Board, Position};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use food::FoodSpawner;
pub use state::{CollisionType, GameOverReason, GameSnapshot, GameState, GameStatus, Snake};
