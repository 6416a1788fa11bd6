//! Grid Snake - a tick-driven Snake game engine
//!
//! This library provides:
//! - Core game logic (game module): board, snake, food placement and the
//!   state machine that advances a session one tick at a time
//! - Best-score persistence behind the `ScoreStore` trait (store module)
//! - TUI rendering and keyboard input (render, input modules)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod store;
