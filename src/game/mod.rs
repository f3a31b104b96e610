//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies:
//! the grid simulation, reward rules and the flood-fill trap detector used by the
//! observation encoder.

pub mod action;
pub mod config;
pub mod engine;
pub mod reachability;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, NUM_ACTIONS, RelativeAction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use reachability::is_trapped;
pub use state::{Bounds, DeathCause, GameState, Position, Snake};
