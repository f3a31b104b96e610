//! Snake DQN - online Q-learning for a grid snake agent
//!
//! This library provides:
//! - Core game logic and the flood-fill trap detector (game module)
//! - Observations, replay memory, approximators and checkpoints (rl module)
//! - Rolling training statistics (metrics module)
//! - The training loop (modes module)

pub mod error;
pub mod game;
pub mod metrics;
pub mod modes;
pub mod rl;

pub use error::SnakeError;
