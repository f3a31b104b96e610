//! Reinforcement learning side of the snake trainer
//!
//! Provides:
//! - 14-feature observations with flood-fill trap flags
//! - A seeded environment with the reset/step interface
//! - Experience replay memory
//! - The `QFunction` capability with a burn MLP and a lookup table
//! - The exploration policy and update schedule (`Agent`)
//! - Best-model checkpoints

pub mod agent;
pub mod approximator;
pub mod buffer;
pub mod config;
pub mod environment;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod tabular;
pub mod trainer;

pub use agent::{Agent, TrainingRunState, exploration_probability};
pub use approximator::{ActionValues, QFunction, argmax, q_targets};
pub use buffer::{ReplayMemory, Transition};
pub use config::TrainerConfig;
pub use environment::SnakeEnvironment;
pub use network::{InferenceBackend, QNetwork, QNetworkConfig, TrainingBackend, default_device};
pub use observation::{OBSERVATION_SIZE, Observation, create_observation};
pub use persistence::{
    Checkpoint, FileCheckpoint, ModelMetadata, NoCheckpoint, Persist, load_table, load_trainer,
};
pub use tabular::TabularQ;
pub use trainer::QTrainer;
