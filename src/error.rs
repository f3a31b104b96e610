//! Contract violations raised by the simulation and the replay memory.
//!
//! These are programming errors on the caller's side. They abort the
//! operation instead of coercing the input into something valid.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnakeError {
    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("episode is over; reset the environment before stepping again")]
    EpisodeOver,

    #[error("requested {requested} transitions but only {available} are stored")]
    SampleTooLarge { requested: usize, available: usize },

    #[error("replay memory capacity must be at least 1")]
    ZeroCapacity,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
