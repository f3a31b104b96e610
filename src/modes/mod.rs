pub mod train;

pub use train::{EpisodeEvent, EpisodeReporter, LogReporter, TrainConfig, TrainMode};
