//! Q-learning agent: exploration policy, replay memory and the two update
//! schedules (one transition right away, a replay batch at episode end)

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::approximator::{QFunction, argmax};
use super::buffer::{ReplayMemory, Transition};
use super::config::TrainerConfig;
use super::observation::Observation;
use crate::error::SnakeError;
use crate::game::{NUM_ACTIONS, RelativeAction};

/// Chance of a random action, as `numerator / scale`
///
/// The numerator is `start - episode` floored at 1, so exploration decays
/// linearly and never reaches zero.
pub fn exploration_numerator(config: &TrainerConfig, episode: u32) -> u32 {
    config.exploration_start.saturating_sub(episode).max(1)
}

pub fn exploration_probability(config: &TrainerConfig, episode: u32) -> f64 {
    f64::from(exploration_numerator(config, episode)) / f64::from(config.exploration_scale)
}

pub struct Agent<Q> {
    model: Q,
    memory: ReplayMemory,
    rng: StdRng,
    config: TrainerConfig,
}

impl<Q: QFunction> Agent<Q> {
    pub fn new(model: Q, config: TrainerConfig, seed: u64) -> Result<Self, SnakeError> {
        config.validate().map_err(SnakeError::InvalidConfig)?;
        Ok(Self {
            model,
            memory: ReplayMemory::new(config.max_memory)?,
            rng: StdRng::seed_from_u64(seed),
            config,
        })
    }

    /// Pick an action for `observation` during episode `episode`
    ///
    /// Explores with probability [`exploration_probability`], otherwise takes
    /// the arg-max of the model's prediction.
    pub fn select_action(
        &mut self,
        observation: &Observation,
        episode: u32,
    ) -> Result<RelativeAction> {
        let numerator = exploration_numerator(&self.config, episode);
        if self.rng.gen_range(0..self.config.exploration_scale) < numerator {
            let idx = self.rng.gen_range(0..NUM_ACTIONS);
            return Ok(RelativeAction::from_index(idx)?);
        }

        let values = self.model.predict(observation)?;
        Ok(RelativeAction::from_index(argmax(&values))?)
    }

    /// Single-transition update, bypassing the replay memory
    pub fn train_short_memory(&mut self, transition: &Transition) -> Result<()> {
        self.model.update(std::slice::from_ref(transition))
    }

    pub fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// Replay update on up to `batch_size` remembered transitions
    ///
    /// Returns the number of transitions used.
    pub fn train_long_memory(&mut self) -> Result<usize> {
        let batch = self.memory.sample(self.config.batch_size, &mut self.rng);
        if batch.is_empty() {
            return Ok(0);
        }
        self.model.update(&batch)?;
        Ok(batch.len())
    }

    pub fn model(&self) -> &Q {
        &self.model
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn into_model(self) -> Q {
        self.model
    }
}

/// Counters for one training run
///
/// Created when the run starts, updated once per finished episode and
/// dropped with the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingRunState {
    /// Finished episodes; also the index of the episode in progress
    pub episode: u32,
    pub total_score: u64,
    pub best_score: u32,
}

impl TrainingRunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished episode; true when its score beats the record
    pub fn record_episode(&mut self, score: u32) -> bool {
        self.episode += 1;
        self.total_score += u64::from(score);
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Average score over all finished episodes
    pub fn mean_score(&self) -> f64 {
        if self.episode == 0 {
            0.0
        } else {
            self.total_score as f64 / f64::from(self.episode)
        }
    }
}
