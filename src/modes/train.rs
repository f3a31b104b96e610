//! Online Q-learning training loop
//!
//! Each call to [`TrainMode::train_step`] plays one environment step:
//! encode, act, step, encode again, update on the single transition and
//! remember it. When the step ends the episode, the environment is reset,
//! a replay batch is trained on, the run counters advance, the checkpoint
//! collaborator sees any new record and an [`EpisodeEvent`] is emitted.
//!
//! # Example
//!
//! ```rust,no_run
//! use snake_dqn::modes::{LogReporter, TrainConfig, TrainMode};
//! use snake_dqn::rl::{NoCheckpoint, TabularQ};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = TrainConfig {
//!     num_episodes: Some(100),
//!     ..Default::default()
//! };
//! let model = TabularQ::new(&config.trainer_config);
//! let reporter = LogReporter::new(config.log_frequency, config.stats_window);
//!
//! let mut train_mode = TrainMode::new(config, model, NoCheckpoint, reporter)?;
//! let run = train_mode.run()?;
//! println!("best score {}", run.best_score);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{
    Agent, Checkpoint, QFunction, SnakeEnvironment, TrainerConfig, TrainingRunState, Transition,
    exploration_probability,
};

/// Configuration for training mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Stop after this many episodes; `None` trains until interrupted
    pub num_episodes: Option<usize>,

    /// Directory receiving the best-model checkpoint
    pub save_dir: PathBuf,

    /// Seeds the food placement and the agent's exploration
    pub seed: u64,

    /// Log a rolling summary every N episodes
    pub log_frequency: usize,

    /// Episodes in the rolling statistics window
    pub stats_window: usize,

    pub game_config: GameConfig,

    pub trainer_config: TrainerConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_episodes: None,
            save_dir: PathBuf::from("model"),
            seed: 0,
            log_frequency: 100,
            stats_window: 100,
            game_config: GameConfig::default(),
            trainer_config: TrainerConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.log_frequency == 0 {
            return Err("log_frequency must be at least 1".to_string());
        }
        self.game_config.validate()?;
        self.trainer_config.validate()
    }
}

/// Emitted once per finished episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeEvent {
    /// 1-based index of the finished episode
    pub episode: u32,
    pub score: u32,
    pub best_score: u32,
    /// Cumulative mean over all finished episodes
    pub mean_score: f64,
    pub new_record: bool,
    pub steps: u32,
    pub total_reward: f32,
    /// Transitions in the end-of-episode replay update
    pub replay_batch: usize,
}

/// Consumer of episode events (logging, plotting, ...)
pub trait EpisodeReporter {
    fn report(&mut self, event: &EpisodeEvent);
}

/// Logs every episode through `tracing` and a rolling summary every
/// `log_frequency` episodes
#[derive(Debug, Clone)]
pub struct LogReporter {
    stats: TrainingStats,
    log_frequency: usize,
}

impl LogReporter {
    pub fn new(log_frequency: usize, stats_window: usize) -> Self {
        Self {
            stats: TrainingStats::new(stats_window),
            log_frequency: log_frequency.max(1),
        }
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }
}

impl EpisodeReporter for LogReporter {
    fn report(&mut self, event: &EpisodeEvent) {
        self.stats
            .record_episode(event.total_reward, event.steps as usize, event.score);
        self.stats.record_replay(event.replay_batch);

        info!(
            episode = event.episode,
            score = event.score,
            record = event.best_score,
            mean_score = event.mean_score,
            "Episode finished"
        );
        if event.new_record {
            info!(episode = event.episode, score = event.score, "New record");
        }
        if event.episode as usize % self.log_frequency == 0 {
            info!("[Episode {}] {}", event.episode, self.stats.format_summary());
        }
    }
}

impl EpisodeReporter for Vec<EpisodeEvent> {
    fn report(&mut self, event: &EpisodeEvent) {
        self.push(event.clone());
    }
}

/// Single-threaded trainer driving one environment and one approximator
pub struct TrainMode<Q> {
    agent: Agent<Q>,
    env: SnakeEnvironment,
    run: TrainingRunState,
    config: TrainConfig,
    checkpoint: Box<dyn Checkpoint<Q>>,
    reporter: Box<dyn EpisodeReporter>,
    episode_reward: f32,
}

impl<Q: QFunction> TrainMode<Q> {
    pub fn new(
        config: TrainConfig,
        model: Q,
        checkpoint: impl Checkpoint<Q> + 'static,
        reporter: impl EpisodeReporter + 'static,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid training config: {e}"))?;

        let env = SnakeEnvironment::new(config.game_config.clone(), config.seed)?;
        let agent = Agent::new(
            model,
            config.trainer_config.clone(),
            config.seed.wrapping_add(1),
        )?;

        Ok(Self {
            agent,
            env,
            run: TrainingRunState::new(),
            config,
            checkpoint: Box::new(checkpoint),
            reporter: Box::new(reporter),
            episode_reward: 0.0,
        })
    }

    /// Train until `num_episodes` episodes have finished, or forever when
    /// unbounded; returns the final run counters
    pub fn run(&mut self) -> Result<TrainingRunState> {
        self.print_header();

        while !self.is_finished() {
            self.train_step()?;
        }

        info!(
            episodes = self.run.episode,
            record = self.run.best_score,
            mean_score = self.run.mean_score(),
            "Training complete"
        );
        Ok(self.run.clone())
    }

    /// Play one step; returns the event when the step ended an episode
    pub fn train_step(&mut self) -> Result<Option<EpisodeEvent>> {
        let observation = self.env.observation();
        let action = self.agent.select_action(&observation, self.run.episode)?;

        let result = self.env.step(action)?;
        let next_observation = self.env.observation();

        let transition = Transition {
            observation,
            action,
            reward: result.reward,
            next_observation,
            terminal: result.terminated,
        };
        self.agent.train_short_memory(&transition)?;
        self.agent.remember(transition);
        self.episode_reward += result.reward;

        debug!(
            episode = self.run.episode,
            step = self.env.state().steps,
            ?action,
            reward = result.reward,
            score = result.score,
            death = ?result.info.death_cause,
            "step"
        );

        if !result.terminated {
            return Ok(None);
        }

        let steps = self.env.state().steps;
        self.env.reset();

        let replay_batch = self.agent.train_long_memory()?;
        let new_record = self.run.record_episode(result.score);
        if new_record {
            self.checkpoint.save_best(self.agent.model(), &self.run)?;
        }

        let event = EpisodeEvent {
            episode: self.run.episode,
            score: result.score,
            best_score: self.run.best_score,
            mean_score: self.run.mean_score(),
            new_record,
            steps,
            total_reward: self.episode_reward,
            replay_batch,
        };
        self.episode_reward = 0.0;
        self.reporter.report(&event);

        Ok(Some(event))
    }

    pub fn is_finished(&self) -> bool {
        self.config
            .num_episodes
            .is_some_and(|limit| self.run.episode as usize >= limit)
    }

    pub fn run_state(&self) -> &TrainingRunState {
        &self.run
    }

    pub fn agent(&self) -> &Agent<Q> {
        &self.agent
    }

    pub fn environment(&self) -> &SnakeEnvironment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut SnakeEnvironment {
        &mut self.env
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn into_model(self) -> Q {
        self.agent.into_model()
    }

    fn print_header(&self) {
        let game = &self.config.game_config;
        let trainer = &self.config.trainer_config;
        info!(
            episodes = ?self.config.num_episodes,
            width = game.width,
            height = game.height,
            block_size = game.block_size,
            seed = self.config.seed,
            "Q-learning training - Snake"
        );
        info!(
            learning_rate = trainer.learning_rate,
            gamma = trainer.gamma,
            hidden_size = trainer.hidden_size,
            max_memory = trainer.max_memory,
            batch_size = trainer.batch_size,
            exploration = exploration_probability(trainer, self.run.episode),
            "Trainer config"
        );
    }
}
