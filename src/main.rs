use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use snake_dqn::modes::{LogReporter, TrainConfig, TrainMode};
use snake_dqn::rl::{
    FileCheckpoint, NoCheckpoint, Persist, QFunction, QTrainer, TabularQ, TrainingBackend,
    default_device,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_dqn")]
#[command(version, about = "Train a snake agent with online Q-learning")]
struct Cli {
    /// JSON training config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Function approximator to train
    #[arg(long, default_value = "mlp")]
    approximator: Approximator,

    /// Stop after this many episodes (default: run until interrupted)
    #[arg(long)]
    episodes: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Board width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Board height in pixels
    #[arg(long)]
    height: Option<i32>,

    /// Cell size in pixels
    #[arg(long)]
    block_size: Option<i32>,

    /// Directory for the best-model checkpoint
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Log a rolling summary every N episodes
    #[arg(long)]
    log_frequency: Option<usize>,

    /// Do not write checkpoints
    #[arg(long)]
    no_checkpoint: bool,
}

#[derive(Clone, ValueEnum)]
enum Approximator {
    /// Two-hidden-layer network trained with Adam
    Mlp,
    /// Lookup table over the binary features
    Tabular,
}

impl Cli {
    fn train_config(&self) -> Result<TrainConfig> {
        let mut config = match &self.config {
            Some(path) => TrainConfig::load(path)?,
            None => TrainConfig::default(),
        };

        if self.episodes.is_some() {
            config.num_episodes = self.episodes;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.game_config.width = width;
        }
        if let Some(height) = self.height {
            config.game_config.height = height;
        }
        if let Some(block_size) = self.block_size {
            config.game_config.block_size = block_size;
        }
        if let Some(save_dir) = &self.save_dir {
            config.save_dir = save_dir.clone();
        }
        if let Some(log_frequency) = self.log_frequency {
            config.log_frequency = log_frequency;
        }

        Ok(config)
    }
}

fn train<Q>(config: TrainConfig, model: Q, no_checkpoint: bool) -> Result<()>
where
    Q: QFunction + Persist + 'static,
{
    let reporter = LogReporter::new(config.log_frequency, config.stats_window);
    let run = if no_checkpoint {
        TrainMode::new(config, model, NoCheckpoint, reporter)?.run()?
    } else {
        let checkpoint = FileCheckpoint::new(
            config.save_dir.clone(),
            config.trainer_config.clone(),
            config.game_config.clone(),
        );
        TrainMode::new(config, model, checkpoint, reporter)?.run()?
    };

    info!(
        episodes = run.episode,
        record = run.best_score,
        mean_score = run.mean_score(),
        "Done"
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.train_config()?;

    match cli.approximator {
        Approximator::Mlp => {
            let model =
                QTrainer::<TrainingBackend>::new(&config.trainer_config, default_device());
            train(config, model, cli.no_checkpoint)
        }
        Approximator::Tabular => {
            let model = TabularQ::new(&config.trainer_config);
            train(config, model, cli.no_checkpoint)
        }
    }
}
