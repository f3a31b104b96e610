//! Best-model checkpointing
//!
//! The training loop calls [`Checkpoint::save_best`] whenever an episode beats
//! the record. [`FileCheckpoint`] writes the approximator into a directory
//! next to a JSON metadata file; [`NoCheckpoint`] discards the request.
//!
//! Files written by [`FileCheckpoint`] under `save_dir`:
//! - `model.mpk` (network weights, burn record format) or `model.json` (table)
//! - `model.meta.json` metadata

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::agent::TrainingRunState;
use super::config::TrainerConfig;
use super::network::QNetworkConfig;
use super::tabular::TabularQ;
use super::trainer::QTrainer;
use crate::game::GameConfig;

/// Metadata saved with the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Which approximator wrote the weights
    pub approximator: String,

    /// Episode whose score set the record
    pub episode: u32,

    /// The record score
    pub score: u32,

    pub trainer_config: TrainerConfig,

    pub game_config: GameConfig,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    pub fn new(
        approximator: impl Into<String>,
        episode: u32,
        score: u32,
        trainer_config: TrainerConfig,
        game_config: GameConfig,
    ) -> Self {
        Self {
            approximator: approximator.into(),
            episode,
            score,
            trainer_config,
            game_config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read metadata from {:?}", path))?;
        serde_json::from_str(&json).context("Failed to deserialize metadata")
    }
}

/// An approximator that can write itself to disk
pub trait Persist {
    /// Short name recorded in the metadata
    fn kind(&self) -> &'static str;

    /// Write the model at `stem` (extension chosen by the implementation)
    /// and return the path written
    fn save(&self, stem: &Path) -> Result<PathBuf>;
}

impl<B: AutodiffBackend> Persist for QTrainer<B> {
    fn kind(&self) -> &'static str {
        "mlp"
    }

    fn save(&self, stem: &Path) -> Result<PathBuf> {
        let record = self.network().clone().into_record();
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(record, stem.to_path_buf())
            .context("Failed to save network weights")?;
        Ok(stem.with_extension("mpk"))
    }
}

impl Persist for TabularQ {
    fn kind(&self) -> &'static str {
        "tabular"
    }

    fn save(&self, stem: &Path) -> Result<PathBuf> {
        let path = stem.with_extension("json");
        let json = serde_json::to_string(self).context("Failed to serialize Q-table")?;
        fs::write(&path, json).with_context(|| format!("Failed to write Q-table to {:?}", path))?;
        Ok(path)
    }
}

/// Load network weights written by [`Persist::save`] into a fresh trainer
pub fn load_trainer<B: AutodiffBackend>(
    stem: &Path,
    config: &TrainerConfig,
    device: B::Device,
) -> Result<QTrainer<B>> {
    let network = QNetworkConfig::new(config.hidden_size).init::<B>(&device);
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(stem.to_path_buf(), &device)
        .with_context(|| format!("Failed to load network weights from {:?}", stem))?;
    Ok(QTrainer::from_network(
        network.load_record(record),
        config,
        device,
    ))
}

pub fn load_table(path: &Path) -> Result<TabularQ> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read Q-table from {:?}", path))?;
    serde_json::from_str(&json).context("Failed to deserialize Q-table")
}

/// Receives the approximator whenever a run sets a new best score
pub trait Checkpoint<Q> {
    fn save_best(&mut self, model: &Q, run: &TrainingRunState) -> Result<()>;
}

/// Overwrites `<dir>/model.*` on every new record
#[derive(Debug, Clone)]
pub struct FileCheckpoint {
    dir: PathBuf,
    trainer_config: TrainerConfig,
    game_config: GameConfig,
}

impl FileCheckpoint {
    pub fn new(
        dir: impl Into<PathBuf>,
        trainer_config: TrainerConfig,
        game_config: GameConfig,
    ) -> Self {
        Self {
            dir: dir.into(),
            trainer_config,
            game_config,
        }
    }

    pub fn model_stem(&self) -> PathBuf {
        self.dir.join("model")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.model_stem().with_extension("meta.json")
    }
}

impl<Q: Persist> Checkpoint<Q> for FileCheckpoint {
    fn save_best(&mut self, model: &Q, run: &TrainingRunState) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {:?}", self.dir))?;

        let path = model.save(&self.model_stem())?;

        let metadata = ModelMetadata::new(
            model.kind(),
            run.episode,
            run.best_score,
            self.trainer_config.clone(),
            self.game_config.clone(),
        );
        let meta_path = self.metadata_path();
        let meta_json =
            serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
        fs::write(&meta_path, meta_json)
            .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

        info!(
            path = %path.display(),
            episode = run.episode,
            score = run.best_score,
            "Saved best model"
        );
        Ok(())
    }
}

/// Discards every save request
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCheckpoint;

impl<Q> Checkpoint<Q> for NoCheckpoint {
    fn save_best(&mut self, _model: &Q, _run: &TrainingRunState) -> Result<()> {
        Ok(())
    }
}
