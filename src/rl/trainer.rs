//! Gradient-trained Q-function
//!
//! Wraps a [`QNetwork`] with an Adam optimizer. Each `update` runs one
//! optimizer step on the mean-squared error between the network's output and
//! the Q-learning target vectors.

use anyhow::{Result, anyhow};
use burn::{
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{ElementConversion, Tensor, TensorData, backend::AutodiffBackend},
};
use tracing::debug;

use super::approximator::{ActionValues, QFunction, q_targets};
use super::buffer::Transition;
use super::config::TrainerConfig;
use super::network::{QNetwork, QNetworkConfig};
use super::observation::{OBSERVATION_SIZE, Observation};
use crate::game::NUM_ACTIONS;

pub struct QTrainer<B: AutodiffBackend> {
    network: QNetwork<B>,
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,
    learning_rate: f64,
    gamma: f32,
    hidden_size: usize,
    updates: usize,
    device: B::Device,
}

impl<B: AutodiffBackend> QTrainer<B> {
    pub fn new(config: &TrainerConfig, device: B::Device) -> Self {
        let network = QNetworkConfig::new(config.hidden_size).init::<B>(&device);
        Self::from_network(network, config, device)
    }

    /// Train an existing network, e.g. one restored from a checkpoint
    pub fn from_network(network: QNetwork<B>, config: &TrainerConfig, device: B::Device) -> Self {
        Self {
            network,
            optim: AdamConfig::new().init(),
            learning_rate: config.learning_rate,
            gamma: config.gamma,
            hidden_size: config.hidden_size,
            updates: 0,
            device,
        }
    }

    pub fn network(&self) -> &QNetwork<B> {
        &self.network
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Optimizer steps taken so far
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    fn batch_data(observations: &[Observation]) -> TensorData {
        let flat: Vec<f32> = observations.iter().flatten().copied().collect();
        TensorData::new(flat, [observations.len(), OBSERVATION_SIZE])
    }
}

impl<B: AutodiffBackend> QFunction for QTrainer<B> {
    fn predict(&self, observation: &Observation) -> Result<ActionValues> {
        self.predict_batch(std::slice::from_ref(observation))?
            .pop()
            .ok_or_else(|| anyhow!("network returned an empty batch"))
    }

    fn predict_batch(&self, observations: &[Observation]) -> Result<Vec<ActionValues>> {
        if observations.is_empty() {
            return Ok(Vec::new());
        }

        // No-grad forward pass
        let network = self.network.clone().valid();
        let input =
            Tensor::<B::InnerBackend, 2>::from_data(Self::batch_data(observations), &self.device);
        let values = network
            .forward(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("failed to read Q-values: {e:?}"))?;

        Ok(values
            .chunks_exact(NUM_ACTIONS)
            .map(|chunk| [chunk[0], chunk[1], chunk[2]])
            .collect())
    }

    fn update(&mut self, batch: &[Transition]) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let (_, targets) = q_targets(&*self, batch, self.gamma)?;

        let observations: Vec<Observation> = batch.iter().map(|t| t.observation).collect();
        let input: Tensor<B, 2> = Tensor::from_data(Self::batch_data(&observations), &self.device);
        let flat_targets: Vec<f32> = targets.iter().flatten().copied().collect();
        let target: Tensor<B, 2> = Tensor::from_data(
            TensorData::new(flat_targets, [batch.len(), NUM_ACTIONS]),
            &self.device,
        );

        let prediction = self.network.forward(input);
        let loss = MseLoss::new().forward(prediction, target, Reduction::Mean);

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.network);
        self.network = self
            .optim
            .step(self.learning_rate, self.network.clone(), grads);
        self.updates += 1;

        debug!(
            batch = batch.len(),
            loss = loss.into_scalar().elem::<f32>(),
            "Q-network update"
        );

        Ok(())
    }
}
