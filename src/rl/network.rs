//! Feed-forward Q-network
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 14]
//!   ↓ Linear(14 → hidden) + ReLU
//!   ↓ Linear(hidden → hidden/2) + ReLU
//!   ↓ Linear(hidden/2 → 3)
//! Output: [batch, 3] action values (straight, right, left)
//! ```
//!
//! # Example
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use snake_dqn::rl::{QNetworkConfig, default_device};
//!
//! let device = default_device();
//! let network = QNetworkConfig::new(256).init::<NdArray<f32>>(&device);
//!
//! let observation = Tensor::zeros([8, 14], &device);
//! assert_eq!(network.forward(observation).dims(), [8, 3]);
//! ```

use burn::{
    backend::{Autodiff, ndarray::{NdArray, NdArrayDevice}},
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};

use super::observation::OBSERVATION_SIZE;
use crate::game::NUM_ACTIONS;

/// Autodiff CPU backend used for training
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Plain CPU backend for inference-only use
pub type InferenceBackend = NdArray<f32>;

pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

#[derive(Debug, Clone)]
pub struct QNetworkConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub num_actions: usize,
}

impl QNetworkConfig {
    pub fn new(hidden_size: usize) -> Self {
        Self {
            input_size: OBSERVATION_SIZE,
            hidden_size,
            num_actions: NUM_ACTIONS,
        }
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        let second = (self.hidden_size / 2).max(1);
        QNetwork {
            fc1: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            fc2: LinearConfig::new(self.hidden_size, second).init(device),
            output: LinearConfig::new(second, self.num_actions).init(device),
        }
    }
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self::new(256)
    }
}

#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Map `[batch, 14]` observations to `[batch, 3]` action values
    pub fn forward(&self, observation: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(observation));
        let x = relu(self.fc2.forward(x));
        self.output.forward(x)
    }
}
