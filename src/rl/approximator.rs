//! The function-approximator capability
//!
//! The training loop only needs three operations from a Q-function: score one
//! observation, score a batch, and take one learning step on a batch of
//! transitions. Any gradient-based or tabular model that offers them can be
//! plugged in.

use anyhow::Result;

use super::buffer::Transition;
use super::observation::Observation;
use crate::game::NUM_ACTIONS;

/// Estimated return for each relative action, in one-hot slot order
pub type ActionValues = [f32; NUM_ACTIONS];

pub trait QFunction {
    /// Action values for one observation
    fn predict(&self, observation: &Observation) -> Result<ActionValues>;

    /// Action values for many observations, same order as the input
    fn predict_batch(&self, observations: &[Observation]) -> Result<Vec<ActionValues>> {
        observations.iter().map(|o| self.predict(o)).collect()
    }

    /// One learning step toward the Q-learning targets of `batch`
    fn update(&mut self, batch: &[Transition]) -> Result<()>;
}

/// Index of the largest value; the first one wins ties
pub fn argmax(values: &ActionValues) -> usize {
    let mut best = 0;
    for (idx, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = idx;
        }
    }
    best
}

/// Q-learning target vectors for a batch
///
/// Each target starts as the model's current prediction for the observation,
/// so non-selected actions produce no error. The slot of the action taken is
/// replaced by `reward` for terminal transitions and by
/// `reward + gamma * max_a Q(next, a)` otherwise.
///
/// Returns the current predictions alongside the targets.
pub fn q_targets<Q: QFunction + ?Sized>(
    model: &Q,
    batch: &[Transition],
    gamma: f32,
) -> Result<(Vec<ActionValues>, Vec<ActionValues>)> {
    let observations: Vec<Observation> = batch.iter().map(|t| t.observation).collect();
    let next_observations: Vec<Observation> = batch.iter().map(|t| t.next_observation).collect();

    let predictions = model.predict_batch(&observations)?;
    let next_predictions = model.predict_batch(&next_observations)?;

    let targets = batch
        .iter()
        .zip(predictions.iter())
        .zip(next_predictions.iter())
        .map(|((transition, prediction), next)| {
            let mut target = *prediction;
            let q_new = if transition.terminal {
                transition.reward
            } else {
                let max_next = next.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                transition.reward + gamma * max_next
            };
            target[transition.action.index()] = q_new;
            target
        })
        .collect();

    Ok((predictions, targets))
}
