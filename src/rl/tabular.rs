//! Lookup-table Q-function
//!
//! Every observation feature is binary, so the 14 features pack into a `u16`
//! key. Each update moves the stored values of the observed key toward the
//! Q-learning target by `learning_rate`.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::approximator::{ActionValues, QFunction, q_targets};
use super::buffer::Transition;
use super::config::TrainerConfig;
use super::observation::Observation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularQ {
    table: HashMap<u16, ActionValues>,
    learning_rate: f32,
    gamma: f32,
}

impl TabularQ {
    pub fn new(config: &TrainerConfig) -> Self {
        Self {
            table: HashMap::new(),
            learning_rate: config.learning_rate as f32,
            gamma: config.gamma,
        }
    }

    /// Number of distinct observations seen by `update`
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Pack a binary observation into a table key, feature 0 in bit 0
pub fn observation_key(observation: &Observation) -> u16 {
    observation
        .iter()
        .enumerate()
        .filter(|(_, &v)| v >= 0.5)
        .fold(0u16, |key, (bit, _)| key | (1 << bit))
}

impl QFunction for TabularQ {
    fn predict(&self, observation: &Observation) -> Result<ActionValues> {
        Ok(self
            .table
            .get(&observation_key(observation))
            .copied()
            .unwrap_or_default())
    }

    fn update(&mut self, batch: &[Transition]) -> Result<()> {
        let (_, targets) = q_targets(&*self, batch, self.gamma)?;
        let lr = self.learning_rate;

        for (transition, target) in batch.iter().zip(targets) {
            let values = self
                .table
                .entry(observation_key(&transition.observation))
                .or_default();
            for (value, goal) in values.iter_mut().zip(target) {
                *value += lr * (goal - *value);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RelativeAction;

    fn config(learning_rate: f64) -> TrainerConfig {
        TrainerConfig {
            learning_rate,
            ..Default::default()
        }
    }

    fn obs(bits: &[usize]) -> Observation {
        let mut o = [0.0; 14];
        for &b in bits {
            o[b] = 1.0;
        }
        o
    }

    #[test]
    fn test_observation_key() {
        assert_eq!(observation_key(&obs(&[])), 0);
        assert_eq!(observation_key(&obs(&[0])), 1);
        assert_eq!(observation_key(&obs(&[1, 13])), 0b10_0000_0000_0010);
    }

    #[test]
    fn test_unseen_observation_predicts_zero() {
        let q = TabularQ::new(&config(0.5));
        assert_eq!(q.predict(&obs(&[3, 4])).unwrap(), [0.0; 3]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_update_moves_toward_target() {
        let mut q = TabularQ::new(&config(0.5));
        let transition = Transition {
            observation: obs(&[4]),
            action: RelativeAction::TurnRight,
            reward: -10.0,
            next_observation: obs(&[5]),
            terminal: true,
        };

        q.update(&[transition.clone()]).unwrap();
        assert_eq!(q.predict(&obs(&[4])).unwrap(), [0.0, -5.0, 0.0]);

        q.update(&[transition]).unwrap();
        assert_eq!(q.predict(&obs(&[4])).unwrap(), [0.0, -7.5, 0.0]);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_full_step_learns_bootstrapped_value() {
        let mut q = TabularQ::new(&config(1.0));
        let goal = Transition {
            observation: obs(&[8]),
            action: RelativeAction::Straight,
            reward: 10.0,
            next_observation: obs(&[9]),
            terminal: true,
        };
        let approach = Transition {
            observation: obs(&[7]),
            action: RelativeAction::TurnLeft,
            reward: 0.1,
            next_observation: obs(&[8]),
            terminal: false,
        };

        q.update(&[goal]).unwrap();
        q.update(&[approach]).unwrap();

        let values = q.predict(&obs(&[7])).unwrap();
        assert!((values[2] - (0.1 + 0.9 * 10.0)).abs() < 1e-5);
    }
}
