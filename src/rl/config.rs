//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Hyperparameters for the approximators and the replay schedule
///
/// # Example
///
/// ```rust
/// use snake_dqn::rl::TrainerConfig;
///
/// let config = TrainerConfig {
///     batch_size: 64,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Step size of the optimizer (Adam for the network, plain step for the table)
    ///
    /// Default: 0.001
    pub learning_rate: f64,

    /// Discount factor applied to the bootstrapped next-state value
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Width of the first hidden layer; the second is half as wide
    ///
    /// Default: 256
    pub hidden_size: usize,

    /// Replay memory capacity
    ///
    /// Default: 100_000
    pub max_memory: usize,

    /// Transitions per end-of-episode replay update
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Exploration numerator at episode 0, decreased by one per episode
    /// and floored at 1
    ///
    /// Default: 80
    pub exploration_start: u32,

    /// Exploration denominator
    ///
    /// Default: 200
    pub exploration_scale: u32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            gamma: 0.9,
            hidden_size: 256,
            max_memory: 100_000,
            batch_size: 1000,
            exploration_start: 80,
            exploration_scale: 200,
        }
    }
}

impl TrainerConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if self.hidden_size < 2 {
            return Err(format!(
                "hidden_size must be at least 2, got {}",
                self.hidden_size
            ));
        }

        if self.max_memory == 0 {
            return Err("max_memory must be at least 1".to_string());
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.exploration_scale == 0 {
            return Err("exploration_scale must be at least 1".to_string());
        }

        if self.exploration_start > self.exploration_scale {
            return Err(format!(
                "exploration_start ({}) cannot exceed exploration_scale ({})",
                self.exploration_start, self.exploration_scale
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrainerConfig::default();
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.hidden_size, 256);
        assert_eq!(config.max_memory, 100_000);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.exploration_start, 80);
        assert_eq!(config.exploration_scale, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_negative_learning_rate() {
        let config = TrainerConfig {
            learning_rate: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_gamma_out_of_range() {
        let mut config = TrainerConfig::default();
        config.gamma = 1.5;
        assert!(config.validate().is_err());

        config.gamma = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_sizes() {
        let mut config = TrainerConfig::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());

        config.batch_size = 10;
        config.max_memory = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_exploration_above_one() {
        let config = TrainerConfig {
            exploration_start: 300,
            exploration_scale: 200,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = TrainerConfig {
            gamma: 0.95,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: TrainerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
