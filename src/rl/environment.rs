use super::observation::{Observation, create_observation};
use crate::error::SnakeError;
use crate::game::{GameConfig, GameEngine, GameState, Position, RelativeAction, StepResult};

/// Snake environment for reinforcement learning
///
/// Owns a seeded [`GameEngine`] and the live [`GameState`], and exposes the
/// reset/step interface the training loop drives. Observations are produced
/// on demand so the caller decides when the flood fill runs.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create an environment and start its first episode
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, SnakeError> {
        let mut engine = GameEngine::new(config, seed)?;
        let state = engine.reset();
        Ok(Self { engine, state })
    }

    /// Start a new episode: centered length-3 snake facing right, fresh food,
    /// zero score and starvation counter
    pub fn reset(&mut self) -> Observation {
        self.state = self.engine.reset();
        self.observation()
    }

    /// Advance one step with a relative action
    pub fn step(&mut self, action: RelativeAction) -> Result<StepResult, SnakeError> {
        self.engine.step(&mut self.state, action)
    }

    /// Advance one step with a one-hot action vector
    ///
    /// Anything other than exactly one entry set to 1 is rejected before the
    /// state is touched.
    pub fn step_one_hot(&mut self, action: &[f32]) -> Result<StepResult, SnakeError> {
        let action = RelativeAction::from_one_hot(action)?;
        self.step(action)
    }

    /// Move the food to `pos`, for scripted scenarios
    pub fn place_food(&mut self, pos: Position) -> Result<(), SnakeError> {
        let block = self.state.bounds.block_size;
        if !self.state.is_in_bounds(pos) || pos.x % block != 0 || pos.y % block != 0 {
            return Err(SnakeError::InvalidAction(format!(
                "food cell {:?} is not a board cell",
                pos
            )));
        }
        if self.state.snake.contains(pos) {
            return Err(SnakeError::InvalidAction(format!(
                "food cell {:?} is covered by the snake",
                pos
            )));
        }
        self.state.food = pos;
        Ok(())
    }

    /// Current observation without stepping
    pub fn observation(&self) -> Observation {
        create_observation(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DeathCause, Direction};

    fn env() -> SnakeEnvironment {
        SnakeEnvironment::new(GameConfig::default(), 7).unwrap()
    }

    #[test]
    fn test_environment_creation() {
        let env = env();
        assert!(env.state().is_alive);
        assert_eq!(env.score(), 0);
        assert_eq!(env.state().steps, 0);
        assert_eq!(env.state().snake.len(), 3);
        assert_eq!(env.state().direction(), Direction::Right);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig::new(641, 480);
        assert!(matches!(
            SnakeEnvironment::new(config, 0),
            Err(SnakeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_end_to_end_scenario() {
        // 640x480 board, head at (320, 240) facing right, food three cells ahead
        let mut env = env();
        assert_eq!(env.state().snake.head(), Position::new(320, 240));
        env.place_food(Position::new(380, 240)).unwrap();

        let mut rewards = Vec::new();
        let mut scores = Vec::new();
        for _ in 0..3 {
            let result = env.step_one_hot(&[1.0, 0.0, 0.0]).unwrap();
            assert!(!result.terminated);
            rewards.push(result.reward);
            scores.push(result.score);
        }

        assert_eq!(rewards, vec![0.1, 0.1, 10.0]);
        assert_eq!(scores, vec![0, 0, 1]);
        assert_eq!(env.state().snake.len(), 4);
        assert_eq!(env.state().frame_iteration, 0);
        assert_ne!(env.state().food, Position::new(380, 240));
    }

    #[test]
    fn test_malformed_action_fails_fast() {
        let mut env = env();
        let before = env.state().clone();

        for action in [
            &[0.0, 0.0, 0.0][..],
            &[1.0, 1.0, 0.0][..],
            &[0.5, 0.0, 0.0][..],
            &[1.0, 0.0][..],
        ] {
            assert!(matches!(
                env.step_one_hot(action),
                Err(SnakeError::InvalidAction(_))
            ));
        }
        assert_eq!(env.state(), &before);
    }

    #[test]
    fn test_reset_after_death() {
        let mut env = env();
        env.place_food(Position::new(0, 0)).unwrap();

        let mut result = env.step(RelativeAction::Straight).unwrap();
        while !result.terminated {
            result = env.step(RelativeAction::Straight).unwrap();
        }
        assert_eq!(result.info.death_cause, Some(DeathCause::Wall));
        assert_eq!(result.reward, -10.0);
        assert_eq!(
            env.step(RelativeAction::Straight),
            Err(SnakeError::EpisodeOver)
        );

        let obs = env.reset();
        assert!(env.state().is_alive);
        assert_eq!(env.state().snake.len(), 3);
        assert_eq!(obs, env.observation());
    }

    #[test]
    fn test_place_food_validation() {
        let mut env = env();
        assert!(env.place_food(Position::new(300, 240)).is_err());
        assert!(env.place_food(Position::new(15, 20)).is_err());
        assert!(env.place_food(Position::new(640, 0)).is_err());
        assert!(env.place_food(Position::new(20, 20)).is_ok());
    }
}
