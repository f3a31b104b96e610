use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    action::{Direction, RelativeAction},
    config::GameConfig,
    state::{Bounds, DeathCause, GameState, Position, Snake},
};
use crate::error::SnakeError;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the episode ended, if it did
    pub death_cause: Option<DeathCause>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Score after this step
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// Owns the configuration and the random source used for food placement.
/// The engine is seeded explicitly so whole episodes can be replayed.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration and seed
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, SnakeError> {
        config.validate().map_err(SnakeError::InvalidConfig)?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.config.width, self.config.height, self.config.block_size)
    }

    /// Reset the game to initial state: centered snake facing right, fresh food,
    /// zero score and zero starvation counter.
    pub fn reset(&mut self) -> GameState {
        let block = self.config.block_size;
        let head = Position::new(
            self.config.columns() / 2 * block,
            self.config.rows() / 2 * block,
        );

        let snake = Snake::new(
            head,
            Direction::Right,
            self.config.initial_snake_length,
            block,
        );

        // validate() leaves at least one free cell
        let food = self.spawn_food_avoid_snake(&snake).unwrap_or(head);

        GameState::new(snake, food, self.bounds())
    }

    /// Execute one step of the game
    ///
    /// The new head is pushed before any check. On a terminal step the body is
    /// left as-is (the tail is not popped) and the state is marked dead;
    /// stepping again returns [`SnakeError::EpisodeOver`].
    pub fn step(
        &mut self,
        state: &mut GameState,
        action: RelativeAction,
    ) -> Result<StepResult, SnakeError> {
        if !state.is_alive {
            return Err(SnakeError::EpisodeOver);
        }

        state.frame_iteration += 1;
        state.steps += 1;

        let old_head = state.snake.head();
        let dist_before = old_head.distance_to(state.food);

        state.snake.direction = state.snake.direction.turned(action);
        let new_head = old_head.moved_in_direction(state.snake.direction, self.config.block_size);
        state.snake.push_head(new_head);

        if let Some(cause) = self.check_death(state, new_head) {
            state.is_alive = false;

            return Ok(StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                score: state.score,
                info: StepInfo {
                    ate_food: false,
                    death_cause: Some(cause),
                },
            });
        }

        if new_head == state.food {
            state.score += 1;
            state.frame_iteration = 0;

            // A snake covering every cell has won; the episode ends there
            let terminated = match self.spawn_food_avoid_snake(&state.snake) {
                Some(food) => {
                    state.food = food;
                    false
                }
                None => {
                    state.is_alive = false;
                    true
                }
            };

            return Ok(StepResult {
                reward: self.config.food_reward,
                terminated,
                score: state.score,
                info: StepInfo {
                    ate_food: true,
                    death_cause: None,
                },
            });
        }

        state.snake.pop_tail();

        // A tie counts as not closer
        let dist_after = new_head.distance_to(state.food);
        let reward = if dist_after < dist_before {
            self.config.approach_reward
        } else {
            self.config.retreat_penalty
        };

        Ok(StepResult {
            reward,
            terminated: false,
            score: state.score,
            info: StepInfo {
                ate_food: false,
                death_cause: None,
            },
        })
    }

    /// Wall and body checks take precedence over starvation
    fn check_death(&self, state: &GameState, head: Position) -> Option<DeathCause> {
        if !state.is_in_bounds(head) {
            return Some(DeathCause::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(DeathCause::SelfCollision);
        }

        if state.frame_iteration > self.config.starvation_limit {
            return Some(DeathCause::Starvation);
        }

        None
    }

    /// Spawn food at a random block-aligned cell not covered by the snake
    ///
    /// Re-rolls until a free cell comes up. Returns `None` when the snake
    /// covers the whole board.
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Option<Position> {
        let cells = self.config.columns() as usize * self.config.rows() as usize;
        if snake.len() >= cells {
            return None;
        }

        let block = self.config.block_size;
        loop {
            let x = self.rng.gen_range(0..self.config.columns()) * block;
            let y = self.rng.gen_range(0..self.config.rows()) * block;
            let pos = Position::new(x, y);

            if !snake.contains(pos) {
                return Some(pos);
            }
        }
    }
}
