use serde::{Deserialize, Serialize};

/// Configuration for the game
///
/// Coordinates are in pixels: every cell is `block_size` wide and the board
/// spans `[0, width) x [0, height)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board in pixels
    pub width: i32,
    /// Height of the board in pixels
    pub height: i32,
    /// Edge length of one cell in pixels
    pub block_size: i32,
    /// Length of the snake at the start of an episode
    pub initial_snake_length: usize,
    /// Steps allowed since the last meal before the episode is ended
    pub starvation_limit: u32,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for dying (wall, self or starvation)
    pub death_penalty: f32,
    /// Reward for a move that brings the head strictly closer to food
    pub approach_reward: f32,
    /// Reward for any other non-terminal, non-food move
    pub retreat_penalty: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block_size: 20,
            initial_snake_length: 3,
            starvation_limit: 100,
            food_reward: 10.0,
            death_penalty: -10.0,
            approach_reward: 0.1,
            retreat_penalty: -0.1,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size in pixels
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Board measured in cells rather than pixels, using the default block size
    pub fn with_cells(columns: i32, rows: i32) -> Self {
        let block = Self::default().block_size;
        Self::new(columns * block, rows * block)
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::with_cells(10, 10)
    }

    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Validate board geometry
    ///
    /// The snake starts at the center cell facing right with its body trailing
    /// to the left, so the board must be wide enough to hold it.
    pub fn validate(&self) -> Result<(), String> {
        if self.block_size <= 0 {
            return Err(format!(
                "block_size must be positive, got {}",
                self.block_size
            ));
        }

        if self.width <= 0 || self.height <= 0 {
            return Err(format!(
                "board must have positive size, got {}x{}",
                self.width, self.height
            ));
        }

        if self.width % self.block_size != 0 || self.height % self.block_size != 0 {
            return Err(format!(
                "board {}x{} is not a multiple of block_size {}",
                self.width, self.height, self.block_size
            ));
        }

        if self.initial_snake_length < 1 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        let head_column = self.columns() / 2;
        if (head_column + 1) < self.initial_snake_length as i32 {
            return Err(format!(
                "board with {} columns cannot fit a snake of length {}",
                self.columns(),
                self.initial_snake_length
            ));
        }

        let cells = self.columns() as usize * self.rows() as usize;
        if cells <= self.initial_snake_length {
            return Err(format!(
                "board with {} cells leaves no free cell for food next to a snake of length {}",
                cells, self.initial_snake_length
            ));
        }

        if self.starvation_limit == 0 {
            return Err("starvation_limit must be at least 1".to_string());
        }

        Ok(())
    }
}
