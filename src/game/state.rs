use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the board, in pixel coordinates aligned to the block size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one block in a direction
    pub fn moved_in_direction(&self, direction: Direction, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * block_size, dy * block_size)
    }

    /// Euclidean distance in pixels
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// World bounds `[0, width) x [0, height)` with a fixed block size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32, block_size: i32) -> Self {
        Self {
            width,
            height,
            block_size,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// The four cells one block away from `pos`
    pub fn neighbors(&self, pos: Position) -> [Position; 4] {
        let b = self.block_size;
        [
            pos.moved_by(b, 0),
            pos.moved_by(-b, 0),
            pos.moved_by(0, b),
            pos.moved_by(0, -b),
        ]
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at the front
    pub body: VecDeque<Position>,
    /// Current heading
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose body trails straight behind `head`
    pub fn new(head: Position, direction: Direction, length: usize, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-dx * block_size * i, -dy * block_size * i))
            .collect();

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(segments: &[Position], direction: Direction) -> Self {
        Self {
            body: segments.iter().copied().collect(),
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter().skip(1)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().any(|&p| p == pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    /// Occupied cells as a set, for reachability queries
    pub fn occupied(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Head left the board
    Wall,
    /// Head ran into the body
    SelfCollision,
    /// Too many steps since the last meal
    Starvation,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub bounds: Bounds,
    pub score: u32,
    /// Steps since the last meal (or since reset)
    pub frame_iteration: u32,
    /// Steps since reset
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    pub fn new(snake: Snake, food: Position, bounds: Bounds) -> Self {
        Self {
            snake,
            food,
            bounds,
            score: 0,
            frame_iteration: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the board
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.bounds.contains(pos)
    }

    /// Out of bounds, or on a body cell other than the head
    pub fn is_collision(&self, pos: Position) -> bool {
        !self.is_in_bounds(pos) || self.snake.collides_with_body(pos)
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }
}
