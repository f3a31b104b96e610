use serde::{Deserialize, Serialize};

use crate::error::SnakeError;

/// Number of relative actions the agent can take
pub const NUM_ACTIONS: usize = 3;

/// Compass heading of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// Headings in clockwise order. A right turn advances one slot, a left
    /// turn goes back one.
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Position of this heading in [`Direction::CLOCKWISE`]
    pub fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Heading obtained by applying a relative action to this heading
    pub fn turned(&self, action: RelativeAction) -> Direction {
        let len = Self::CLOCKWISE.len();
        let offset = match action {
            RelativeAction::Straight => 0,
            RelativeAction::TurnRight => 1,
            RelativeAction::TurnLeft => len - 1,
        };
        Self::CLOCKWISE[(self.clockwise_index() + offset) % len]
    }

    /// Returns the unit delta (dx, dy) for moving in this direction.
    /// Screen coordinates: y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Action relative to the current heading, never an absolute direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativeAction {
    Straight,
    TurnRight,
    TurnLeft,
}

impl RelativeAction {
    /// All actions in one-hot slot order
    pub const ALL: [RelativeAction; NUM_ACTIONS] = [
        RelativeAction::Straight,
        RelativeAction::TurnRight,
        RelativeAction::TurnLeft,
    ];

    /// Slot of this action in the one-hot / action-value vectors
    pub fn index(&self) -> usize {
        match self {
            RelativeAction::Straight => 0,
            RelativeAction::TurnRight => 1,
            RelativeAction::TurnLeft => 2,
        }
    }

    pub fn from_index(idx: usize) -> Result<Self, SnakeError> {
        Self::ALL.get(idx).copied().ok_or_else(|| {
            SnakeError::InvalidAction(format!("action index {idx} out of range 0..{NUM_ACTIONS}"))
        })
    }

    /// Decode a one-hot vector. Anything other than exactly one entry equal
    /// to 1 with the rest 0 is rejected.
    pub fn from_one_hot(one_hot: &[f32]) -> Result<Self, SnakeError> {
        if one_hot.len() != NUM_ACTIONS {
            return Err(SnakeError::InvalidAction(format!(
                "expected {NUM_ACTIONS} entries, got {}",
                one_hot.len()
            )));
        }

        let mut selected = None;
        for (idx, &value) in one_hot.iter().enumerate() {
            if value == 1.0 {
                if selected.is_some() {
                    return Err(SnakeError::InvalidAction(format!(
                        "more than one entry set in {one_hot:?}"
                    )));
                }
                selected = Some(idx);
            } else if value != 0.0 {
                return Err(SnakeError::InvalidAction(format!(
                    "entry {idx} is {value}, expected 0 or 1"
                )));
            }
        }

        match selected {
            Some(idx) => Self::from_index(idx),
            None => Err(SnakeError::InvalidAction(format!(
                "no entry set in {one_hot:?}"
            ))),
        }
    }

    pub fn one_hot(&self) -> [f32; NUM_ACTIONS] {
        let mut v = [0.0; NUM_ACTIONS];
        v[self.index()] = 1.0;
        v
    }
}
