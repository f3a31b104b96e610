//! Feature encoding of the game state
//!
//! The layout is a fixed contract with any trained approximator:
//!
//! | index | feature |
//! |-------|---------|
//! | 0-2   | immediate danger straight / right / left |
//! | 3-6   | heading is Left / Right / Up / Down |
//! | 7-10  | food is left of / right of / above / below the head |
//! | 11-13 | trap straight / right / left |
//!
//! Reordering these invalidates every saved model.

use crate::game::{Direction, GameState, Position, RelativeAction, is_trapped};

/// Length of the observation vector
pub const OBSERVATION_SIZE: usize = 14;

/// Fixed-length feature vector, every entry 0.0 or 1.0
pub type Observation = [f32; OBSERVATION_SIZE];

/// Cells one block ahead, to the right and to the left of the head,
/// in that order
pub fn candidate_cells(state: &GameState) -> [Position; 3] {
    let head = state.snake.head();
    let heading = state.direction();
    let block = state.bounds.block_size;
    [
        RelativeAction::Straight,
        RelativeAction::TurnRight,
        RelativeAction::TurnLeft,
    ]
    .map(|action| head.moved_in_direction(heading.turned(action), block))
}

/// Run the flood fill for the three candidate moves
pub fn trap_flags(state: &GameState) -> [bool; 3] {
    let occupied = state.snake.occupied();
    let body_len = state.snake.len();
    candidate_cells(state).map(|cell| is_trapped(&occupied, body_len, cell, state.bounds))
}

/// Encode the state given precomputed trap flags (straight, right, left)
pub fn encode(state: &GameState, traps: [bool; 3]) -> Observation {
    let head = state.snake.head();
    let food = state.food;
    let heading = state.direction();
    let [straight, right, left] = candidate_cells(state);

    let flags = [
        state.is_collision(straight),
        state.is_collision(right),
        state.is_collision(left),
        heading == Direction::Left,
        heading == Direction::Right,
        heading == Direction::Up,
        heading == Direction::Down,
        food.x < head.x,
        food.x > head.x,
        food.y < head.y,
        food.y > head.y,
        traps[0],
        traps[1],
        traps[2],
    ];

    flags.map(|f| if f { 1.0 } else { 0.0 })
}

/// Full observation for the current state
pub fn create_observation(state: &GameState) -> Observation {
    encode(state, trap_flags(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Bounds, Snake};

    const BLOCK: i32 = 20;

    fn state_with(snake: Snake, food: Position, columns: i32, rows: i32) -> GameState {
        GameState::new(snake, food, Bounds::new(columns * BLOCK, rows * BLOCK, BLOCK))
    }

    #[test]
    fn test_initial_observation() {
        let snake = Snake::new(Position::new(320, 240), Direction::Right, 3, BLOCK);
        let state = state_with(snake, Position::new(400, 100), 32, 24);

        let obs = create_observation(&state);
        assert_eq!(
            obs,
            [
                0.0, 0.0, 0.0, // no danger
                0.0, 1.0, 0.0, 0.0, // heading right
                0.0, 1.0, 1.0, 0.0, // food right and above
                0.0, 0.0, 0.0, // no traps
            ]
        );
    }

    #[test]
    fn test_candidate_cells_follow_heading() {
        let snake = Snake::new(Position::new(100, 100), Direction::Up, 3, BLOCK);
        let state = state_with(snake, Position::new(0, 0), 10, 10);
        let [straight, right, left] = candidate_cells(&state);
        assert_eq!(straight, Position::new(100, 80));
        assert_eq!(right, Position::new(120, 100));
        assert_eq!(left, Position::new(80, 100));
    }

    #[test]
    fn test_danger_against_walls() {
        // Top-left corner heading up: straight and left leave the board
        let snake = Snake::new(Position::new(0, 0), Direction::Up, 1, BLOCK);
        let state = state_with(snake, Position::new(100, 100), 10, 10);
        let obs = create_observation(&state);

        assert_eq!(obs[0], 1.0);
        assert_eq!(obs[1], 0.0);
        assert_eq!(obs[2], 1.0);
        // Out-of-bounds candidates are traps as well
        assert_eq!(obs[11], 1.0);
        assert_eq!(obs[13], 1.0);
    }

    #[test]
    fn test_danger_ignores_trap_input() {
        let snake = Snake::new(Position::new(100, 100), Direction::Right, 3, BLOCK);
        let state = state_with(snake, Position::new(0, 0), 10, 10);

        let obs = encode(&state, [true, false, true]);
        assert_eq!(&obs[0..3], &[0.0, 0.0, 0.0]);
        assert_eq!(&obs[11..14], &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_food_flags() {
        let snake = Snake::new(Position::new(100, 100), Direction::Right, 3, BLOCK);

        let state = state_with(snake.clone(), Position::new(40, 160), 10, 10);
        let obs = create_observation(&state);
        assert_eq!(&obs[7..11], &[1.0, 0.0, 0.0, 1.0]);

        let state = state_with(snake, Position::new(100, 100), 10, 10);
        let obs = create_observation(&state);
        assert_eq!(&obs[7..11], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_trap_detected_in_pocket() {
        // Head at (1,1) heading Left into a pocket sealed by the body:
        //   column 2 is body from row 0 to row 2, row 2 is body from column 0 to 2
        let cell = |cx: i32, cy: i32| Position::new(cx * BLOCK, cy * BLOCK);
        let snake = Snake::from_segments(
            &[
                cell(1, 1),
                cell(2, 1),
                cell(2, 0),
                cell(3, 0),
                cell(3, 1),
                cell(3, 2),
                cell(2, 2),
                cell(1, 2),
                cell(0, 2),
            ],
            Direction::Left,
        );
        let state = state_with(snake, cell(6, 6), 8, 8);
        let obs = create_observation(&state);

        // Straight (0,1), right (1,0), left (1,2 = body)
        assert_eq!(&obs[11..14], &[1.0, 1.0, 1.0]);
        assert_eq!(&obs[0..3], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_values_are_binary() {
        let snake = Snake::new(Position::new(60, 60), Direction::Down, 3, BLOCK);
        let state = state_with(snake, Position::new(20, 140), 5, 8);
        for value in create_observation(&state) {
            assert!(value == 0.0 || value == 1.0);
        }
    }
}
