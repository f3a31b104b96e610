//! Flood-fill trap detection
//!
//! A candidate cell is a trap when the free region reachable from it holds no
//! more cells than the snake is long. The search stops as soon as it has seen
//! more than `body_len` cells, so the cost is bounded by the body length and
//! not by the board area.

use std::collections::{HashSet, VecDeque};

use super::state::{Bounds, Position};

/// Returns true if entering `start` leaves the snake in a region of at most
/// `body_len` free cells.
///
/// `start` itself counts toward the region. Out-of-bounds or occupied starts
/// are trapped immediately.
pub fn is_trapped(
    occupied: &HashSet<Position>,
    body_len: usize,
    start: Position,
    bounds: Bounds,
) -> bool {
    if !bounds.contains(start) || occupied.contains(&start) {
        return true;
    }

    let mut queue = VecDeque::with_capacity(body_len + 4);
    let mut visited = HashSet::with_capacity(body_len + 4);
    queue.push_back(start);
    visited.insert(start);
    let mut count = 0;

    while let Some(cell) = queue.pop_front() {
        count += 1;
        if count > body_len {
            return false;
        }

        for next in bounds.neighbors(cell) {
            if bounds.contains(next) && !occupied.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const BLOCK: i32 = 20;

    fn cell(cx: i32, cy: i32) -> Position {
        Position::new(cx * BLOCK, cy * BLOCK)
    }

    /// Size of the whole free region connected to `start`, no early exit
    fn region_size(occupied: &HashSet<Position>, start: Position, bounds: Bounds) -> usize {
        if !bounds.contains(start) || occupied.contains(&start) {
            return 0;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(c) = stack.pop() {
            for n in bounds.neighbors(c) {
                if bounds.contains(n) && !occupied.contains(&n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len()
    }

    #[test]
    fn test_out_of_bounds_is_trapped() {
        let bounds = Bounds::new(5 * BLOCK, 5 * BLOCK, BLOCK);
        let occupied = HashSet::new();
        assert!(is_trapped(&occupied, 3, cell(-1, 0), bounds));
        assert!(is_trapped(&occupied, 3, cell(5, 0), bounds));
        assert!(is_trapped(&occupied, 3, cell(0, 5), bounds));
    }

    #[test]
    fn test_occupied_start_is_trapped() {
        let bounds = Bounds::new(5 * BLOCK, 5 * BLOCK, BLOCK);
        let occupied: HashSet<_> = [cell(2, 2)].into_iter().collect();
        assert!(is_trapped(&occupied, 1, cell(2, 2), bounds));
    }

    #[test]
    fn test_open_board_is_safe() {
        let bounds = Bounds::new(32 * BLOCK, 24 * BLOCK, BLOCK);
        let occupied: HashSet<_> = [cell(16, 12), cell(15, 12), cell(14, 12)]
            .into_iter()
            .collect();
        assert!(!is_trapped(&occupied, 3, cell(17, 12), bounds));
    }

    #[test]
    fn test_sealed_corner_pocket() {
        // Wall of body cells cuts off the 2x2 top-left corner
        let bounds = Bounds::new(6 * BLOCK, 6 * BLOCK, BLOCK);
        let occupied: HashSet<_> = [cell(2, 0), cell(2, 1), cell(2, 2), cell(1, 2), cell(0, 2)]
            .into_iter()
            .collect();

        // Pocket of 4 cells vs body of 5: trapped
        assert!(is_trapped(&occupied, 5, cell(0, 0), bounds));
        // Same pocket against a shorter body: safe
        assert!(!is_trapped(&occupied, 3, cell(0, 0), bounds));
    }

    #[test]
    fn test_region_equal_to_body_length_is_trapped() {
        let bounds = Bounds::new(4 * BLOCK, BLOCK, BLOCK);
        // Single row: one blocked cell leaves 3 free on the left
        let occupied: HashSet<_> = [cell(3, 0)].into_iter().collect();
        assert!(is_trapped(&occupied, 3, cell(0, 0), bounds));
        assert!(!is_trapped(&occupied, 2, cell(0, 0), bounds));
    }

    #[test]
    fn test_matches_brute_force_flood_fill() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let columns = rng.gen_range(1..=7);
            let rows = rng.gen_range(1..=7);
            let bounds = Bounds::new(columns * BLOCK, rows * BLOCK, BLOCK);

            let mut occupied = HashSet::new();
            for cx in 0..columns {
                for cy in 0..rows {
                    if rng.gen_bool(0.35) {
                        occupied.insert(cell(cx, cy));
                    }
                }
            }
            let body_len = rng.gen_range(1..=12);
            let start = cell(rng.gen_range(-1..=columns), rng.gen_range(-1..=rows));

            let expected = region_size(&occupied, start, bounds) <= body_len;
            assert_eq!(
                is_trapped(&occupied, body_len, start, bounds),
                expected,
                "board {columns}x{rows}, body {body_len}, start {start:?}"
            );
        }
    }

    #[test]
    fn test_does_not_mutate_occupancy() {
        let bounds = Bounds::new(5 * BLOCK, 5 * BLOCK, BLOCK);
        let occupied: HashSet<_> = [cell(1, 1), cell(1, 2)].into_iter().collect();
        let before = occupied.clone();
        is_trapped(&occupied, 2, cell(0, 0), bounds);
        assert_eq!(occupied, before);
    }
}
