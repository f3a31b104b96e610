//! Experience replay memory for Q-learning
//!
//! A bounded FIFO of past transitions. Once full, every push evicts the
//! oldest transition. Sampling is uniform without replacement and never
//! mutates the buffer.

use std::collections::VecDeque;

use rand::seq::index;
use rand::Rng;

use super::observation::Observation;
use crate::error::SnakeError;
use crate::game::RelativeAction;

/// One step of experience
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub observation: Observation,
    pub action: RelativeAction,
    pub reward: f32,
    pub next_observation: Observation,
    pub terminal: bool,
}

/// Ring buffer of transitions
///
/// # Example
///
/// ```rust
/// use snake_dqn::game::RelativeAction;
/// use snake_dqn::rl::{ReplayMemory, Transition};
///
/// let mut memory = ReplayMemory::new(2).unwrap();
/// for reward in [1.0, 2.0, 3.0] {
///     memory.push(Transition {
///         observation: [0.0; 14],
///         action: RelativeAction::Straight,
///         reward,
///         next_observation: [0.0; 14],
///         terminal: false,
///     });
/// }
///
/// // The oldest transition was evicted
/// assert_eq!(memory.len(), 2);
/// assert_eq!(memory.iter().next().unwrap().reward, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    transitions: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Result<Self, SnakeError> {
        if capacity == 0 {
            return Err(SnakeError::ZeroCapacity);
        }
        Ok(Self {
            transitions: VecDeque::new(),
            capacity,
        })
    }

    /// Store a transition, evicting the oldest one when full
    pub fn push(&mut self, transition: Transition) {
        if self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Sample up to `batch_size` transitions
    ///
    /// If the memory holds no more than `batch_size` transitions, all of them
    /// are returned. Otherwise exactly `batch_size` distinct transitions are
    /// drawn uniformly.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<Transition> {
        if self.transitions.len() <= batch_size {
            return self.transitions.iter().cloned().collect();
        }
        self.draw(batch_size, rng)
    }

    /// Sample exactly `batch_size` distinct transitions
    ///
    /// Asking for more than is stored is a caller error.
    pub fn sample_exact<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Vec<Transition>, SnakeError> {
        if batch_size > self.transitions.len() {
            return Err(SnakeError::SampleTooLarge {
                requested: batch_size,
                available: self.transitions.len(),
            });
        }
        Ok(self.draw(batch_size, rng))
    }

    fn draw<R: Rng + ?Sized>(&self, amount: usize, rng: &mut R) -> Vec<Transition> {
        index::sample(rng, self.transitions.len(), amount)
            .into_iter()
            .map(|i| self.transitions[i].clone())
            .collect()
    }

    /// Transitions from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.transitions.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Transition tagged by its reward so samples can be told apart
    fn transition(tag: usize) -> Transition {
        Transition {
            observation: [0.0; 14],
            action: RelativeAction::ALL[tag % 3],
            reward: tag as f32,
            next_observation: [1.0; 14],
            terminal: tag % 7 == 0,
        }
    }

    fn tags(batch: &[Transition]) -> Vec<usize> {
        batch.iter().map(|t| t.reward as usize).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ReplayMemory::new(0).unwrap_err(), SnakeError::ZeroCapacity);
    }

    #[test]
    fn test_push_and_len() {
        let mut memory = ReplayMemory::new(10).unwrap();
        assert!(memory.is_empty());

        for i in 0..4 {
            memory.push(transition(i));
        }

        assert_eq!(memory.len(), 4);
        assert!(!memory.is_full());
    }

    #[test]
    fn test_overflow_keeps_most_recent() {
        let capacity = 50;
        let extra = 17;
        let mut memory = ReplayMemory::new(capacity).unwrap();

        for i in 0..capacity + extra {
            memory.push(transition(i));
        }

        assert_eq!(memory.len(), capacity);
        assert!(memory.is_full());
        let stored: Vec<usize> = memory.iter().map(|t| t.reward as usize).collect();
        let expected: Vec<usize> = (extra..capacity + extra).collect();
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_sample_returns_everything_when_small() {
        let mut memory = ReplayMemory::new(100).unwrap();
        for i in 0..20 {
            memory.push(transition(i));
        }
        let mut rng = StdRng::seed_from_u64(0);

        let mut batch = tags(&memory.sample(20, &mut rng));
        batch.sort_unstable();
        assert_eq!(batch, (0..20).collect::<Vec<_>>());

        assert_eq!(memory.sample(1000, &mut rng).len(), 20);
    }

    #[test]
    fn test_sample_distinct_when_large() {
        let mut memory = ReplayMemory::new(1000).unwrap();
        for i in 0..500 {
            memory.push(transition(i));
        }
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            let batch = tags(&memory.sample(64, &mut rng));
            assert_eq!(batch.len(), 64);
            let unique: HashSet<_> = batch.iter().collect();
            assert_eq!(unique.len(), 64);
            assert!(batch.iter().all(|&t| t < 500));
        }
    }

    #[test]
    fn test_sampling_does_not_mutate() {
        let mut memory = ReplayMemory::new(30).unwrap();
        for i in 0..30 {
            memory.push(transition(i));
        }
        let before: Vec<Transition> = memory.iter().cloned().collect();
        let mut rng = StdRng::seed_from_u64(2);

        memory.sample(10, &mut rng);
        memory.sample_exact(30, &mut rng).unwrap();

        let after: Vec<Transition> = memory.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sample_exact_too_large() {
        let mut memory = ReplayMemory::new(10).unwrap();
        memory.push(transition(0));
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            memory.sample_exact(2, &mut rng),
            Err(SnakeError::SampleTooLarge {
                requested: 2,
                available: 1
            })
        );
    }

    #[test]
    fn test_sampling_covers_whole_buffer() {
        let mut memory = ReplayMemory::new(20).unwrap();
        for i in 0..40 {
            memory.push(transition(i));
        }
        let mut rng = StdRng::seed_from_u64(4);

        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.extend(tags(&memory.sample(5, &mut rng)));
        }
        assert_eq!(seen, (20..40).collect::<HashSet<_>>());
    }

    #[test]
    fn test_clear() {
        let mut memory = ReplayMemory::new(5).unwrap();
        memory.push(transition(1));
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.capacity(), 5);
    }
}
