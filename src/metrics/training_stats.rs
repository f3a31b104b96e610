//! Rolling statistics over finished episodes

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// Keeps the last `window_size` episodes for smoothed means, plus totals for
/// the whole run.
///
/// # Example
///
/// ```rust
/// use snake_dqn::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
/// stats.record_episode(15.5, 150, 5);
/// stats.record_replay(150);
///
/// assert_eq!(stats.best_score(), 5);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Summed reward per episode (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Food eaten per episode (rolling window)
    episode_scores: VecDeque<u32>,

    /// Transitions used by each end-of-episode replay update (rolling window)
    replay_batches: VecDeque<usize>,

    total_episodes: usize,
    total_steps: usize,
    best_score: u32,
    window_size: usize,
}

impl TrainingStats {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            replay_batches: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            best_score: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    ///
    /// * `reward` - Sum of step rewards
    /// * `length` - Steps taken
    /// * `score` - Food eaten
    pub fn record_episode(&mut self, reward: f32, length: usize, score: u32) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        self.total_episodes += 1;
        self.total_steps += length;
        self.best_score = self.best_score.max(score);
    }

    pub fn record_replay(&mut self, batch_size: usize) {
        Self::push_deque(&mut self.replay_batches, batch_size, self.window_size);
    }

    pub fn mean_episode_reward(&self) -> f32 {
        if self.episode_rewards.is_empty() {
            0.0
        } else {
            self.episode_rewards.iter().sum::<f32>() / self.episode_rewards.len() as f32
        }
    }

    pub fn mean_episode_length(&self) -> f32 {
        Self::mean_of(self.episode_lengths.iter().map(|&l| l as f32))
    }

    pub fn mean_episode_score(&self) -> f32 {
        Self::mean_of(self.episode_scores.iter().map(|&s| s as f32))
    }

    pub fn mean_replay_batch(&self) -> f32 {
        Self::mean_of(self.replay_batches.iter().map(|&b| b as f32))
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary of the rolling window
    ///
    /// `Episodes: 1 | Steps: 150 | Reward: 15.50 | Score: 5.00 | Best: 5 | Len: 150.0 | Replay: 150.0`
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Best: {} | Len: {:.1} | Replay: {:.1}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.best_score,
            self.mean_episode_length(),
            self.mean_replay_batch(),
        )
    }

    fn mean_of(values: impl ExactSizeIterator<Item = f32>) -> f32 {
        let len = values.len();
        if len == 0 {
            0.0
        } else {
            values.sum::<f32>() / len as f32
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
