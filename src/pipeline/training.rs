//! Self-play training pipeline
//!
//! Two Q-learning agents, one per color, play each other from the standard
//! layout. Every turn (including any forced capture chain) goes through
//! [`apply_full_turn`]; the mover then makes a single learning update for the
//! action that opened the turn.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::observers::MetricsObserver;
use crate::{
    Error, Result,
    adapters::{CheckpointFormat, checkpoint_path},
    checkers::{Board, apply_full_turn},
    ports::{CheckpointRepository, Observer, TurnPolicy},
    q_learning::{QLearningAgent, TrainingMetadata},
    types::Color,
};

/// Reward per captured piece
pub const CAPTURE_REWARD: f64 = 10.0;
/// Reward (or penalty) for winning (or losing) the episode
pub const WIN_REWARD: f64 = 100.0;

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of self-play episodes
    pub episodes: usize,

    /// Random seed; red uses it as is, black uses `seed + 1`
    pub seed: Option<u64>,

    /// Turn cap per episode; `None` plays every episode to a result
    pub max_steps: Option<usize>,

    /// Interval, in episodes, for exploration-rate reports
    pub report_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 5000,
            seed: None,
            max_steps: Some(500),
            report_every: 500,
        }
    }
}

/// What happened in one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Episode number, from 1
    pub episode: usize,
    pub winner: Option<Color>,
    pub turns: usize,
    /// Pieces captured by both sides
    pub captures: usize,
    /// Stopped by the turn cap rather than a result
    pub truncated: bool,
    pub red_epsilon: f64,
    pub black_epsilon: f64,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub episodes: usize,
    pub red_wins: usize,
    pub black_wins: usize,
    /// Episodes ended by the turn cap
    pub truncated: usize,
    pub red_win_rate: f64,
    pub black_win_rate: f64,
    pub average_turns: f64,
    pub red_epsilon: f64,
    pub black_epsilon: f64,
    /// (state, action) entries in each table
    pub red_table_size: usize,
    pub black_table_size: usize,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Reward for the side that just completed a turn.
///
/// `10` per captured piece, plus `+100` if the turn ended the game in the
/// mover's favor or `-100` if it ended against them.
pub fn compute_reward(captured: usize, winner: Option<Color>, color: Color) -> f64 {
    let mut reward = CAPTURE_REWARD * captured as f64;
    match winner {
        Some(winner) if winner == color => reward += WIN_REWARD,
        Some(_) => reward -= WIN_REWARD,
        None => {}
    }
    reward
}

/// Self-play trainer
pub struct SelfPlayTrainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    metrics: MetricsObserver,
}

impl SelfPlayTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            metrics: MetricsObserver::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every configured episode.
    ///
    /// # Errors
    ///
    /// Fails when an agent is given the wrong color, or on observer errors.
    pub fn run(
        &mut self,
        red: &mut QLearningAgent,
        black: &mut QLearningAgent,
    ) -> Result<TrainingResult> {
        if red.color() != Color::Red || black.color() != Color::Black {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "self-play needs a red and a black agent, got {} and {}",
                    red.color(),
                    black.color()
                ),
            });
        }
        self.seed_pair(red, black)?;
        self.metrics = MetricsObserver::new();

        info!(
            episodes = self.config.episodes,
            seed = ?self.config.seed,
            "starting self-play training"
        );

        self.metrics.on_training_start(self.config.episodes)?;
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        for episode in 1..=self.config.episodes {
            let summary = self.play_episode(episode, red, black)?;
            self.metrics.on_episode_end(&summary)?;
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = self.metrics.result(red, black);
        info!(
            red_wins = result.red_wins,
            black_wins = result.black_wins,
            truncated = result.truncated,
            "training finished"
        );
        Ok(result)
    }

    fn seed_pair(&self, red: &mut QLearningAgent, black: &mut QLearningAgent) -> Result<()> {
        if let Some(seed) = self.config.seed {
            red.set_rng_seed(seed)?;
            black.set_rng_seed(seed.wrapping_add(1))?;
        }
        Ok(())
    }

    /// Play one episode from the standard layout, learning as it goes.
    pub fn play_episode(
        &mut self,
        episode: usize,
        red: &mut QLearningAgent,
        black: &mut QLearningAgent,
    ) -> Result<EpisodeSummary> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut board = Board::new();
        let mut color = Color::Red;
        let mut turns = 0;
        let mut captures = 0;
        let mut winner = None;

        loop {
            if self.config.max_steps.is_some_and(|cap| turns >= cap) {
                debug!(episode, turns, "episode hit the turn cap");
                break;
            }

            let agent: &mut QLearningAgent = match color {
                Color::Red => &mut *red,
                Color::Black => &mut *black,
            };

            let old_state = board.encode_state();
            let outcome = apply_full_turn(&mut board, color, &mut *agent)?;
            let new_state = board.encode_state();

            let reward = compute_reward(outcome.captured_count(), outcome.winner(), color);
            agent.learn(
                &old_state,
                outcome.initiating_action(),
                reward,
                &new_state,
                outcome.is_terminal(),
            );

            for observer in &mut self.observers {
                observer.on_turn(episode, turns, color, &outcome, reward)?;
            }

            turns += 1;
            captures += outcome.captured_count();
            if outcome.is_terminal() {
                winner = outcome.winner();
                break;
            }
            color = color.opponent();
        }

        Ok(EpisodeSummary {
            episode,
            winner,
            turns,
            captures,
            truncated: winner.is_none(),
            red_epsilon: red.epsilon(),
            black_epsilon: black.epsilon(),
        })
    }

    /// Persist both tables into `dir` using the conventional file names.
    ///
    /// Returns the (red, black) paths written.
    pub fn save_checkpoints(
        &self,
        repository: &dyn CheckpointRepository,
        red: &QLearningAgent,
        black: &QLearningAgent,
        dir: &Path,
        format: CheckpointFormat,
    ) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            operation: format!("create directory {dir:?}"),
            source,
        })?;

        let metadata = TrainingMetadata::now()
            .with_episodes(self.config.episodes)
            .with_seed(self.config.seed);

        let red_path = checkpoint_path(dir, Color::Red, format);
        let black_path = checkpoint_path(dir, Color::Black, format);
        red.save_with(repository, &red_path, metadata.clone())?;
        black.save_with(repository, &black_path, metadata)?;

        info!(red = ?red_path, black = ?black_path, "saved Q-tables");
        Ok((red_path, black_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::InMemoryRepository, app::AgentConfig};

    fn agents() -> (QLearningAgent, QLearningAgent) {
        (
            QLearningAgent::new(Color::Red, AgentConfig::default()),
            QLearningAgent::new(Color::Black, AgentConfig::default()),
        )
    }

    #[test]
    fn test_reward_values() {
        assert_eq!(compute_reward(0, None, Color::Red), 0.0);
        assert_eq!(compute_reward(2, None, Color::Black), 20.0);
        assert_eq!(compute_reward(1, Some(Color::Red), Color::Red), 110.0);
        assert_eq!(compute_reward(0, Some(Color::Red), Color::Black), -100.0);
    }

    #[test]
    fn test_training_pipeline() {
        let config = TrainingConfig {
            episodes: 5,
            seed: Some(42),
            max_steps: Some(200),
            report_every: 1,
        };
        let mut trainer = SelfPlayTrainer::new(config);
        let (mut red, mut black) = agents();

        let result = trainer.run(&mut red, &mut black).unwrap();

        assert_eq!(result.episodes, 5);
        assert_eq!(result.red_wins + result.black_wins + result.truncated, 5);
        assert!(result.red_table_size > 0);
        assert!(result.black_table_size > 0);
    }

    #[test]
    fn test_same_seed_same_tables() {
        let config = TrainingConfig {
            episodes: 3,
            seed: Some(7),
            max_steps: Some(100),
            report_every: 500,
        };
        let (mut red_a, mut black_a) = agents();
        let (mut red_b, mut black_b) = agents();
        SelfPlayTrainer::new(config.clone())
            .run(&mut red_a, &mut black_a)
            .unwrap();
        SelfPlayTrainer::new(config)
            .run(&mut red_b, &mut black_b)
            .unwrap();
        assert_eq!(red_a.q_table(), red_b.q_table());
        assert_eq!(black_a.q_table(), black_b.q_table());
    }

    #[test]
    fn test_turn_cap_truncates() {
        let config = TrainingConfig {
            episodes: 1,
            seed: Some(1),
            max_steps: Some(4),
            report_every: 500,
        };
        let mut trainer = SelfPlayTrainer::new(config);
        let (mut red, mut black) = agents();
        let summary = trainer.play_episode(1, &mut red, &mut black).unwrap();
        assert_eq!(summary.turns, 4);
        assert!(summary.truncated);
        // No terminal update, so no decay either
        assert_eq!(summary.red_epsilon, 1.0);
    }

    #[test]
    fn test_swapped_agents_rejected() {
        let mut trainer = SelfPlayTrainer::new(TrainingConfig::default());
        let (mut red, mut black) = agents();
        assert!(trainer.run(&mut black, &mut red).is_err());
    }

    #[test]
    fn test_save_checkpoints_names_files_by_color() {
        let trainer = SelfPlayTrainer::new(TrainingConfig::default());
        let (red, black) = agents();
        let repo = InMemoryRepository::new();
        let dir = tempfile::TempDir::new().unwrap();
        let (red_path, black_path) = trainer
            .save_checkpoints(&repo, &red, &black, dir.path(), CheckpointFormat::MsgPack)
            .unwrap();
        assert!(red_path.ends_with("q_red.msgpack"));
        assert!(black_path.ends_with("q_black.msgpack"));
        assert_eq!(repo.count(), 2);
    }
}
