//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::training::{EpisodeSummary, TrainingResult};
use crate::{
    Error, Result,
    checkers::TurnOutcome,
    ports::Observer,
    q_learning::QLearningAgent,
    types::{Action, Color},
};

/// One completed turn, as written to the JSON Lines log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnObservation {
    pub turn: usize,
    pub color: Color,
    /// Every single-step action of the turn, chain continuations included
    pub actions: Vec<Action>,
    pub captured: usize,
    pub reward: f64,
}

/// Complete observation of a training episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    #[serde(flatten)]
    pub summary: EpisodeSummary,
    pub turns: Vec<TurnObservation>,
}

/// Progress bar observer - Shows training progress
#[derive(Default)]
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    red_wins: usize,
    black_wins: usize,
    truncated: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn message(&self) -> String {
        format!(
            "R:{} B:{} cap:{}",
            self.red_wins, self.black_wins, self.truncated
        )
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.winner {
            Some(Color::Red) => self.red_wins += 1,
            Some(Color::Black) => self.black_wins += 1,
            None => self.truncated += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcomes and game lengths
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    red_wins: usize,
    black_wins: usize,
    truncated: usize,
    total_episodes: usize,
    total_turns: usize,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> usize {
        self.total_episodes
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            count as f64 / self.total_episodes as f64
        }
    }

    pub fn red_win_rate(&self) -> f64 {
        self.rate(self.red_wins)
    }

    pub fn black_win_rate(&self) -> f64 {
        self.rate(self.black_wins)
    }

    /// Get average episode length in turns
    pub fn avg_episode_length(&self) -> f64 {
        self.rate(self.total_turns)
    }

    /// Combine the tallies with the agents' final state.
    pub fn result(&self, red: &QLearningAgent, black: &QLearningAgent) -> TrainingResult {
        TrainingResult {
            episodes: self.total_episodes,
            red_wins: self.red_wins,
            black_wins: self.black_wins,
            truncated: self.truncated,
            red_win_rate: self.red_win_rate(),
            black_win_rate: self.black_win_rate(),
            average_turns: self.avg_episode_length(),
            red_epsilon: red.epsilon(),
            black_epsilon: black.epsilon(),
            red_table_size: red.q_table().size(),
            black_table_size: black.q_table().size(),
        }
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.total_episodes += 1;
        self.total_turns += summary.turns;
        match summary.winner {
            Some(Color::Red) => self.red_wins += 1,
            Some(Color::Black) => self.black_wins += 1,
            None => self.truncated += 1,
        }
        Ok(())
    }
}

/// Logs both exploration rates every `interval` episodes
pub struct EpsilonReportObserver {
    interval: usize,
}

impl EpsilonReportObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Observer for EpsilonReportObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        if summary.episode % self.interval == 0 {
            info!(
                episode = summary.episode,
                red_epsilon = summary.red_epsilon,
                black_epsilon = summary.black_epsilon,
                "exploration rates"
            );
        }
        Ok(())
    }
}

/// JSONL observer - Exports one episode per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_turns: Vec<TurnObservation>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create observation log {path:?}"),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_turns: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_turns.clear();
        Ok(())
    }

    fn on_turn(
        &mut self,
        _episode: usize,
        turn: usize,
        color: Color,
        outcome: &TurnOutcome,
        reward: f64,
    ) -> Result<()> {
        self.current_turns.push(TurnObservation {
            turn,
            color,
            actions: outcome.actions(),
            captured: outcome.captured_count(),
            reward,
        });
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let observation = Observation {
            summary: summary.clone(),
            turns: std::mem::take(&mut self.current_turns),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
