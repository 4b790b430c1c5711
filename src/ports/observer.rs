//! Observer port - abstraction for training observation and data collection
//!
//! Observers let the self-play trainer report progress, metrics and logs
//! without the training loop knowing about output formats.

use crate::{
    Result, checkers::TurnOutcome, pipeline::EpisodeSummary, types::Color,
};

/// Observer trait for monitoring self-play training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_turn(...)` - once per completed turn, after the learning update
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - once
///
/// # Examples
///
/// ```no_run
/// use checkers_rl::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> checkers_rl::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called once before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (episodes are numbered from 1).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each turn has been applied and learned from.
    ///
    /// # Parameters
    ///
    /// * `episode` - Current episode number
    /// * `turn` - Turn index within the episode (0-based)
    /// * `color` - Side that moved
    /// * `outcome` - Actions, captures and terminal status of the turn
    /// * `reward` - Reward passed to the mover's learning update
    fn on_turn(
        &mut self,
        _episode: usize,
        _turn: usize,
        _color: Color,
        _outcome: &TurnOutcome,
        _reward: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, whether by a win or by the step cap.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called once after the last episode.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
