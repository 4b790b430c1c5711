//! Dependency injection container for the checkers application.
//!
//! The container owns infrastructure dependencies (checkpoint storage, default
//! seeding) and provides factory methods for creating agents.

use std::{path::Path, sync::Arc};

use tracing::{info, warn};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::ExtensionRepository,
    ports::CheckpointRepository,
    q_learning::{QLearningAgent, TrainingMetadata},
    types::Color,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use checkers_rl::app::{App, AgentConfig};
/// use checkers_rl::types::Color;
///
/// let app = App::new();
/// let agent = app.create_agent(Color::Red, AgentConfig::default().with_seed(42))?;
/// # Ok::<(), checkers_rl::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use checkers_rl::app::App;
/// use checkers_rl::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    checkpoint_repository: Arc<dyn CheckpointRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Checkpoints are read and written by [`ExtensionRepository`], so
    /// `.json` paths get JSON and everything else MessagePack.
    pub fn new() -> Self {
        Self {
            checkpoint_repository: Arc::new(ExtensionRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn checkpoint_repository(&self) -> Arc<dyn CheckpointRepository + Send + Sync> {
        Arc::clone(&self.checkpoint_repository)
    }

    /// Create a fresh agent with an empty table.
    ///
    /// The config's seed wins over the container default.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for out-of-range
    /// hyperparameters.
    pub fn create_agent(&self, color: Color, config: AgentConfig) -> Result<QLearningAgent> {
        config.validate()?;
        let agent = QLearningAgent::new(color, config);
        Ok(match config.seed.or(self.default_seed) {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    /// Load an agent's table from storage.
    ///
    /// The agent keeps `config` for its hyperparameters; ε starts at
    /// `config.epsilon_min`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use checkers_rl::app::{App, AgentConfig};
    /// use checkers_rl::types::Color;
    /// use std::path::Path;
    ///
    /// let app = App::new();
    /// let agent = app.load_agent(Color::Red, AgentConfig::default(), Path::new("q_red.msgpack"))?;
    /// # Ok::<(), checkers_rl::Error>(())
    /// ```
    pub fn load_agent(
        &self,
        color: Color,
        config: AgentConfig,
        path: &Path,
    ) -> Result<QLearningAgent> {
        let mut agent = self.create_agent(color, config)?;
        agent.load_with(self.checkpoint_repository.as_ref(), path)?;
        info!(
            %color,
            path = ?path,
            entries = agent.q_table().size(),
            "loaded Q-table"
        );
        Ok(agent)
    }

    /// Load an agent, falling back to an empty table when the checkpoint is
    /// missing or unreadable.
    ///
    /// Configuration errors are still returned.
    pub fn load_or_fresh(
        &self,
        color: Color,
        config: AgentConfig,
        path: &Path,
    ) -> Result<QLearningAgent> {
        let mut agent = self.create_agent(color, config)?;
        if let Err(err) = agent.load_with(self.checkpoint_repository.as_ref(), path) {
            warn!(%color, path = ?path, error = %err, "could not load Q-table, starting fresh");
        }
        Ok(agent)
    }

    /// Save an agent to persistent storage.
    pub fn save_agent(
        &self,
        agent: &QLearningAgent,
        path: &Path,
        metadata: TrainingMetadata,
    ) -> Result<()> {
        agent.save_with(self.checkpoint_repository.as_ref(), path, metadata)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
#[derive(Default)]
pub struct AppBuilder {
    checkpoint_repository: Option<Arc<dyn CheckpointRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom checkpoint repository.
    pub fn with_repository<R: CheckpointRepository + Send + Sync + 'static>(
        mut self,
        repo: R,
    ) -> Self {
        self.checkpoint_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all agents created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app, defaulting to [`ExtensionRepository`] when no
    /// repository was given.
    pub fn build(self) -> App {
        App {
            checkpoint_repository: self
                .checkpoint_repository
                .unwrap_or_else(|| Arc::new(ExtensionRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, adapters::InMemoryRepository, checkers::Board};

    fn app() -> App {
        App::for_testing()
            .with_repository(InMemoryRepository::new())
            .with_default_seed(42)
            .build()
    }

    #[test]
    fn test_create_agent_rejects_bad_config() {
        let result = app().create_agent(Color::Red, AgentConfig::default().with_alpha(2.0));
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_default_seed_makes_agents_reproducible() {
        let app = app();
        let board = Board::new();
        let mut a = app.create_agent(Color::Red, AgentConfig::default()).unwrap();
        let mut b = app.create_agent(Color::Red, AgentConfig::default()).unwrap();
        for _ in 0..5 {
            assert_eq!(
                a.choose_action(&board).unwrap(),
                b.choose_action(&board).unwrap()
            );
        }
    }

    #[test]
    fn test_save_then_load_through_container() {
        let app = app();
        let mut agent = app.create_agent(Color::Black, AgentConfig::default()).unwrap();
        agent.choose_action(&Board::new()).unwrap();
        let path = Path::new("q_black");
        app.save_agent(&agent, path, TrainingMetadata::default())
            .unwrap();

        let loaded = app
            .load_agent(Color::Black, AgentConfig::default(), path)
            .unwrap();
        assert_eq!(loaded.q_table(), agent.q_table());
        assert_eq!(loaded.epsilon(), AgentConfig::default().epsilon_min);
    }

    #[test]
    fn test_load_or_fresh_falls_back() {
        let agent = app()
            .load_or_fresh(Color::Red, AgentConfig::default(), Path::new("missing"))
            .unwrap();
        assert!(agent.q_table().is_empty());
    }

    #[test]
    fn test_load_rejects_other_colors_table() {
        let app = app();
        let red = app.create_agent(Color::Red, AgentConfig::default()).unwrap();
        app.save_agent(&red, Path::new("q"), TrainingMetadata::default())
            .unwrap();
        let result = app.load_agent(Color::Black, AgentConfig::default(), Path::new("q"));
        assert!(matches!(result, Err(Error::ColorMismatch { .. })));
    }
}
