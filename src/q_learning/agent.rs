//! Tabular Q-learning agent
//!
//! One agent plays one color and owns its table exclusively. Its action
//! space comes straight from the rules engine with mandatory capture
//! applied, so it can never pick a slide while a jump is available.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    q_table::QTable,
    serialization::{SavedAgent, TrainingMetadata},
};
use crate::{
    Error, Result,
    adapters::ExtensionRepository,
    app::AgentConfig,
    checkers::Board,
    ports::{CheckpointRepository, TurnPolicy},
    types::{Action, Color, Square, StateKey},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Uniform pick from a slice; `None` only when the slice is empty.
fn pick(rng: &mut StdRng, items: &[Action]) -> Option<Action> {
    if items.is_empty() {
        None
    } else {
        Some(items[rng.random_range(0..items.len())])
    }
}

/// Q-learning agent (off-policy TD control) for one side of the board
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    color: Color,
    q_table: QTable,
    config: AgentConfig,
    epsilon: f64,
    rng: StdRng,
    name: String,
}

impl QLearningAgent {
    /// Create an agent with an empty table.
    ///
    /// The RNG is seeded from `config.seed` when present.
    pub fn new(color: Color, config: AgentConfig) -> Self {
        Self {
            color,
            q_table: QTable::new(),
            config,
            epsilon: config.epsilon,
            rng: build_rng(config.seed),
            name: format!("Q-Learning ({color})"),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Current exploration probability
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Override the exploration probability, e.g. from a difficulty setting.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// State identifier for a board
    pub fn state_key(&self, board: &Board) -> StateKey {
        board.encode_state()
    }

    /// Every action this agent may take, captures only when one exists.
    pub fn available_actions(&self, board: &Board) -> Vec<Action> {
        board.legal_actions(self.color)
    }

    /// ε-greedy choice from the full action space.
    ///
    /// Unseen (state, action) pairs are recorded at 0.0 before comparing, and
    /// ties between maximal values are broken uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActionsAvailable`] when the action space is empty;
    /// callers normally detect the terminal state before this can happen.
    pub fn choose_action(&mut self, board: &Board) -> Result<Action> {
        let state = self.state_key(board);
        let actions = self.available_actions(board);
        self.select_epsilon_greedy(&state, &actions)
            .ok_or_else(|| Error::NoActionsAvailable {
                color: self.color,
                state: state.to_string(),
            })
    }

    /// ε-greedy choice restricted to captures by the piece on `piece`.
    ///
    /// Used mid-chain. Returns `None` when that piece has no further capture,
    /// which ends the chain.
    pub fn choose_piece_action(&mut self, board: &Board, piece: Square) -> Option<Action> {
        let owned = board
            .piece_at(piece)
            .is_some_and(|p| p.color() == self.color);
        if !owned {
            return None;
        }
        let state = self.state_key(board);
        let actions: Vec<Action> = board
            .capture_moves(piece)
            .iter()
            .map(|mv| mv.action())
            .collect();
        self.select_epsilon_greedy(&state, &actions)
    }

    fn select_epsilon_greedy(&mut self, state: &StateKey, actions: &[Action]) -> Option<Action> {
        if actions.is_empty() {
            return None;
        }
        self.q_table.ensure_actions(state, actions);

        if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            pick(&mut self.rng, actions)
        } else {
            // Exploit: random among the maximisers
            let best = self.q_table.best_actions(state, actions);
            pick(&mut self.rng, &best).or_else(|| pick(&mut self.rng, actions))
        }
    }

    /// Apply one Bellman update and, at episode end, decay ε.
    ///
    /// The bootstrap term is the best value recorded for `new_state`, or 0
    /// when `done` or when nothing is recorded there yet. Returns the updated
    /// value.
    pub fn learn(
        &mut self,
        old_state: &StateKey,
        action: Action,
        reward: f64,
        new_state: &StateKey,
        done: bool,
    ) -> f64 {
        let updated = self.q_table.q_learning_update(
            old_state,
            action,
            reward,
            new_state,
            done,
            self.config.alpha,
            self.config.gamma,
        );

        if done && self.epsilon > self.config.epsilon_min {
            self.decay_epsilon();
        }

        updated
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);
    }

    /// Package the table and settings as a checkpoint.
    pub fn to_saved(&self, metadata: TrainingMetadata) -> SavedAgent {
        SavedAgent::new(self.color, self.q_table.clone(), self.config, metadata)
    }

    /// Replace the table with a checkpoint's and drop ε to its floor.
    ///
    /// # Errors
    ///
    /// Rejects unsupported versions and checkpoints for the other color.
    pub fn restore(&mut self, saved: SavedAgent) -> Result<()> {
        saved.check_version()?;
        if saved.color != self.color {
            return Err(Error::ColorMismatch {
                expected: self.color,
                found: saved.color,
            });
        }
        self.q_table = saved.q_table;
        self.epsilon = self.config.epsilon_min;
        Ok(())
    }

    /// Save the table, picking the format from the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_with(&ExtensionRepository, path.as_ref(), TrainingMetadata::now())
    }

    pub fn save_with(
        &self,
        repository: &dyn CheckpointRepository,
        path: &Path,
        metadata: TrainingMetadata,
    ) -> Result<()> {
        repository.save(&self.to_saved(metadata), path)
    }

    /// Load a table, picking the format from the file extension.
    ///
    /// The whole table is replaced and ε is reset to `epsilon_min`; set it
    /// again afterwards for a different play strength.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.load_with(&ExtensionRepository, path.as_ref())
    }

    pub fn load_with(&mut self, repository: &dyn CheckpointRepository, path: &Path) -> Result<()> {
        let saved = repository.load(path)?;
        self.restore(saved)
    }
}

impl TurnPolicy for QLearningAgent {
    fn select_action(&mut self, board: &Board, color: Color) -> Result<Action> {
        if color != self.color {
            return Err(Error::InvalidConfiguration {
                message: format!("{} agent asked to move for {color}", self.color),
            });
        }
        self.choose_action(board)
    }

    fn select_continuation(&mut self, board: &Board, piece: Square) -> Result<Option<Action>> {
        Ok(self.choose_piece_action(board, piece))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        Ok(())
    }
}
