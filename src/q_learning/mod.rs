//! Tabular Q-learning for checkers
//!
//! Each side is played by its own [`QLearningAgent`] holding a sparse
//! [`QTable`] keyed by encoded board state and action. Updates follow the
//! one-step Q-learning rule:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! where the maximum ranges over actions previously recorded for `s'`.
//!
//! ## Usage Example
//!
//! ```no_run
//! use checkers_rl::app::AgentConfig;
//! use checkers_rl::checkers::Board;
//! use checkers_rl::q_learning::QLearningAgent;
//! use checkers_rl::types::Color;
//!
//! let mut agent = QLearningAgent::new(Color::Red, AgentConfig::default().with_seed(7));
//! let board = Board::new();
//! let action = agent.choose_action(&board)?;
//! println!("red plays {action}");
//! agent.save("q_red.msgpack")?;
//! # Ok::<(), checkers_rl::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

pub use agent::QLearningAgent;
pub use q_table::QTable;
pub use serialization::{SavedAgent, TrainingMetadata};
