//! Checkers rules engine
//!
//! - [`Piece`] - men and kings
//! - [`Board`] - legal-move generation, move application, promotion,
//!   terminal detection and state encoding
//! - [`apply_full_turn`] - the single turn state machine used by every mover
//! - [`GameSession`] - explicit context for an interactive game

pub mod board;
pub mod piece;
pub mod session;
pub mod turn;

pub use board::{Board, Move, STANDARD_SIZE};
pub use piece::Piece;
pub use session::{GameSession, PlayMode};
pub use turn::{TurnOutcome, apply_full_turn};
