//! Error types for the checkers crate

use thiserror::Error;

use crate::types::{Action, Color, Square};

/// Main error type for the checkers crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("square {square} is outside the {rows}x{cols} board")]
    OutOfBounds {
        square: Square,
        rows: usize,
        cols: usize,
    },

    #[error("no piece at {square}")]
    EmptySquare { square: Square },

    #[error("destination {square} is already occupied")]
    OccupiedSquare { square: Square },

    #[error("illegal action {action} for {color}")]
    IllegalAction { action: Action, color: Color },

    #[error("game already over")]
    GameOver,

    #[error("move input closed before a move was chosen")]
    InputClosed,

    #[error("{color} has no available actions in state '{state}'")]
    NoActionsAvailable { color: Color, state: String },

    #[error("invalid action string '{input}' (expected format: 'sr,sc->dr,dc')")]
    InvalidActionString { input: String },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("board string has wrong length: expected {expected} cells, got {got}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid board dimensions {rows}x{cols}: {reason}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        reason: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("unsupported checkpoint version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("checkpoint holds a {found} table but the agent plays {expected}")]
    ColorMismatch { expected: Color, found: Color },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
