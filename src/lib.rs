//! Checkers with tabular Q-learning
//!
//! This crate provides:
//! - A checkers rules engine with mandatory capture, capture chains,
//!   promotion and stalemate-as-loss terminal detection
//! - A tabular Q-learning agent per color with ε-greedy play
//! - A self-play trainer with pluggable observers
//! - Versioned MessagePack/JSON checkpoints of the learned tables
//! - A command-line front end for training, play and evaluation

pub mod adapters;
pub mod app;
pub mod checkers;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
