//! CLI infrastructure for the checkers trainer
//!
//! This module provides the command-line interface for self-play training,
//! interactive play, and evaluation of saved Q-tables.

pub mod commands;
pub mod output;
