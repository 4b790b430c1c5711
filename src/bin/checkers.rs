//! Checkers CLI - Q-learning self-play, interactive play and evaluation
//!
//! This CLI provides a unified interface for:
//! - Training red and black agents against each other
//! - Playing against a trained agent, another human, or watching two agents
//! - Evaluating a saved Q-table against random play

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "checkers")]
#[command(version, about = "Tabular Q-learning for checkers", long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train both colors by self-play and save their Q-tables
    Train(checkers_rl::cli::commands::train::TrainArgs),

    /// Play a game in the terminal
    Play(checkers_rl::cli::commands::play::PlayArgs),

    /// Evaluate a saved Q-table against random play
    Evaluate(checkers_rl::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("checkers_rl={default_level}")));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Train(args) => checkers_rl::cli::commands::train::execute(args),
        Commands::Play(args) => checkers_rl::cli::commands::play::execute(args),
        Commands::Evaluate(args) => checkers_rl::cli::commands::evaluate::execute(args),
    }
}
