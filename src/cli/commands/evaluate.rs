//! Evaluate command - Greedy play of a trained table against random moves

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    adapters::RandomPolicy,
    app::{AgentConfig, App},
    checkers::GameSession,
    cli::output::{format_number, format_percent, print_kv, print_section, print_subsection},
    ports::TurnPolicy,
    q_learning::QLearningAgent,
    types::Color,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained Q-table against a random opponent")]
pub struct EvaluateArgs {
    /// Path to a q_red / q_black checkpoint
    pub checkpoint: PathBuf,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Side the checkpoint was trained for
    #[arg(long, default_value = "red")]
    pub color: Color,

    /// Turn cap per game; unfinished games count as neither win nor loss
    #[arg(long, default_value_t = 500)]
    pub max_turns: usize,
}

/// Tally of an evaluation run, from the agent's point of view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub unfinished: usize,
}

impl EvaluationResult {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// Play `games` games of `agent` against a uniform random mover.
///
/// The agent keeps whatever ε it currently has.
pub fn evaluate_against_random(
    agent: &mut QLearningAgent,
    games: usize,
    max_turns: usize,
    seed: Option<u64>,
) -> crate::Result<EvaluationResult> {
    let color = agent.color();
    let mut opponent = RandomPolicy::new("random");
    if let Some(seed) = seed {
        agent.set_rng_seed(seed)?;
        opponent.set_rng_seed(seed.wrapping_add(1))?;
    }

    let mut result = EvaluationResult {
        games,
        ..EvaluationResult::default()
    };
    for _ in 0..games {
        let mut session = GameSession::new();
        while !session.is_over() && session.turns_played() < max_turns {
            if session.to_move() == color {
                session.play_turn(agent)?;
            } else {
                session.play_turn(&mut opponent)?;
            }
        }
        match session.winner() {
            Some(winner) if winner == color => result.wins += 1,
            Some(_) => result.losses += 1,
            None => result.unfinished += 1,
        }
    }
    Ok(result)
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let app = App::new();

    let saved = app
        .checkpoint_repository()
        .load(&args.checkpoint)
        .with_context(|| format!("failed to load {}", args.checkpoint.display()))?;

    print_section("Checkers Q-Learning Evaluation");
    print_kv("Checkpoint", &args.checkpoint.display().to_string());
    print_kv("Color", saved.color.as_str());
    if let Some(episodes) = saved.metadata.episodes_trained {
        print_kv("Episodes trained", &format_number(episodes));
    }
    if let Some(saved_at) = &saved.metadata.saved_at {
        print_kv("Saved at", saved_at);
    }
    print_kv("States", &format_number(saved.q_table.state_count()));
    print_kv("Table entries", &format_number(saved.q_table.size()));

    let mut agent = app.create_agent(args.color, AgentConfig::default())?;
    agent
        .restore(saved)
        .with_context(|| format!("checkpoint does not fit a {} agent", args.color))?;
    agent.set_epsilon(0.0);

    let result = evaluate_against_random(&mut agent, args.games, args.max_turns, args.seed)?;

    print_subsection("Against random");
    print_kv("Games", &format_number(result.games));
    print_kv(
        "Wins",
        &format!(
            "{} ({})",
            format_number(result.wins),
            format_percent(result.win_rate())
        ),
    );
    print_kv("Losses", &format_number(result.losses));
    print_kv("Unfinished", &format_number(result.unfinished));

    Ok(())
}
