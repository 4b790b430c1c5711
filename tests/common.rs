//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use checkers_rl::{
    adapters::RandomPolicy,
    checkers::{Board, GameSession},
    types::{Action, Square},
};

pub fn sq(row: usize, col: usize) -> Square {
    Square::new(row, col)
}

pub fn action(text: &str) -> Action {
    text.parse().expect("valid action string")
}

pub fn diagram(rows: &[&str]) -> Board {
    Board::from_diagram(rows).expect("valid board diagram")
}

/// Board positions visited by a seeded random game, first to last.
///
/// Stops after `max_turns` or when the game ends.
pub fn random_game_positions(seed: u64, max_turns: usize) -> Vec<Board> {
    let mut session = GameSession::new();
    let mut policy = RandomPolicy::new("random").with_seed(seed);
    let mut positions = vec![session.board().clone()];
    while !session.is_over() && session.turns_played() < max_turns {
        session.play_turn(&mut policy).expect("random play is legal");
        positions.push(session.board().clone());
    }
    positions
}
