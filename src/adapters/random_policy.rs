//! Uniform random mover, used as an evaluation baseline and in tests.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Error, Result,
    checkers::Board,
    ports::TurnPolicy,
    types::{Action, Color, Square},
};

/// Picks uniformly among legal actions and always continues a chain.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    name: String,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl TurnPolicy for RandomPolicy {
    fn select_action(&mut self, board: &Board, color: Color) -> Result<Action> {
        let actions = board.legal_actions(color);
        if actions.is_empty() {
            return Err(Error::NoActionsAvailable {
                color,
                state: board.encode_state().to_string(),
            });
        }
        Ok(actions[self.rng.random_range(0..actions.len())])
    }

    fn select_continuation(&mut self, board: &Board, piece: Square) -> Result<Option<Action>> {
        let captures = board.capture_moves(piece);
        if captures.is_empty() {
            return Ok(None);
        }
        Ok(Some(captures[self.rng.random_range(0..captures.len())].action()))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_only_legal_actions() {
        let board = Board::new();
        let legal = board.legal_actions(Color::Red);
        let mut policy = RandomPolicy::new("random").with_seed(11);
        for _ in 0..20 {
            assert!(legal.contains(&policy.select_action(&board, Color::Red).unwrap()));
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let board = Board::new();
        let mut a = RandomPolicy::new("a").with_seed(5);
        let mut b = RandomPolicy::new("b").with_seed(5);
        for _ in 0..10 {
            assert_eq!(
                a.select_action(&board, Color::Black).unwrap(),
                b.select_action(&board, Color::Black).unwrap()
            );
        }
    }
}
