//! Interactive game session
//!
//! A `GameSession` holds everything the play loop needs between turns (the
//! board, the side to move, the winner) so that nothing lives in process-wide
//! state. The driver owns the session and passes it the policy for the side
//! to move.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{
    board::Board,
    turn::{TurnOutcome, apply_full_turn},
};
use crate::{Error, Result, ports::TurnPolicy, types::Color};

/// Who controls each side in a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayMode {
    /// A human plays one side, a trained agent the other
    HumanVsAi,
    /// Two humans share the terminal
    HumanVsHuman,
    /// Two trained agents play each other
    AiVsAi,
}

impl PlayMode {
    /// Whether `color` is human-controlled, given which side the human took
    /// in [`PlayMode::HumanVsAi`].
    pub fn is_human(self, color: Color, human_color: Color) -> bool {
        match self {
            PlayMode::HumanVsAi => color == human_color,
            PlayMode::HumanVsHuman => true,
            PlayMode::AiVsAi => false,
        }
    }
}

/// State of one game in progress. Red always opens.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    to_move: Color,
    winner: Option<Color>,
    history: Vec<TurnOutcome>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Start a game from the standard layout.
    pub fn new() -> Self {
        Self::from_position(Board::new(), Color::Red)
    }

    /// Start a game from an arbitrary position.
    pub fn from_position(board: Board, to_move: Color) -> Self {
        let winner = board.check_winner();
        Self {
            board,
            to_move,
            winner,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Completed turns, oldest first.
    pub fn history(&self) -> &[TurnOutcome] {
        &self.history
    }

    pub fn turns_played(&self) -> usize {
        self.history.len()
    }

    /// Play one full turn for the side to move with the given policy.
    ///
    /// The turn passes to the opponent unless the game ended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GameOver`] once a winner exists, and propagates
    /// illegal-action and policy errors from [`apply_full_turn`]. On error
    /// the side to move does not change.
    pub fn play_turn<P: TurnPolicy + ?Sized>(&mut self, policy: &mut P) -> Result<&TurnOutcome> {
        if self.winner.is_some() {
            return Err(Error::GameOver);
        }

        let outcome = apply_full_turn(&mut self.board, self.to_move, policy)?;
        self.winner = outcome.winner();
        if self.winner.is_none() {
            self.to_move = self.to_move.opponent();
        }
        self.history.push(outcome);

        Ok(&self.history[self.history.len() - 1])
    }

    /// Throw the current game away and start over from the standard layout.
    pub fn restart(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RandomPolicy;

    #[test]
    fn test_turns_alternate() {
        let mut session = GameSession::new();
        let mut policy = RandomPolicy::new("random").with_seed(3);
        assert_eq!(session.to_move(), Color::Red);
        session.play_turn(&mut policy).unwrap();
        assert_eq!(session.to_move(), Color::Black);
        session.play_turn(&mut policy).unwrap();
        assert_eq!(session.to_move(), Color::Red);
        assert_eq!(session.turns_played(), 2);

        let movers: Vec<Color> = session.history().iter().map(TurnOutcome::color).collect();
        assert_eq!(movers, vec![Color::Red, Color::Black]);
    }

    #[test]
    fn test_finished_session_refuses_turns() {
        let board = Board::from_diagram(&["....", "..b.", "....", "...."]).unwrap();
        let mut session = GameSession::from_position(board, Color::Black);
        assert_eq!(session.winner(), Some(Color::Black));
        let mut policy = RandomPolicy::new("random");
        assert!(matches!(
            session.play_turn(&mut policy),
            Err(Error::GameOver)
        ));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = GameSession::new();
        let mut policy = RandomPolicy::new("random").with_seed(9);
        session.play_turn(&mut policy).unwrap();
        session.restart();
        assert_eq!(session.turns_played(), 0);
        assert_eq!(session.to_move(), Color::Red);
        assert_eq!(session.board(), &Board::new());
    }

    #[test]
    fn test_human_seating() {
        assert!(PlayMode::HumanVsAi.is_human(Color::Red, Color::Red));
        assert!(!PlayMode::HumanVsAi.is_human(Color::Black, Color::Red));
        assert!(PlayMode::HumanVsHuman.is_human(Color::Black, Color::Red));
        assert!(!PlayMode::AiVsAi.is_human(Color::Red, Color::Red));
    }
}
