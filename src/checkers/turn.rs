//! One full turn: opening action plus any capture chain
//!
//! Human play, AI play and self-play training all go through
//! [`apply_full_turn`], so the chaining rule lives in exactly one place: a
//! turn stays with the same piece while its last step captured something and
//! that piece can capture again from where it landed.

use super::{board::Board, piece::Piece};
use crate::{
    Error, Result,
    ports::TurnPolicy,
    types::{Action, Color, Square},
};

/// What happened during one turn.
///
/// Only [`apply_full_turn`] builds one, so every outcome has an opening
/// action.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    color: Color,
    opening: Action,
    chain: Vec<Action>,
    captured: Vec<Piece>,
    winner: Option<Color>,
}

impl TurnOutcome {
    /// Side that moved
    pub fn color(&self) -> Color {
        self.color
    }

    /// Single-step actions in the order played; the first opened the turn.
    pub fn actions(&self) -> Vec<Action> {
        std::iter::once(self.opening)
            .chain(self.chain.iter().copied())
            .collect()
    }

    /// Number of single-step actions, opening included.
    pub fn steps(&self) -> usize {
        1 + self.chain.len()
    }

    /// The action that opened the turn; chained jumps are folded into it.
    pub fn initiating_action(&self) -> Action {
        self.opening
    }

    /// Where the moving piece ended up.
    pub fn final_square(&self) -> Square {
        self.chain.last().unwrap_or(&self.opening).to
    }

    /// Every piece captured during the turn, chain included.
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// Winner, if the turn ended the game
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }
}

/// Play a complete turn for `color`.
///
/// The policy's opening action is checked against the mandatory-capture
/// filtered action space, applied, and then, for as long as the last step
/// captured and the moved piece can capture again, the policy is asked for
/// a continuation. Terminal status is recomputed after every step, so a
/// chain that wipes out the opponent stops at once.
///
/// # Errors
///
/// * [`Error::GameOver`] if the board is already terminal
/// * [`Error::IllegalAction`] if the policy picks an action outside the
///   legal set (the board is left untouched for the opening action)
/// * any error the policy itself returns
pub fn apply_full_turn<P: TurnPolicy + ?Sized>(
    board: &mut Board,
    color: Color,
    policy: &mut P,
) -> Result<TurnOutcome> {
    if board.check_winner().is_some() {
        return Err(Error::GameOver);
    }

    let legal = board.legal_actions(color);
    if legal.is_empty() {
        return Err(Error::NoActionsAvailable {
            color,
            state: board.encode_state().to_string(),
        });
    }

    let opening = policy.select_action(board, color)?;
    if !legal.contains(&opening) {
        return Err(Error::IllegalAction {
            action: opening,
            color,
        });
    }

    let mut last_captured = board.apply_move(opening.from, opening.to)?;
    let mut outcome = TurnOutcome {
        color,
        opening,
        chain: Vec::new(),
        captured: last_captured.clone(),
        winner: board.check_winner(),
    };

    let mut square = opening.to;
    while outcome.winner.is_none() && !last_captured.is_empty() {
        let continuations = board.capture_moves(square);
        if continuations.is_empty() {
            break;
        }
        let Some(next) = policy.select_continuation(board, square)? else {
            break;
        };
        if !continuations.iter().any(|mv| mv.action() == next) {
            return Err(Error::IllegalAction {
                action: next,
                color,
            });
        }

        last_captured = board.apply_move(next.from, next.to)?;
        outcome.chain.push(next);
        outcome.captured.extend(last_captured.iter().copied());
        outcome.winner = board.check_winner();
        square = next.to;
    }

    tracing::trace!(
        %color,
        steps = outcome.steps(),
        captured = outcome.captured.len(),
        "turn applied"
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays a fixed script of actions.
    struct Scripted {
        opening: Action,
        chain: Vec<Action>,
    }

    impl TurnPolicy for Scripted {
        fn select_action(&mut self, _board: &Board, _color: Color) -> Result<Action> {
            Ok(self.opening)
        }

        fn select_continuation(&mut self, _board: &Board, _piece: Square) -> Result<Option<Action>> {
            Ok(if self.chain.is_empty() {
                None
            } else {
                Some(self.chain.remove(0))
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn action(s: &str) -> Action {
        s.parse().unwrap()
    }

    #[test]
    fn test_double_jump_stays_with_piece() {
        let mut board = Board::from_diagram(&[
            "........",
            "........",
            "...b....",
            "........",
            ".b......",
            "r.......",
            "........",
            "......b.",
        ])
        .unwrap();
        let mut policy = Scripted {
            opening: action("5,0->3,2"),
            chain: vec![action("3,2->1,4")],
        };

        let outcome = apply_full_turn(&mut board, Color::Red, &mut policy).unwrap();
        assert_eq!(outcome.steps(), 2);
        assert_eq!(outcome.captured_count(), 2);
        assert_eq!(outcome.final_square(), Square::new(1, 4));
        assert_eq!(outcome.initiating_action(), action("5,0->3,2"));
        assert!(board.piece_at(Square::new(1, 4)).is_some());
    }

    #[test]
    fn test_single_slide_outcome() {
        let mut board = Board::new();
        let mut policy = Scripted {
            opening: action("5,0->4,1"),
            chain: Vec::new(),
        };
        let outcome = apply_full_turn(&mut board, Color::Red, &mut policy).unwrap();
        assert_eq!(outcome.steps(), 1);
        assert_eq!(outcome.actions(), vec![action("5,0->4,1")]);
        assert_eq!(outcome.initiating_action(), action("5,0->4,1"));
        assert_eq!(outcome.final_square(), Square::new(4, 1));
        assert!(outcome.captured().is_empty());
        assert_eq!(outcome.winner(), None);
    }

    #[test]
    fn test_illegal_opening_is_rejected_without_mutation() {
        let mut board = Board::new();
        let before = board.clone();
        let mut policy = Scripted {
            opening: action("5,0->3,2"),
            chain: Vec::new(),
        };
        let result = apply_full_turn(&mut board, Color::Red, &mut policy);
        assert!(matches!(result, Err(Error::IllegalAction { .. })));
        assert_eq!(board, before);
    }

    #[test]
    fn test_slide_ignored_when_capture_available() {
        let mut board = Board::from_diagram(&[
            "........",
            "........",
            "........",
            "........",
            ".b......",
            "r.....r.",
            "........",
            "......b.",
        ])
        .unwrap();
        let mut policy = Scripted {
            opening: action("5,6->4,7"),
            chain: Vec::new(),
        };
        let result = apply_full_turn(&mut board, Color::Red, &mut policy);
        assert!(matches!(result, Err(Error::IllegalAction { .. })));
    }

    #[test]
    fn test_terminal_board_refuses_turn() {
        let mut board = Board::from_diagram(&["....", "..b.", "....", "...."]).unwrap();
        let mut policy = Scripted {
            opening: action("1,2->2,1"),
            chain: Vec::new(),
        };
        let result = apply_full_turn(&mut board, Color::Black, &mut policy);
        assert!(matches!(result, Err(Error::GameOver)));
    }
}
