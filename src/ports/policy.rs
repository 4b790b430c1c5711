//! Turn policy port - abstraction over whatever chooses moves
//!
//! Every mover (learning agent, random baseline, human at the terminal) is
//! driven through the same [`crate::checkers::apply_full_turn`] state
//! machine, which asks a `TurnPolicy` for the opening action of a turn and
//! then for each capture-chain continuation.

use crate::{
    Result,
    checkers::Board,
    types::{Action, Color, Square},
};

/// Action-selection strategy for one side of the board.
///
/// # Examples
///
/// ```no_run
/// use checkers_rl::{
///     checkers::{Board, apply_full_turn},
///     ports::TurnPolicy,
///     types::Color,
/// };
///
/// fn play_one<P: TurnPolicy>(policy: &mut P) -> checkers_rl::Result<()> {
///     let mut board = Board::new();
///     let outcome = apply_full_turn(&mut board, Color::Red, policy)?;
///     println!("{} played {:?}", policy.name(), outcome.actions());
///     Ok(())
/// }
/// ```
pub trait TurnPolicy {
    /// Choose the action that opens a turn for `color`.
    ///
    /// The returned action must belong to `board.legal_actions(color)`; the
    /// turn driver rejects anything else.
    ///
    /// # Errors
    ///
    /// Returns an error if no action can be chosen, e.g. the action space is
    /// empty or the input source is closed.
    fn select_action(&mut self, board: &Board, color: Color) -> Result<Action>;

    /// Choose the next jump of a capture chain for the piece on `piece`.
    ///
    /// Returning `None` ends the chain. Implementations should only do so
    /// when the piece has no further capture.
    fn select_continuation(&mut self, board: &Board, piece: Square) -> Result<Option<Action>>;

    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Seed the policy's internal random number generator.
    ///
    /// Stateless or deterministic policies can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}

impl<P: TurnPolicy + ?Sized> TurnPolicy for Box<P> {
    fn select_action(&mut self, board: &Board, color: Color) -> Result<Action> {
        (**self).select_action(board, color)
    }

    fn select_continuation(&mut self, board: &Board, piece: Square) -> Result<Option<Action>> {
        (**self).select_continuation(board, piece)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        (**self).set_rng_seed(seed)
    }
}
