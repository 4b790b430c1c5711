//! Board state and the rules engine
//!
//! The engine looks exactly one ply ahead: `legal_moves` reports single
//! slides and single jumps. Multi-jump continuation is driven by the caller
//! (see [`super::turn::apply_full_turn`]) through repeated calls after each
//! jump. The mandatory-capture rule is likewise applied by callers, through
//! [`Board::legal_actions`].

use std::fmt;

use super::piece::Piece;
use crate::{
    Error, Result,
    types::{Action, Color, Square, StateKey, Symbol},
};

/// Standard board size
pub const STANDARD_SIZE: usize = 8;

/// Rows of men each side starts with
const STARTING_ROWS: usize = 3;

/// A move produced by the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// The jumped cell, for capturing moves
    pub captured: Option<Square>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Captured cells in jump order (zero or one for a single-step move)
    pub fn captures(&self) -> &[Square] {
        self.captured.as_slice()
    }

    pub fn action(&self) -> Action {
        Action::new(self.from, self.to)
    }
}

/// An R×C checkers board.
///
/// Invariants: pieces sit only on dark squares, at most one per cell, and a
/// piece's stored square always equals the cell holding it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    grid: Vec<Option<Piece>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a standard 8×8 board in the starting layout.
    pub fn new() -> Self {
        let mut board = Self::blank(STANDARD_SIZE, STANDARD_SIZE);
        board.set_up_pieces();
        board
    }

    /// Create a board of the given size in the starting layout.
    ///
    /// Black men fill the dark squares of the first three rows, Red men the
    /// last three; the rows in between start empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] unless there is at least one empty
    /// row between the two armies and at least two columns.
    pub fn with_size(rows: usize, cols: usize) -> Result<Self> {
        if rows < 2 * STARTING_ROWS + 1 || cols < 2 {
            return Err(Error::InvalidDimensions {
                rows,
                cols,
                reason: format!(
                    "need at least {} rows and 2 columns",
                    2 * STARTING_ROWS + 1
                ),
            });
        }
        let mut board = Self::blank(rows, cols);
        board.set_up_pieces();
        Ok(board)
    }

    /// Create a board with no pieces.
    pub fn empty(rows: usize, cols: usize) -> Result<Self> {
        if rows < 2 || cols < 2 {
            return Err(Error::InvalidDimensions {
                rows,
                cols,
                reason: "need at least 2 rows and 2 columns".to_string(),
            });
        }
        Ok(Self::blank(rows, cols))
    }

    fn blank(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            grid: vec![None; rows * cols],
        }
    }

    fn set_up_pieces(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let square = Square::new(row, col);
                if !square.is_dark() {
                    continue;
                }
                let color = if row < STARTING_ROWS {
                    Color::Black
                } else if row >= self.rows - STARTING_ROWS {
                    Color::Red
                } else {
                    continue;
                };
                let idx = self.index(square);
                self.grid[idx] = Some(Piece::man(color, square));
            }
        }
    }

    /// Build a board from one string per row using the state-key symbols.
    ///
    /// Whitespace inside a row is ignored, so diagrams can be spaced out:
    ///
    /// ```
    /// use checkers_rl::checkers::Board;
    ///
    /// let board = Board::from_diagram(&[
    ///     ". b . .",
    ///     ". . . .",
    ///     ". r . .",
    ///     "r . . .",
    /// ])?;
    /// assert_eq!(board.rows(), 4);
    /// # Ok::<(), checkers_rl::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error for ragged rows, unknown symbols, or pieces on light
    /// squares.
    pub fn from_diagram(rows: &[&str]) -> Result<Self> {
        let cleaned: Vec<String> = rows
            .iter()
            .map(|row| row.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();
        let cols = cleaned.first().map_or(0, |row| row.chars().count());
        let mut key = String::with_capacity(cleaned.len() * cols);
        for row in &cleaned {
            let got = row.chars().count();
            if got != cols {
                return Err(Error::InvalidBoardLength {
                    expected: cols,
                    got,
                });
            }
            key.push_str(row);
        }
        let key: StateKey = key.parse()?;
        Self::from_state_key(cleaned.len(), cols, &key)
    }

    /// Rebuild a board from its state key.
    pub fn from_state_key(rows: usize, cols: usize, key: &StateKey) -> Result<Self> {
        let mut board = Self::empty(rows, cols)?;
        if key.len() != rows * cols {
            return Err(Error::InvalidBoardLength {
                expected: rows * cols,
                got: key.len(),
            });
        }
        for (idx, &symbol) in key.symbols().iter().enumerate() {
            let Some(color) = symbol.color() else {
                continue;
            };
            let square = Square::new(idx / cols, idx % cols);
            let piece = if symbol.is_king() {
                Piece::king(color, square)
            } else {
                Piece::man(color, square)
            };
            board.place(piece)?;
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, square: Square) -> usize {
        square.row * self.cols + square.col
    }

    pub fn in_bounds(&self, square: Square) -> bool {
        square.row < self.rows && square.col < self.cols
    }

    fn ensure_in_bounds(&self, square: Square) -> Result<()> {
        if self.in_bounds(square) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                square,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Step from `square` by a direction, staying on the board.
    fn step(&self, square: Square, (d_row, d_col): (isize, isize)) -> Option<Square> {
        square
            .offset(d_row, d_col)
            .filter(|&next| self.in_bounds(next))
    }

    /// Piece occupying a cell, if any. Off-board squares are simply empty.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        if !self.in_bounds(square) {
            return None;
        }
        self.grid[self.index(square)].as_ref()
    }

    /// Put a piece on the board at its own square.
    ///
    /// # Errors
    ///
    /// Rejects off-board or light squares and occupied cells.
    pub fn place(&mut self, piece: Piece) -> Result<()> {
        let square = piece.square();
        self.ensure_in_bounds(square)?;
        if !square.is_dark() {
            return Err(Error::InvalidConfiguration {
                message: format!("pieces may only stand on dark squares, not ({square})"),
            });
        }
        let idx = self.index(square);
        if self.grid[idx].is_some() {
            return Err(Error::OccupiedSquare { square });
        }
        self.grid[idx] = Some(piece);
        Ok(())
    }

    /// Take a piece off the board.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        if !self.in_bounds(square) {
            return None;
        }
        let idx = self.index(square);
        self.grid[idx].take()
    }

    /// All pieces of one color in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.grid
            .iter()
            .flatten()
            .filter(move |piece| piece.color() == color)
    }

    /// Snapshot of all pieces of one color in row-major order.
    pub fn all_pieces(&self, color: Color) -> Vec<Piece> {
        self.pieces(color).copied().collect()
    }

    pub fn piece_count(&self, color: Color) -> usize {
        self.pieces(color).count()
    }

    /// Single-ply moves for the piece on `square`.
    ///
    /// Each direction yields at most one move: a slide onto an empty cell, or
    /// a jump over an adjacent opposing piece onto the empty cell behind it.
    /// An empty square yields no moves.
    pub fn legal_moves(&self, square: Square) -> Vec<Move> {
        let Some(piece) = self.piece_at(square) else {
            return Vec::new();
        };

        let mut moves = Vec::with_capacity(4);
        for &direction in piece.directions() {
            let Some(next) = self.step(square, direction) else {
                continue;
            };
            match self.piece_at(next) {
                None => moves.push(Move {
                    from: square,
                    to: next,
                    captured: None,
                }),
                Some(other) if other.color() != piece.color() => {
                    let landing = self
                        .step(next, direction)
                        .filter(|&landing| self.piece_at(landing).is_none());
                    if let Some(landing) = landing {
                        moves.push(Move {
                            from: square,
                            to: landing,
                            captured: Some(next),
                        });
                    }
                }
                Some(_) => {}
            }
        }
        moves
    }

    /// Capturing moves only, for the piece on `square`.
    pub fn capture_moves(&self, square: Square) -> Vec<Move> {
        self.legal_moves(square)
            .into_iter()
            .filter(Move::is_capture)
            .collect()
    }

    /// True iff some piece of `color` can capture.
    pub fn has_capture(&self, color: Color) -> bool {
        self.pieces(color)
            .any(|piece| self.legal_moves(piece.square()).iter().any(Move::is_capture))
    }

    /// True iff some piece of `color` has any move at all.
    pub fn has_moves(&self, color: Color) -> bool {
        self.pieces(color)
            .any(|piece| !self.legal_moves(piece.square()).is_empty())
    }

    /// The action space for `color` with mandatory capture applied.
    ///
    /// When any capture exists only capturing moves are returned. Order is
    /// deterministic: pieces row-major, then direction order.
    pub fn legal_actions(&self, color: Color) -> Vec<Action> {
        let must_capture = self.has_capture(color);
        self.pieces(color)
            .flat_map(|piece| self.legal_moves(piece.square()))
            .filter(|mv| !must_capture || mv.is_capture())
            .map(|mv| mv.action())
            .collect()
    }

    /// Execute a single slide or jump and return the captured pieces.
    ///
    /// The destination is expected to come from [`Board::legal_moves`]; only
    /// the structural preconditions are checked, and all of them before any
    /// mutation. A two-row displacement removes the midpoint occupant. A man
    /// reaching the far row is promoted in the same call.
    ///
    /// # Errors
    ///
    /// Returns an error if either square is off the board, the origin is
    /// empty, the destination is occupied, or a jump has no opposing piece to
    /// jump over.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<Vec<Piece>> {
        self.ensure_in_bounds(from)?;
        self.ensure_in_bounds(to)?;
        let color = self
            .piece_at(from)
            .map(Piece::color)
            .ok_or(Error::EmptySquare { square: from })?;
        if self.piece_at(to).is_some() {
            return Err(Error::OccupiedSquare { square: to });
        }

        let is_jump = from.row.abs_diff(to.row) == 2 && from.col.abs_diff(to.col) == 2;
        let midpoint = Square::new((from.row + to.row) / 2, (from.col + to.col) / 2);
        if is_jump && self.piece_at(midpoint).map(Piece::color) != Some(color.opponent()) {
            return Err(Error::IllegalAction {
                action: Action::new(from, to),
                color,
            });
        }

        let mut captured = Vec::new();
        if is_jump {
            captured.extend(self.remove(midpoint));
        }

        let from_idx = self.index(from);
        let to_idx = self.index(to);
        if let Some(mut piece) = self.grid[from_idx].take() {
            piece.relocate(to);
            if to.row == color.promotion_row(self.rows) {
                piece.make_king();
            }
            self.grid[to_idx] = Some(piece);
        }

        Ok(captured)
    }

    /// Canonical row-major key of occupancy and rank.
    pub fn encode_state(&self) -> StateKey {
        self.grid
            .iter()
            .map(|cell| cell.as_ref().map_or(Symbol::Empty, Piece::symbol))
            .collect::<Vec<_>>()
            .into()
    }

    /// The winner, if the game is over.
    ///
    /// A side loses when it has no pieces or no legal moves; stalemate is a
    /// loss, never a draw. Red is examined first.
    pub fn check_winner(&self) -> Option<Color> {
        if self.piece_count(Color::Red) == 0 {
            return Some(Color::Black);
        }
        if self.piece_count(Color::Black) == 0 {
            return Some(Color::Red);
        }
        if !self.has_moves(Color::Red) {
            return Some(Color::Black);
        }
        if !self.has_moves(Color::Black) {
            return Some(Color::Red);
        }
        None
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.cols {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for row in 0..self.rows {
            write!(f, "{row:>2} ")?;
            for col in 0..self.cols {
                let square = Square::new(row, col);
                let symbol = match self.piece_at(square) {
                    Some(piece) => piece.symbol().to_char(),
                    None if square.is_dark() => '.',
                    None => ' ',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_layout() {
        let board = Board::new();
        assert_eq!(board.piece_count(Color::Red), 12);
        assert_eq!(board.piece_count(Color::Black), 12);
        for row in 3..5 {
            for col in 0..8 {
                assert!(board.piece_at(Square::new(row, col)).is_none());
            }
        }
        for piece in board.pieces(Color::Black) {
            assert!(piece.row() < 3);
            assert!(piece.square().is_dark());
        }
    }

    #[test]
    fn test_starting_key() {
        let key = Board::new().encode_state().to_string();
        assert_eq!(key.len(), 64);
        assert_eq!(&key[..8], ".b.b.b.b");
        assert_eq!(&key[24..40], "................");
        assert_eq!(&key[56..], "r.r.r.r.");
    }

    #[test]
    fn test_opening_action_space() {
        let board = Board::new();
        // Only the front row can move: 4 pieces, the edge piece has one move.
        assert_eq!(board.legal_actions(Color::Red).len(), 7);
        assert_eq!(board.legal_actions(Color::Black).len(), 7);
        assert!(!board.has_capture(Color::Red));
        assert_eq!(board.check_winner(), None);
    }

    #[test]
    fn test_slide_relocates_piece() {
        let mut board = Board::new();
        let captured = board
            .apply_move(Square::new(5, 0), Square::new(4, 1))
            .unwrap();
        assert!(captured.is_empty());
        assert!(board.piece_at(Square::new(5, 0)).is_none());
        let piece = board.piece_at(Square::new(4, 1)).unwrap();
        assert_eq!(piece.square(), Square::new(4, 1));
        assert_eq!(piece.color(), Color::Red);
    }

    #[test]
    fn test_apply_move_rejects_before_mutation() {
        let mut board = Board::new();
        let before = board.clone();
        assert!(matches!(
            board.apply_move(Square::new(4, 1), Square::new(3, 2)),
            Err(Error::EmptySquare { .. })
        ));
        assert!(matches!(
            board.apply_move(Square::new(6, 1), Square::new(5, 0)),
            Err(Error::OccupiedSquare { .. })
        ));
        assert!(matches!(
            board.apply_move(Square::new(5, 0), Square::new(3, 2)),
            Err(Error::IllegalAction { .. })
        ));
        assert!(matches!(
            board.apply_move(Square::new(7, 0), Square::new(8, 1)),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn test_blocked_by_own_piece() {
        let board = Board::from_diagram(&[
            "........",
            "........",
            "........",
            "........",
            "........",
            "..r.....",
            ".r......",
            "........",
        ])
        .unwrap();
        let moves = board.legal_moves(Square::new(6, 1));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, Square::new(5, 0));
    }

    #[test]
    fn test_jump_blocked_by_occupied_landing() {
        let board = Board::from_diagram(&[
            "........",
            "........",
            "........",
            "....b...",
            "...b....",
            "..r.....",
            "........",
            "........",
        ])
        .unwrap();
        let moves = board.legal_moves(Square::new(5, 2));
        assert_eq!(moves.len(), 1);
        assert!(!moves[0].is_capture());
        assert_eq!(moves[0].to, Square::new(4, 1));
    }

    #[test]
    fn test_stalemate_is_a_loss() {
        // Red's only man is wedged against the top edge by its own direction.
        let board = Board::from_diagram(&[
            ".r......",
            "........",
            "........",
            "........",
            "........",
            "........",
            ".......b",
            "........",
        ])
        .unwrap();
        // Red man on row 0 (not promoted, placed directly) cannot move forward.
        assert!(!board.has_moves(Color::Red));
        assert_eq!(board.check_winner(), Some(Color::Black));
    }

    #[test]
    fn test_no_pieces_is_a_loss() {
        let board = Board::from_diagram(&["....", "..b.", "....", "...."]).unwrap();
        assert_eq!(board.check_winner(), Some(Color::Black));
    }

    #[test]
    fn test_diagram_rejects_light_square() {
        assert!(Board::from_diagram(&["r...", "....", "....", "...."]).is_err());
        assert!(Board::from_diagram(&["....", "...", "....", "...."]).is_err());
    }

    #[test]
    fn test_with_size_generalises_layout() {
        let board = Board::with_size(10, 10).unwrap();
        assert_eq!(board.piece_count(Color::Red), 15);
        assert_eq!(board.piece_count(Color::Black), 15);
        assert!(Board::with_size(6, 8).is_err());

        let smallest = Board::with_size(7, 8).unwrap();
        assert_eq!(smallest.piece_count(Color::Red), 12);
        assert_eq!(smallest.piece_count(Color::Black), 12);
        assert!((0..8).all(|col| smallest.piece_at(Square::new(3, col)).is_none()));
    }

    #[test]
    fn test_display_has_labels() {
        let text = Board::new().to_string();
        assert!(text.starts_with("    0 1 2"));
        assert_eq!(text.lines().count(), 9);
    }
}
