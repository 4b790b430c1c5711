//! Piece value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Color, Square, Symbol};

/// A checkers piece: a man or, once promoted, a king.
///
/// The board owns every piece and keeps `square` in step with the cell the
/// piece occupies, so the position is only mutable from inside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    square: Square,
    color: Color,
    king: bool,
}

impl Piece {
    /// Create an unpromoted piece
    pub fn man(color: Color, square: Square) -> Self {
        Self {
            square,
            color,
            king: false,
        }
    }

    /// Create a king
    pub fn king(color: Color, square: Square) -> Self {
        Self {
            square,
            color,
            king: true,
        }
    }

    pub fn square(&self) -> Square {
        self.square
    }

    pub fn row(&self) -> usize {
        self.square.row
    }

    pub fn col(&self) -> usize {
        self.square.col
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_king(&self) -> bool {
        self.king
    }

    /// Promote this piece to a king.
    pub fn make_king(&mut self) {
        self.king = true;
    }

    pub(crate) fn relocate(&mut self, square: Square) {
        self.square = square;
    }

    /// Diagonal step directions available to this piece.
    pub fn directions(&self) -> &'static [(isize, isize)] {
        const ALL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
        const RED_MAN: [(isize, isize); 2] = [(-1, -1), (-1, 1)];
        const BLACK_MAN: [(isize, isize); 2] = [(1, -1), (1, 1)];

        match (self.king, self.color) {
            (true, _) => &ALL,
            (false, Color::Red) => &RED_MAN,
            (false, Color::Black) => &BLACK_MAN,
        }
    }

    pub fn symbol(&self) -> Symbol {
        match (self.color, self.king) {
            (Color::Red, false) => Symbol::RedMan,
            (Color::Red, true) => Symbol::RedKing,
            (Color::Black, false) => Symbol::BlackMan,
            (Color::Black, true) => Symbol::BlackKing,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = if self.king { "king" } else { "man" };
        write!(f, "{} {} at ({})", self.color, rank, self.square)
    }
}
