//! Value types shared by the rules engine and the learning agents.
//!
//! Actions and state keys are kept as small structured values internally and
//! only become the canonical `"sr,sc->dr,dc"` / `.rRbB` strings at the
//! serialization boundary.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Side of a piece, and of the player controlling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Red, Color::Black];

    /// Get the opposing color
    pub fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// Row on which a man of this color is promoted.
    pub fn promotion_row(self, rows: usize) -> usize {
        match self {
            Color::Red => 0,
            Color::Black => rows - 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Color::Red),
            "black" | "b" => Ok(Color::Black),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown color '{other}' (expected 'red' or 'black')"),
            }),
        }
    }
}

/// A cell coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step by a signed offset, returning `None` when the result would be negative.
    ///
    /// Upper bounds are checked by the board, which knows its dimensions.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Square> {
        Some(Square {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Dark squares are the only playable ones.
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl From<(usize, usize)> for Square {
    fn from((row, col): (usize, usize)) -> Self {
        Square { row, col }
    }
}

/// A single-step action: one slide or one jump.
///
/// Chained jumps are a sequence of these, each validated on its own, so no
/// captured-path information is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    pub from: Square,
    pub to: Square,
}

impl Action {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// True when the action spans two rows, i.e. it jumps a piece.
    pub fn is_jump(&self) -> bool {
        self.from.row.abs_diff(self.to.row) == 2
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

fn parse_square(part: &str, input: &str) -> Result<Square, Error> {
    let invalid = || Error::InvalidActionString {
        input: input.to_string(),
    };
    let (row, col) = part.split_once(',').ok_or_else(invalid)?;
    let row = row.trim().parse().map_err(|_| invalid())?;
    let col = col.trim().parse().map_err(|_| invalid())?;
    Ok(Square { row, col })
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s.split_once("->").ok_or_else(|| Error::InvalidActionString {
            input: s.to_string(),
        })?;
        Ok(Action {
            from: parse_square(from, s)?,
            to: parse_square(to, s)?,
        })
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Occupancy of one cell as it appears in a state key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Empty,
    RedMan,
    RedKing,
    BlackMan,
    BlackKing,
}

impl Symbol {
    pub fn to_char(self) -> char {
        match self {
            Symbol::Empty => '.',
            Symbol::RedMan => 'r',
            Symbol::RedKing => 'R',
            Symbol::BlackMan => 'b',
            Symbol::BlackKing => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            '.' => Some(Symbol::Empty),
            'r' => Some(Symbol::RedMan),
            'R' => Some(Symbol::RedKing),
            'b' => Some(Symbol::BlackMan),
            'B' => Some(Symbol::BlackKing),
            _ => None,
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Symbol::Empty => None,
            Symbol::RedMan | Symbol::RedKing => Some(Color::Red),
            Symbol::BlackMan | Symbol::BlackKing => Some(Color::Black),
        }
    }

    pub fn is_king(self) -> bool {
        matches!(self, Symbol::RedKing | Symbol::BlackKing)
    }
}

/// Canonical row-major encoding of board occupancy and rank.
///
/// Two boards with identical placement and rank always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Box<[Symbol]>);

impl StateKey {
    pub fn new(symbols: impl Into<Box<[Symbol]>>) -> Self {
        Self(symbols.into())
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Symbol>> for StateKey {
    fn from(symbols: Vec<Symbol>) -> Self {
        StateKey(symbols.into_boxed_slice())
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for symbol in self.0.iter() {
            f.write_char(symbol.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for StateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, character)| {
                Symbol::from_char(character).ok_or_else(|| Error::InvalidCellCharacter {
                    character,
                    position,
                    context: s.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(StateKey::from)
    }
}

impl Serialize for StateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
