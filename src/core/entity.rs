//! Card identity and board coordinates.
//!
//! Every card instance in a match gets a unique `CardKey` when it is
//! instantiated from the catalog. Keys are never reused within a match,
//! so a key stays valid after the card moves to a graveyard.
//!
//! ## Usage
//!
//! ```
//! use duel_engine::core::{CardKey, Cell};
//!
//! let key = CardKey::new(7);
//! assert_eq!(key.raw(), 7);
//!
//! let cell = Cell::new(2, 4);
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.col, 4);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardKey(pub u32);

impl CardKey {
    /// Create a card key.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw key value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card#{}", self.0)
    }
}

/// A field cell, addressed by row and column.
///
/// Row 0 is the top of the board (player 1's side).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    /// Create a cell coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index into a grid with `cols` columns.
    #[must_use]
    pub const fn index(self, cols: usize) -> usize {
        self.row * cols + self.col
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
