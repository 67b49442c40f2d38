//! Engine configuration.
//!
//! `EngineConfig` fixes the board geometry, the per-player caps and the
//! magnitudes used by spell and trap abilities. Every value has a
//! default matching the standard duel; builder methods override them.
//!
//! ```
//! use duel_engine::core::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_starting_life(4000)
//!     .with_hand_cap(7);
//!
//! assert_eq!(config.rows, 4);
//! assert_eq!(config.starting_life, 4000);
//! assert_eq!(config.hand_cap, 7);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a configuration cannot describe a duel field.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must have at least one cell, got {rows}x{cols}")]
    EmptyBoard { rows: usize, cols: usize },
    #[error("board rows must be even, got {0}")]
    OddRows(usize),
    #[error("the field supports exactly two players, got {0}")]
    PlayerCount(usize),
}

/// A timed stat modifier: how much, for how many turn-end ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedModifier {
    pub magnitude: i64,
    pub duration: u32,
}

impl TimedModifier {
    #[must_use]
    pub const fn new(magnitude: i64, duration: u32) -> Self {
        Self { magnitude, duration }
    }
}

/// Engine-wide configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Field rows. Must be even: the top half belongs to player 1.
    pub rows: usize,

    /// Field columns.
    pub cols: usize,

    /// Number of seats. The ownership grid supports exactly two.
    pub player_count: usize,

    /// Maximum cards in hand; drawing is refused at this size.
    pub hand_cap: usize,

    /// Maximum cards a player may have on the field.
    pub board_cap: usize,

    /// Life points each player starts with.
    pub starting_life: i64,

    /// Cards dealt to each player by `deal_opening_hands`.
    pub opening_hand: usize,

    /// Buff applied by attack/defense buff spells.
    pub spell_buff: TimedModifier,

    /// Cards drawn by a draw spell.
    pub spell_draw_count: usize,

    /// Debuff applied by attack-triggered debuff traps.
    pub trap_debuff: TimedModifier,

    /// Debuff applied to both stats by summon-triggered traps.
    pub summon_debuff: TimedModifier,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 5,
            player_count: 2,
            hand_cap: 10,
            board_cap: 10,
            starting_life: 8000,
            opening_hand: 5,
            spell_buff: TimedModifier::new(300, 3),
            spell_draw_count: 2,
            trap_debuff: TimedModifier::new(500, 3),
            summon_debuff: TimedModifier::new(500, 4),
        }
    }
}

impl EngineConfig {
    /// Set the board geometry.
    ///
    /// Panics if `rows` is odd or either dimension is zero.
    #[must_use]
    pub fn with_board(mut self, rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "Board must have at least one cell");
        assert!(rows % 2 == 0, "Board rows must split evenly between two players");
        self.rows = rows;
        self.cols = cols;
        self
    }

    #[must_use]
    pub fn with_hand_cap(mut self, cap: usize) -> Self {
        self.hand_cap = cap;
        self
    }

    #[must_use]
    pub fn with_board_cap(mut self, cap: usize) -> Self {
        self.board_cap = cap;
        self
    }

    #[must_use]
    pub fn with_starting_life(mut self, life: i64) -> Self {
        self.starting_life = life;
        self
    }

    #[must_use]
    pub fn with_opening_hand(mut self, size: usize) -> Self {
        self.opening_hand = size;
        self
    }

    #[must_use]
    pub fn with_spell_buff(mut self, buff: TimedModifier) -> Self {
        self.spell_buff = buff;
        self
    }

    #[must_use]
    pub fn with_trap_debuff(mut self, debuff: TimedModifier) -> Self {
        self.trap_debuff = debuff;
        self
    }

    #[must_use]
    pub fn with_summon_debuff(mut self, debuff: TimedModifier) -> Self {
        self.summon_debuff = debuff;
        self
    }

    /// Check a configuration built without the builders, e.g. deserialized.
    ///
    /// ```
    /// use duel_engine::core::{ConfigError, EngineConfig};
    ///
    /// let mut config = EngineConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.rows = 3;
    /// assert_eq!(config.validate(), Err(ConfigError::OddRows(3)));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyBoard {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.rows % 2 != 0 {
            return Err(ConfigError::OddRows(self.rows));
        }
        if self.player_count != 2 {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        Ok(())
    }

    /// Total number of field cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}
