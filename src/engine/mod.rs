//! Game engine: the orchestrator and its action resolution.
//!
//! `GameEngine` owns a match (state, turns, effects, RNG, events,
//! history) and is the only component that mutates it. Resolution logic
//! is split by concern:
//!
//! - `combat`: attack declaration and battle
//! - `traps`: face-down trap triggers
//! - `spells`: spell casting
//! - `merge`: monster upgrades

mod combat;
mod game;
mod merge;
mod spells;
mod traps;

pub use combat::{AttackOutcome, BattleReport, Damage};
pub use game::GameEngine;
pub use traps::TrapResolution;
