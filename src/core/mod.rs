//! Core engine types: identities, players, state, actions, RNG, configuration, errors.
//!
//! Everything else in the crate builds on these. `GameState` owns the
//! field and zones; the rest are small value types.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;
pub mod state;

pub use entity::{CardKey, Cell};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::{ConfigError, EngineConfig, TimedModifier};
pub use action::{Action, ActionKind, ActionRecord, AttackTarget};
pub use error::{EngineError, EngineResult, RuleViolation, Unavailable};
pub use state::{FieldOp, FieldSummary, GameState, PlayerInfo};
