//! Timed stat effects.
//!
//! - `Effect`: One active modifier on a monster stat
//! - `EffectKind`: Buff or debuff
//! - `Stat`: Attack or defense
//! - `EffectTracker`: Applies, counts down and reverts effects

mod tracker;

pub use tracker::{Effect, EffectKind, EffectTracker, Stat};
