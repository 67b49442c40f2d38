//! Legality rules.
//!
//! `RuleEngine` holds the read-only predicates for every action and
//! enumerates legal actions. It never mutates; `GameEngine` consults it
//! before committing anything.

pub mod engine;
mod legal;

pub use engine::{MergeGroup, RuleEngine};
