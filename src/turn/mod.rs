//! Turn progression.

mod manager;

pub use manager::TurnManager;
