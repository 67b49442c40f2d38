//! Observation encoding for learning agents.

mod encoder;

pub use encoder::{BoardEncoder, CARD_FEATURES};
