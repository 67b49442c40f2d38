//! Outbound event stream.
//!
//! - `GameEvent`: One thing that happened (attack resolved, trap triggered, ...)
//! - `EventLog`: Buffer the engine appends to and callers drain

mod event;

pub use event::{EventLog, GameEvent};
