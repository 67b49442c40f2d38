//! Python bindings for the duel engine.
//!
//! # Quick Start
//!
//! ```python
//! import json
//! import duel_engine as duel
//!
//! catalog = json.dumps([
//!     {"name": "Imp", "card_type": "monster", "monster_type": "Demon",
//!      "attack": 900, "defense": 600, "level": 1},
//! ])
//! engine = duel.DuelEngine(catalog, decks=[["Imp"] * 10, ["Imp"] * 10], seed=7)
//!
//! while not engine.is_game_over():
//!     obs = engine.observation()
//!     engine.apply_index(0)
//! ```

use pyo3::prelude::*;

mod py_core;
mod py_engine;

pub use py_core::*;
pub use py_engine::*;

/// duel_engine: a duel card game rules engine for RL training.
#[pymodule]
fn duel_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPlayerId>()?;
    m.add_class::<PyAction>()?;
    m.add_class::<PyDuelEngine>()?;
    Ok(())
}
