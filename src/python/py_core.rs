//! Core type bindings for Python.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::{Action, AttackTarget, CardKey, Cell, EngineError, PlayerId};

/// Map an engine error onto a Python exception.
///
/// Refused and unavailable actions raise `ValueError`; anything else
/// raises `RuntimeError`.
pub(crate) fn engine_err(err: EngineError) -> PyErr {
    if err.is_recoverable() {
        PyValueError::new_err(err.to_string())
    } else {
        PyRuntimeError::new_err(err.to_string())
    }
}

/// Python wrapper for PlayerId.
#[pyclass(name = "PlayerId")]
#[derive(Clone, Debug)]
pub struct PyPlayerId(pub PlayerId);

#[pymethods]
impl PyPlayerId {
    #[new]
    fn new(id: u8) -> Self {
        Self(PlayerId::new(id))
    }

    /// Seat index (0-based).
    fn index(&self) -> usize {
        self.0.index()
    }

    #[getter]
    fn id(&self) -> u8 {
        self.0 .0
    }

    fn __repr__(&self) -> String {
        format!("PlayerId({})", self.0 .0)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        self.0 .0 as u64
    }
}

/// Python wrapper for Action.
///
/// Build one with the static constructors or take one from
/// `DuelEngine.legal_actions()`.
#[pyclass(name = "Action")]
#[derive(Clone, Debug)]
pub struct PyAction(pub Action);

#[pymethods]
impl PyAction {
    #[staticmethod]
    fn draw() -> Self {
        Self(Action::Draw)
    }

    #[staticmethod]
    fn summon(card: u32, row: usize, col: usize) -> Self {
        Self(Action::Summon {
            card: CardKey::new(card),
            cell: Cell::new(row, col),
        })
    }

    #[staticmethod]
    fn set_trap(card: u32, row: usize, col: usize) -> Self {
        Self(Action::SetTrap {
            card: CardKey::new(card),
            cell: Cell::new(row, col),
        })
    }

    #[staticmethod]
    fn toggle(card: u32) -> Self {
        Self(Action::Toggle { card: CardKey::new(card) })
    }

    /// Attack a monster, or the opposing player when `defender` is None.
    #[staticmethod]
    #[pyo3(signature = (card, defender = None, player = 1))]
    fn attack(card: u32, defender: Option<u32>, player: u8) -> Self {
        let target = match defender {
            Some(key) => AttackTarget::Monster(CardKey::new(key)),
            None => AttackTarget::Player(PlayerId::new(player)),
        };
        Self(Action::Attack {
            card: CardKey::new(card),
            target,
        })
    }

    #[staticmethod]
    #[pyo3(signature = (spell, target = None))]
    fn cast_spell(spell: u32, target: Option<u32>) -> Self {
        Self(Action::CastSpell {
            spell: CardKey::new(spell),
            target: target.map(CardKey::new),
        })
    }

    #[staticmethod]
    fn merge(a: u32, b: u32) -> Self {
        Self(Action::Merge {
            a: CardKey::new(a),
            b: CardKey::new(b),
        })
    }

    #[staticmethod]
    fn end_turn() -> Self {
        Self(Action::EndTurn)
    }

    /// Action name, e.g. "summon".
    #[getter]
    fn kind(&self) -> &'static str {
        self.0.kind().name()
    }

    /// Stable index of the action kind, for policy heads.
    #[getter]
    fn kind_index(&self) -> usize {
        self.0.kind().index()
    }

    /// Card keys the action refers to, acting card first.
    #[getter]
    fn cards(&self) -> Vec<u32> {
        self.0.subjects().iter().map(|k| k.raw()).collect()
    }

    /// Target cell as (row, col) for placements.
    #[getter]
    fn cell(&self) -> Option<(usize, usize)> {
        match self.0 {
            Action::Summon { cell, .. } | Action::SetTrap { cell, .. } => Some((cell.row, cell.col)),
            _ => None,
        }
    }

    /// (kind_index, cards, cell) as plain Python values.
    fn to_tuple(&self) -> (usize, Vec<u32>, Option<(usize, usize)>) {
        (self.kind_index(), self.cards(), self.cell())
    }

    fn __repr__(&self) -> String {
        format!("Action({:?})", self.0)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish()
    }
}
