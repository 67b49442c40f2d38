//! Match bindings for Python.

use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::cards::{CardCatalog, CardRegistry, CardTemplate};
use crate::core::{CardKey, EngineConfig, PlayerId};
use crate::engine::GameEngine;
use crate::observe::BoardEncoder;

use super::py_core::{engine_err, PyAction, PyPlayerId};

fn json_err(err: serde_json::Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Parse a JSON array of card templates into a registry.
fn load_catalog(json: &str) -> PyResult<CardRegistry> {
    let templates: Vec<CardTemplate> = serde_json::from_str(json).map_err(json_err)?;
    let mut registry = CardRegistry::new();
    for template in templates {
        if registry.by_name(&template.name).is_some() {
            return Err(PyValueError::new_err(format!(
                "duplicate card template {:?}",
                template.name
            )));
        }
        registry.register(template);
    }
    Ok(registry)
}

/// Python wrapper for a two-player match.
///
/// The catalog is a JSON array of card templates. Each seat gets a deck
/// list of template names; `reset()` rebuilds, shuffles and deals them.
#[pyclass(name = "DuelEngine")]
pub struct PyDuelEngine {
    engine: GameEngine<CardRegistry>,
    decks: Vec<Vec<String>>,
    encoder: BoardEncoder,
}

impl PyDuelEngine {
    fn deal(&mut self) -> PyResult<()> {
        for (seat, names) in self.decks.iter().enumerate() {
            let player = PlayerId::new(seat as u8);
            self.engine.load_deck(player, names).map_err(engine_err)?;
            self.engine.shuffle_deck(player);
        }
        self.engine.deal_opening_hands();
        Ok(())
    }

    fn seat(&self, player: Option<u8>) -> PyResult<PlayerId> {
        match player {
            None => Ok(self.engine.current_player()),
            Some(id) if (id as usize) < self.engine.state().player_count() => Ok(PlayerId::new(id)),
            Some(id) => Err(PyValueError::new_err(format!("no player {id}"))),
        }
    }
}

#[pymethods]
impl PyDuelEngine {
    /// Create a match.
    ///
    /// # Arguments
    /// - catalog_json: JSON array of card templates
    /// - decks: one list of template names per seat
    /// - seed: RNG seed for deterministic matches
    /// - config_json: optional JSON engine config, defaults otherwise
    #[new]
    #[pyo3(signature = (catalog_json, decks = None, seed = 42, config_json = None))]
    fn new(
        catalog_json: &str,
        decks: Option<Vec<Vec<String>>>,
        seed: u64,
        config_json: Option<&str>,
    ) -> PyResult<Self> {
        let catalog = load_catalog(catalog_json)?;
        let config = match config_json {
            Some(json) => serde_json::from_str::<EngineConfig>(json).map_err(json_err)?,
            None => EngineConfig::default(),
        };
        config
            .validate()
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        let decks = decks.unwrap_or_default();
        if decks.len() > config.player_count {
            return Err(PyValueError::new_err(format!(
                "{} decks for {} players",
                decks.len(),
                config.player_count
            )));
        }

        let mut this = Self {
            engine: GameEngine::new(catalog, config, seed),
            decks,
            encoder: BoardEncoder::new(),
        };
        this.deal()?;
        Ok(this)
    }

    /// Start a fresh match with the same decks.
    fn reset(&mut self) -> PyResult<()> {
        self.engine.reset();
        self.deal()
    }

    /// Legal actions for the current player.
    fn legal_actions(&self) -> Vec<PyAction> {
        self.engine.legal_actions().into_iter().map(PyAction).collect()
    }

    /// Legal actions as (kind_index, cards, cell) tuples.
    fn legal_action_tuples(&self) -> Vec<(usize, Vec<u32>, Option<(usize, usize)>)> {
        self.legal_actions().iter().map(PyAction::to_tuple).collect()
    }

    /// Apply an action for the current player.
    ///
    /// Raises ValueError if the action is refused.
    fn apply(&mut self, action: &PyAction) -> PyResult<()> {
        self.engine.apply(&action.0).map_err(engine_err)
    }

    /// Apply the `index`-th entry of `legal_actions()`.
    fn apply_index(&mut self, index: usize) -> PyResult<()> {
        let actions = self.engine.legal_actions();
        let action = actions.get(index).ok_or_else(|| {
            PyValueError::new_err(format!("action index {index} out of {} legal actions", actions.len()))
        })?;
        self.engine.apply(action).map_err(engine_err)
    }

    /// Flat observation for a player, the current player by default.
    #[pyo3(signature = (player = None))]
    fn observation<'py>(&self, py: Python<'py>, player: Option<u8>) -> PyResult<Bound<'py, PyArray1<f32>>> {
        let perspective = self.seat(player)?;
        let obs = self.encoder.encode(self.engine.state(), perspective);
        Ok(PyArray1::from_vec_bound(py, obs))
    }

    /// Length of `observation()`.
    #[getter]
    fn observation_len(&self) -> usize {
        self.encoder.output_len(self.engine.state())
    }

    fn life_points(&self, player: u8) -> PyResult<i64> {
        let seat = self.seat(Some(player))?;
        Ok(self.engine.state().player(seat).life_points)
    }

    fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }

    fn winner(&self) -> Option<PyPlayerId> {
        self.engine.winner().map(PyPlayerId)
    }

    #[getter]
    fn current_player(&self) -> PyPlayerId {
        PyPlayerId(self.engine.current_player())
    }

    #[getter]
    fn turn_count(&self) -> u32 {
        self.engine.turn_count()
    }

    /// Card keys in a player's hand.
    fn hand(&self, player: u8) -> PyResult<Vec<u32>> {
        let seat = self.seat(Some(player))?;
        Ok(self.engine.state().hand(seat).iter().map(|k| k.raw()).collect())
    }

    /// A card instance as JSON, or None for an unknown key.
    fn card_json(&self, key: u32) -> PyResult<Option<String>> {
        self.engine
            .state()
            .card(CardKey::new(key))
            .map(|card| serde_json::to_string(card).map_err(json_err))
            .transpose()
    }

    /// Take pending events, each as a JSON string.
    fn drain_events(&mut self) -> PyResult<Vec<String>> {
        self.engine
            .drain_events()
            .iter()
            .map(|event| serde_json::to_string(event).map_err(json_err))
            .collect()
    }

    /// Serialize the full match state.
    fn snapshot<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self.engine.snapshot().map_err(engine_err)?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    /// Restore a state produced by `snapshot()`.
    fn restore(&mut self, bytes: &[u8]) -> PyResult<()> {
        self.engine.restore(bytes).map_err(engine_err)
    }

    fn __repr__(&self) -> String {
        let status = if self.engine.is_game_over() { "over" } else { "ongoing" };
        format!(
            "DuelEngine(turn={}, current=P{}, status={})",
            self.engine.turn_count(),
            self.engine.current_player().index(),
            status
        )
    }
}
