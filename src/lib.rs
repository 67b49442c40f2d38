//! # duel-engine
//!
//! A deterministic rules engine for a two-player duel card game, driven
//! both by rendering clients and by RL training loops.
//!
//! ## Design Principles
//!
//! 1. **Validate, then commit**: every action is checked in full by the
//!    read-only `RuleEngine` before anything changes. A refused action
//!    leaves the match untouched.
//!
//! 2. **One writer**: `GameEngine` is the only component that mutates a
//!    match. Grid, card positions and the per-player board index change
//!    together through `GameState::modify_field`.
//!
//! 3. **Deterministic**: all randomness comes from a seeded `GameRng`.
//!    Same seed and same actions give the same match.
//!
//! ## Modules
//!
//! - `core`: Keys, players, field state, actions, RNG, configuration, errors
//! - `cards`: Card templates, instances and the catalog seam
//! - `effects`: Timed stat buffs and debuffs
//! - `turn`: Turn order and per-turn flag resets
//! - `rules`: Legality predicates and legal-action enumeration
//! - `events`: Outbound event stream
//! - `engine`: The orchestrator; combat, traps, spells and merges
//! - `observe`: Flat observation vectors for learning agents
//!
//! ```
//! use duel_engine::{Action, CardRegistry, CardTemplate, Cell, EngineConfig, GameEngine, PlayerId};
//!
//! let catalog = CardRegistry::from_templates([
//!     CardTemplate::monster("Apprentice Scholar", "Scholar", 1200, 1000, 1),
//! ]);
//! let mut engine = GameEngine::new(catalog, EngineConfig::default(), 7);
//! let p0 = PlayerId::new(0);
//!
//! let card = engine.grant_card(p0, "Apprentice Scholar").unwrap();
//! engine.apply(&Action::Summon { card, cell: Cell::new(3, 0) }).unwrap();
//! engine.apply(&Action::EndTurn).unwrap();
//!
//! assert_eq!(engine.current_player(), PlayerId::new(1));
//! assert_eq!(engine.state().card_at(Cell::new(3, 0)), Some(card));
//! ```

pub mod core;
pub mod cards;
pub mod effects;
pub mod turn;
pub mod rules;
pub mod events;
pub mod engine;
pub mod observe;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    CardKey, Cell,
    Player, PlayerId, PlayerMap,
    GameRng, GameRngState,
    ConfigError, EngineConfig, TimedModifier,
    Action, ActionKind, ActionRecord, AttackTarget,
    EngineError, EngineResult, RuleViolation, Unavailable,
    FieldOp, FieldSummary, GameState, PlayerInfo,
};

pub use crate::cards::{
    Card, CardBody, CardKind, CardTemplate, Mode, MonsterStats, TrapState,
    SpellAbility, TrapAbility, TemplateKind,
    CardCatalog, CardRegistry,
};

pub use crate::effects::{Effect, EffectKind, EffectTracker, Stat};
pub use crate::turn::TurnManager;
pub use crate::rules::{MergeGroup, RuleEngine};
pub use crate::events::{EventLog, GameEvent};
pub use crate::engine::{AttackOutcome, BattleReport, Damage, GameEngine, TrapResolution};
pub use crate::observe::BoardEncoder;
