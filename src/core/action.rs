//! The inbound action surface.
//!
//! Every write to a match is one of the `Action` variants. UI input
//! handlers and RL action mappers build actions and hand them to
//! `GameEngine::apply`; `RuleEngine::legal_actions` enumerates the ones
//! that would currently be accepted.
//!
//! ```
//! use duel_engine::core::{Action, ActionKind, AttackTarget, CardKey, Cell, PlayerId};
//!
//! let summon = Action::Summon { card: CardKey::new(4), cell: Cell::new(3, 0) };
//! assert_eq!(summon.kind(), ActionKind::Summon);
//!
//! let hit = Action::Attack {
//!     card: CardKey::new(4),
//!     target: AttackTarget::Player(PlayerId::new(1)),
//! };
//! assert_eq!(hit.subjects().as_slice(), &[CardKey::new(4)]);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::{CardKey, Cell};
use super::player::PlayerId;

/// What an attacking monster is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackTarget {
    /// An opposing monster on the field.
    Monster(CardKey),
    /// The defending player directly.
    Player(PlayerId),
}

/// A complete game action, taken by the current player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Draw,
    Summon { card: CardKey, cell: Cell },
    SetTrap { card: CardKey, cell: Cell },
    Toggle { card: CardKey },
    Attack { card: CardKey, target: AttackTarget },
    CastSpell { spell: CardKey, target: Option<CardKey> },
    Merge { a: CardKey, b: CardKey },
    EndTurn,
}

/// Discriminant of an `Action`, stable for use as a policy-head index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Draw,
    Summon,
    SetTrap,
    Toggle,
    Attack,
    CastSpell,
    Merge,
    EndTurn,
}

impl ActionKind {
    /// All kinds in index order.
    pub const ALL: [ActionKind; 8] = [
        ActionKind::Draw,
        ActionKind::Summon,
        ActionKind::SetTrap,
        ActionKind::Toggle,
        ActionKind::Attack,
        ActionKind::CastSpell,
        ActionKind::Merge,
        ActionKind::EndTurn,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Draw => "draw",
            ActionKind::Summon => "summon",
            ActionKind::SetTrap => "set_trap",
            ActionKind::Toggle => "toggle",
            ActionKind::Attack => "attack",
            ActionKind::CastSpell => "cast_spell",
            ActionKind::Merge => "combine",
            ActionKind::EndTurn => "end_turn",
        }
    }
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Draw => ActionKind::Draw,
            Action::Summon { .. } => ActionKind::Summon,
            Action::SetTrap { .. } => ActionKind::SetTrap,
            Action::Toggle { .. } => ActionKind::Toggle,
            Action::Attack { .. } => ActionKind::Attack,
            Action::CastSpell { .. } => ActionKind::CastSpell,
            Action::Merge { .. } => ActionKind::Merge,
            Action::EndTurn => ActionKind::EndTurn,
        }
    }

    /// Cards this action refers to, acting card first.
    #[must_use]
    pub fn subjects(&self) -> SmallVec<[CardKey; 2]> {
        let mut out = SmallVec::new();
        match *self {
            Action::Draw | Action::EndTurn => {}
            Action::Summon { card, .. } | Action::SetTrap { card, .. } | Action::Toggle { card } => {
                out.push(card);
            }
            Action::Attack { card, target } => {
                out.push(card);
                if let AttackTarget::Monster(defender) = target {
                    out.push(defender);
                }
            }
            Action::CastSpell { spell, target } => {
                out.push(spell);
                out.extend(target);
            }
            Action::Merge { a, b } => {
                out.push(a);
                out.push(b);
            }
        }
        out
    }
}

/// A committed action with metadata, kept in match history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: Action,
    /// Turn counter when the action was taken.
    pub turn: u32,
    /// Position in the match-wide history.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
