//! Card instances - runtime card state.
//!
//! A `Card` is one physical card in a match: immutable identity (key,
//! name, owner, ability) plus mutable placement and combat state. The
//! kind-specific part lives in `CardBody`, an enum the engine matches on.
//!
//! `position` is only ever written by `GameState::modify_field`, which
//! keeps it in step with the field grid.

use serde::{Deserialize, Serialize};

use super::definition::{CardTemplate, SpellAbility, TemplateKind, TrapAbility};
use crate::core::{CardKey, Cell, PlayerId};

/// Card kind, used for per-kind rules and queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Monster,
    Spell,
    Trap,
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CardKind::Monster => "monster",
            CardKind::Spell => "spell",
            CardKind::Trap => "trap",
        };
        f.write_str(name)
    }
}

/// A monster's combat stance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Attack,
    Defense,
}

impl Mode {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Mode::Attack => Mode::Defense,
            Mode::Defense => Mode::Attack,
        }
    }
}

/// Monster combat state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterStats {
    pub monster_type: String,
    pub ability: Option<String>,
    pub attack: i64,
    pub defense: i64,
    pub level: u8,
    pub mode: Mode,
    /// Set once the monster has declared an attack this turn.
    pub has_attacked: bool,
}

/// Trap state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapState {
    pub ability: TrapAbility,
    pub value: Option<i64>,
    pub duration: Option<u32>,
}

/// Kind-specific card data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardBody {
    Monster(MonsterStats),
    Spell { ability: SpellAbility },
    Trap(TrapState),
}

/// One card in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub key: CardKey,
    pub name: String,
    pub description: String,
    pub owner: PlayerId,
    /// Field cell currently occupied, or `None` when off the field.
    pub position: Option<Cell>,
    /// Hidden from the opponent. Traps stay face-down until triggered.
    pub face_down: bool,
    pub body: CardBody,
}

impl Card {
    /// Instantiate a template for `owner`.
    #[must_use]
    pub fn from_template(key: CardKey, template: &CardTemplate, owner: PlayerId) -> Self {
        let (body, face_down) = match &template.kind {
            TemplateKind::Monster {
                monster_type,
                attack,
                defense,
                level,
                ability,
            } => (
                CardBody::Monster(MonsterStats {
                    monster_type: monster_type.clone(),
                    ability: ability.clone(),
                    attack: *attack,
                    defense: *defense,
                    level: (*level).max(1),
                    mode: Mode::Attack,
                    has_attacked: false,
                }),
                false,
            ),
            TemplateKind::Spell { ability } => (CardBody::Spell { ability: *ability }, false),
            TemplateKind::Trap {
                ability,
                value,
                duration,
            } => (
                CardBody::Trap(TrapState {
                    ability: *ability,
                    value: *value,
                    duration: *duration,
                }),
                true,
            ),
        };

        Self {
            key,
            name: template.name.clone(),
            description: template.description.clone(),
            owner,
            position: None,
            face_down,
            body,
        }
    }

    #[must_use]
    pub fn kind(&self) -> CardKind {
        match self.body {
            CardBody::Monster(_) => CardKind::Monster,
            CardBody::Spell { .. } => CardKind::Spell,
            CardBody::Trap(_) => CardKind::Trap,
        }
    }

    /// Whether the card is on the field.
    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    #[must_use]
    pub fn monster(&self) -> Option<&MonsterStats> {
        match &self.body {
            CardBody::Monster(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn monster_mut(&mut self) -> Option<&mut MonsterStats> {
        match &mut self.body {
            CardBody::Monster(stats) => Some(stats),
            _ => None,
        }
    }

    #[must_use]
    pub fn trap(&self) -> Option<&TrapState> {
        match &self.body {
            CardBody::Trap(trap) => Some(trap),
            _ => None,
        }
    }

    #[must_use]
    pub fn spell_ability(&self) -> Option<SpellAbility> {
        match self.body {
            CardBody::Spell { ability } => Some(ability),
            _ => None,
        }
    }

    /// Ability tag in catalog form.
    #[must_use]
    pub fn ability_tag(&self) -> Option<&str> {
        match &self.body {
            CardBody::Monster(stats) => stats.ability.as_deref(),
            CardBody::Spell { ability } => Some(ability.tag()),
            CardBody::Trap(trap) => Some(trap.ability.tag()),
        }
    }

    /// A face-down trap still waiting for its trigger.
    #[must_use]
    pub fn is_armed_trap(&self) -> bool {
        self.face_down && self.is_placed() && matches!(self.body, CardBody::Trap(_))
    }
}
