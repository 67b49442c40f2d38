//! Card templates - static card data supplied by the catalog.
//!
//! A `CardTemplate` is the immutable description of a card ("Pot of
//! Greed draws two cards"). Instances bound to an owner and carrying
//! combat/placement state are `Card`s, created from templates.
//!
//! Ability tags are parsed into closed enums here, so the engine can
//! dispatch on them with exhaustive matches.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Spell abilities. Spells resolve immediately on cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellAbility {
    /// Draw extra cards.
    #[serde(rename = "draw_two_cards")]
    DrawCards,
    /// Timed attack buff on an own monster.
    #[serde(rename = "buff_attack")]
    BuffAttack,
    /// Timed defense buff on an own monster.
    #[serde(rename = "buff_defense")]
    BuffDefense,
    /// Destroy an opposing trap.
    #[serde(rename = "destroy_trap")]
    DestroyTrap,
    /// Lift the caster's monster summon restriction for this turn.
    #[serde(rename = "summon_monster_from_hand")]
    ExtraSummon,
}

/// Trap abilities. Traps wait face-down until their trigger occurs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapAbility {
    #[serde(rename = "debuff_enemy_atk")]
    DebuffAttack,
    #[serde(rename = "debuff_enemy_def")]
    DebuffDefense,
    #[serde(rename = "dodge_attack")]
    DodgeAttack,
    #[serde(rename = "reflect_attack")]
    ReflectAttack,
    #[serde(rename = "debuff_summon")]
    DebuffSummon,
}

/// What springs a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapTrigger {
    /// An opposing monster declares an attack.
    Attack,
    /// An opposing monster is summoned.
    Summon,
}

impl SpellAbility {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            SpellAbility::DrawCards => "draw_two_cards",
            SpellAbility::BuffAttack => "buff_attack",
            SpellAbility::BuffDefense => "buff_defense",
            SpellAbility::DestroyTrap => "destroy_trap",
            SpellAbility::ExtraSummon => "summon_monster_from_hand",
        }
    }

    /// Whether casting requires a target card.
    #[must_use]
    pub fn needs_target(self) -> bool {
        matches!(
            self,
            SpellAbility::BuffAttack | SpellAbility::BuffDefense | SpellAbility::DestroyTrap
        )
    }
}

impl TrapAbility {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            TrapAbility::DebuffAttack => "debuff_enemy_atk",
            TrapAbility::DebuffDefense => "debuff_enemy_def",
            TrapAbility::DodgeAttack => "dodge_attack",
            TrapAbility::ReflectAttack => "reflect_attack",
            TrapAbility::DebuffSummon => "debuff_summon",
        }
    }

    #[must_use]
    pub fn trigger(self) -> TrapTrigger {
        match self {
            TrapAbility::DebuffSummon => TrapTrigger::Summon,
            TrapAbility::DebuffAttack
            | TrapAbility::DebuffDefense
            | TrapAbility::DodgeAttack
            | TrapAbility::ReflectAttack => TrapTrigger::Attack,
        }
    }
}

/// Error for an ability tag the engine does not know.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown ability tag {0:?}")]
pub struct UnknownAbility(pub String);

impl FromStr for SpellAbility {
    type Err = UnknownAbility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SpellAbility::DrawCards,
            SpellAbility::BuffAttack,
            SpellAbility::BuffDefense,
            SpellAbility::DestroyTrap,
            SpellAbility::ExtraSummon,
        ]
        .into_iter()
        .find(|a| a.tag() == s)
        .ok_or_else(|| UnknownAbility(s.to_string()))
    }
}

impl FromStr for TrapAbility {
    type Err = UnknownAbility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            TrapAbility::DebuffAttack,
            TrapAbility::DebuffDefense,
            TrapAbility::DodgeAttack,
            TrapAbility::ReflectAttack,
            TrapAbility::DebuffSummon,
        ]
        .into_iter()
        .find(|a| a.tag() == s)
        .ok_or_else(|| UnknownAbility(s.to_string()))
    }
}

/// Kind-specific template data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "card_type", rename_all = "snake_case")]
pub enum TemplateKind {
    Monster {
        /// Type category ("Scholar", "Demon", ...). Merges need a shared type.
        monster_type: String,
        attack: i64,
        defense: i64,
        /// Star count, at least 1.
        level: u8,
        #[serde(default)]
        ability: Option<String>,
    },
    Spell {
        ability: SpellAbility,
    },
    Trap {
        ability: TrapAbility,
        /// Overrides the configured effect magnitude.
        #[serde(default)]
        value: Option<i64>,
        /// Overrides the configured effect duration.
        #[serde(default)]
        duration: Option<u32>,
    },
}

/// Static card definition.
///
/// ```
/// use duel_engine::cards::{CardTemplate, TemplateKind};
///
/// let scholar = CardTemplate::monster("Apprentice Scholar", "Scholar", 1200, 1000, 1)
///     .with_description("Reads by candlelight.");
///
/// match scholar.kind {
///     TemplateKind::Monster { level, .. } => assert_eq!(level, 1),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: TemplateKind,
}

impl CardTemplate {
    /// A monster template. Levels below 1 are raised to 1.
    #[must_use]
    pub fn monster(
        name: impl Into<String>,
        monster_type: impl Into<String>,
        attack: i64,
        defense: i64,
        level: u8,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: TemplateKind::Monster {
                monster_type: monster_type.into(),
                attack,
                defense,
                level: level.max(1),
                ability: None,
            },
        }
    }

    #[must_use]
    pub fn spell(name: impl Into<String>, ability: SpellAbility) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: TemplateKind::Spell { ability },
        }
    }

    #[must_use]
    pub fn trap(name: impl Into<String>, ability: TrapAbility) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: TemplateKind::Trap {
                ability,
                value: None,
                duration: None,
            },
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the effect magnitude of a trap. No-op for other kinds.
    #[must_use]
    pub fn with_value(mut self, amount: i64) -> Self {
        if let TemplateKind::Trap { value, .. } = &mut self.kind {
            *value = Some(amount);
        }
        self
    }

    /// Set the effect duration of a trap. No-op for other kinds.
    #[must_use]
    pub fn with_duration(mut self, rounds: u32) -> Self {
        if let TemplateKind::Trap { duration, .. } = &mut self.kind {
            *duration = Some(rounds);
        }
        self
    }

    /// Monster type and level, if this is a monster.
    #[must_use]
    pub fn monster_key(&self) -> Option<(&str, u8)> {
        match &self.kind {
            TemplateKind::Monster { monster_type, level, .. } => Some((monster_type.as_str(), *level)),
            _ => None,
        }
    }

    /// The ability tag as it appears in catalog data.
    #[must_use]
    pub fn ability_tag(&self) -> Option<&str> {
        match &self.kind {
            TemplateKind::Monster { ability, .. } => ability.as_deref(),
            TemplateKind::Spell { ability } => Some(ability.tag()),
            TemplateKind::Trap { ability, .. } => Some(ability.tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ability_tags_round_trip() {
        for tag in ["draw_two_cards", "buff_attack", "buff_defense", "destroy_trap", "summon_monster_from_hand"] {
            let ability: SpellAbility = tag.parse().unwrap();
            assert_eq!(ability.tag(), tag);
        }
        for tag in ["debuff_enemy_atk", "debuff_enemy_def", "dodge_attack", "reflect_attack", "debuff_summon"] {
            let ability: TrapAbility = tag.parse().unwrap();
            assert_eq!(ability.tag(), tag);
        }
        assert!("fireball".parse::<SpellAbility>().is_err());
    }

    #[test]
    fn test_trap_triggers() {
        assert_eq!(TrapAbility::DebuffSummon.trigger(), TrapTrigger::Summon);
        assert_eq!(TrapAbility::DodgeAttack.trigger(), TrapTrigger::Attack);
        assert_eq!(TrapAbility::ReflectAttack.trigger(), TrapTrigger::Attack);
    }

    #[test]
    fn test_monster_level_floor() {
        let t = CardTemplate::monster("Zero", "Scholar", 100, 100, 0);
        assert_eq!(t.monster_key(), Some(("Scholar", 1)));
    }

    #[test]
    fn test_trap_overrides_ignored_on_spells() {
        let spell = CardTemplate::spell("Pot of Greed", SpellAbility::DrawCards).with_value(9);
        assert_eq!(spell.kind, TemplateKind::Spell { ability: SpellAbility::DrawCards });

        let trap = CardTemplate::trap("Crippling Curse", TrapAbility::DebuffAttack)
            .with_value(700)
            .with_duration(2);
        assert_eq!(
            trap.kind,
            TemplateKind::Trap {
                ability: TrapAbility::DebuffAttack,
                value: Some(700),
                duration: Some(2)
            }
        );
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = r#"{
            "name": "Phantom Dodge",
            "description": "Negates an attack.",
            "card_type": "trap",
            "ability": "dodge_attack"
        }"#;
        let template: CardTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.ability_tag(), Some("dodge_attack"));
        assert_eq!(template.description, "Negates an attack.");
    }
}
