//! Spell casting.

use tracing::info;

use crate::cards::{CardCatalog, SpellAbility};
use crate::core::{Action, CardKey, EngineError, EngineResult, PlayerId};
use crate::effects::{EffectKind, Stat};
use crate::events::GameEvent;

use super::game::GameEngine;

impl<C: CardCatalog> GameEngine<C> {
    /// Cast a spell from hand, resolve it, then discard it.
    ///
    /// - Draw spells draw up to the configured count, stopping quietly at
    ///   the hand cap or an empty deck.
    /// - Buff spells put a timed buff on an own monster.
    /// - Trap destruction sends an opposing trap to the graveyard.
    /// - Extra summon lifts the caster's monster summon flag for the turn.
    pub fn cast_spell(&mut self, player: PlayerId, spell: CardKey, target: Option<CardKey>) -> EngineResult<()> {
        self.gate(self.rules().check_cast(player, spell, target), "cast_spell")?;

        let ability = match self.state.card(spell).and_then(|c| c.spell_ability()) {
            Some(ability) => ability,
            None => self.abort(EngineError::inconsistent(format!("{spell} is not a spell")), "cast_spell"),
        };

        match (ability, target) {
            (SpellAbility::DrawCards, _) => {
                for _ in 0..self.state.config().spell_draw_count {
                    if self.draw_unchecked(player).is_none() {
                        break;
                    }
                }
            }
            (SpellAbility::BuffAttack, Some(target)) => self.buff(target, Stat::Attack),
            (SpellAbility::BuffDefense, Some(target)) => self.buff(target, Stat::Defense),
            (SpellAbility::DestroyTrap, Some(target)) => self.destroy(target),
            (SpellAbility::ExtraSummon, _) => {
                self.state.info_mut(player).has_summoned_monster = false;
            }
            (_, None) => self.abort(EngineError::inconsistent("validated spell lost its target"), "cast_spell"),
        }

        info!(player = %player, spell = %spell, ability = ability.tag(), target = ?target, "Spell activated");
        self.events.push(GameEvent::SpellActivated { spell, ability, target });
        let discarded = self.state.send_to_graveyard(spell);
        self.expect_consistent(discarded, "cast_spell");
        self.record(player, Action::CastSpell { spell, target });
        Ok(())
    }

    fn buff(&mut self, target: CardKey, stat: Stat) {
        let buff = self.state.config().spell_buff;
        let added = self
            .effects
            .add_effect(&mut self.state, EffectKind::Buff, target, stat, buff.magnitude, buff.duration);
        self.expect_consistent(added, "spell buff");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRegistry, CardTemplate, TrapAbility};
    use crate::core::{Cell, EngineConfig, RuleViolation};

    fn p0() -> PlayerId {
        PlayerId::new(0)
    }

    fn p1() -> PlayerId {
        PlayerId::new(1)
    }

    fn engine(config: EngineConfig) -> GameEngine<CardRegistry> {
        let catalog = CardRegistry::from_templates([
            CardTemplate::monster("Imp", "Demon", 900, 600, 1),
            CardTemplate::spell("Pot of Greed", SpellAbility::DrawCards),
            CardTemplate::spell("Maniac War", SpellAbility::BuffAttack),
            CardTemplate::spell("Holy Shield", SpellAbility::BuffDefense),
            CardTemplate::spell("Trap Smasher", SpellAbility::DestroyTrap),
            CardTemplate::spell("Double Call", SpellAbility::ExtraSummon),
            CardTemplate::trap("Phantom Dodge", TrapAbility::DodgeAttack),
        ]);
        GameEngine::new(catalog, config, 3)
    }

    #[test]
    fn test_draw_spell() {
        let mut engine = engine(EngineConfig::default());
        engine.load_deck(p0(), ["Imp", "Imp", "Imp"]).unwrap();
        let pot = engine.grant_card(p0(), "Pot of Greed").unwrap();

        engine.cast_spell(p0(), pot, None).unwrap();

        assert_eq!(engine.state().hand(p0()).len(), 2);
        assert_eq!(engine.state().deck(p0()).len(), 1);
        assert_eq!(engine.state().graveyard(p0()).len(), 1);
    }

    #[test]
    fn test_draw_spell_stops_at_hand_cap() {
        let mut engine = engine(EngineConfig::default().with_hand_cap(2));
        engine.load_deck(p0(), ["Imp", "Imp", "Imp"]).unwrap();
        let pot = engine.grant_card(p0(), "Pot of Greed").unwrap();

        engine.cast_spell(p0(), pot, None).unwrap();

        // The spell itself held a hand slot while resolving.
        assert_eq!(engine.state().hand(p0()).len(), 1);
        assert_eq!(engine.state().deck(p0()).len(), 2);
    }

    #[test]
    fn test_buff_spell() {
        let mut engine = engine(EngineConfig::default());
        let imp = engine.grant_card(p0(), "Imp").unwrap();
        engine.summon_card(p0(), imp, Cell::new(2, 0)).unwrap();
        let war = engine.grant_card(p0(), "Maniac War").unwrap();
        let shield = engine.grant_card(p0(), "Holy Shield").unwrap();

        engine.cast_spell(p0(), war, Some(imp)).unwrap();
        engine.cast_spell(p0(), shield, Some(imp)).unwrap();

        let stats = engine.state().card(imp).unwrap().monster().unwrap();
        assert_eq!((stats.attack, stats.defense), (1200, 900));
        assert_eq!(engine.effects().active_count(), 2);
    }

    #[test]
    fn test_buff_rejects_opposing_target() {
        let mut engine = engine(EngineConfig::default());
        let theirs = engine.grant_card(p1(), "Imp").unwrap();
        engine.end_turn().unwrap();
        engine.summon_card(p1(), theirs, Cell::new(0, 0)).unwrap();
        engine.end_turn().unwrap();
        let war = engine.grant_card(p0(), "Maniac War").unwrap();

        let err = engine.cast_spell(p0(), war, Some(theirs)).unwrap_err();

        assert_eq!(err.as_rule(), Some(&RuleViolation::NotOwner(theirs)));
        assert!(engine.state().in_hand(p0(), war));
    }

    #[test]
    fn test_destroy_trap() {
        let mut engine = engine(EngineConfig::default());
        let dodge = engine.grant_card(p1(), "Phantom Dodge").unwrap();
        engine.end_turn().unwrap();
        engine.set_trap(p1(), dodge, Cell::new(1, 2)).unwrap();
        engine.end_turn().unwrap();
        let smash = engine.grant_card(p0(), "Trap Smasher").unwrap();

        engine.cast_spell(p0(), smash, Some(dodge)).unwrap();

        assert_eq!(engine.state().card_at(Cell::new(1, 2)), None);
        assert_eq!(engine.state().graveyard(p1()).len(), 1);
        assert!(engine.state().armed_traps(p1()).is_empty());
    }

    #[test]
    fn test_extra_summon() {
        let mut engine = engine(EngineConfig::default());
        let a = engine.grant_card(p0(), "Imp").unwrap();
        let b = engine.grant_card(p0(), "Imp").unwrap();
        let call = engine.grant_card(p0(), "Double Call").unwrap();
        engine.summon_card(p0(), a, Cell::new(2, 0)).unwrap();

        assert!(engine.summon_card(p0(), b, Cell::new(2, 1)).is_err());
        engine.cast_spell(p0(), call, None).unwrap();
        engine.summon_card(p0(), b, Cell::new(2, 1)).unwrap();

        assert_eq!(engine.state().player_cards(p0()).len(), 2);
    }
}
