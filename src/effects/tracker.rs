//! Timed stat modifiers.
//!
//! `add_effect` applies the modifier to the target monster immediately
//! and records it. Each `update_round` call counts every effect down by
//! one; an effect reaching zero is reverted with the inverse change and
//! dropped. Effects on the same stat stack additively with no clamping.
//!
//! Cards are never removed from the card store, so an effect whose
//! target left the field still reverts cleanly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{CardKey, EngineError, EngineResult, GameState, RuleViolation};

/// Buff adds the magnitude, debuff subtracts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Buff,
    Debuff,
}

impl EffectKind {
    fn sign(self) -> i64 {
        match self {
            EffectKind::Buff => 1,
            EffectKind::Debuff => -1,
        }
    }
}

/// A modifiable monster stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Attack,
    Defense,
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stat::Attack => f.write_str("attack"),
            Stat::Defense => f.write_str("defense"),
        }
    }
}

/// An active timed modifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub id: u32,
    pub kind: EffectKind,
    pub target: CardKey,
    pub stat: Stat,
    pub magnitude: i64,
    /// Ticks the effect was created with.
    pub duration: u32,
    pub rounds_remaining: u32,
}

impl Effect {
    /// Signed change this effect applies to its stat.
    #[must_use]
    pub fn delta(&self) -> i64 {
        self.kind.sign() * self.magnitude
    }
}

/// Bookkeeping for every active effect in a match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTracker {
    active: Vec<Effect>,
    next_id: u32,
}

impl EffectTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a modifier to a monster and start its countdown.
    ///
    /// A duration of 0 is treated as 1. Fails without mutation if the
    /// target is unknown or not a monster.
    pub fn add_effect(
        &mut self,
        state: &mut GameState,
        kind: EffectKind,
        target: CardKey,
        stat: Stat,
        magnitude: i64,
        duration: u32,
    ) -> EngineResult<u32> {
        let card = state.require_card(target)?;
        if card.monster().is_none() {
            return Err(RuleViolation::WrongCardKind(target).into());
        }

        let effect = Effect {
            id: self.next_id,
            kind,
            target,
            stat,
            magnitude,
            duration: duration.max(1),
            rounds_remaining: duration.max(1),
        };
        apply_delta(state, target, stat, effect.delta())?;
        self.next_id += 1;

        debug!(
            effect = effect.id,
            target = %target,
            stat = %stat,
            delta = effect.delta(),
            rounds = effect.rounds_remaining,
            "Effect added"
        );
        let id = effect.id;
        self.active.push(effect);
        Ok(id)
    }

    /// Count every effect down by one tick, reverting the expired ones.
    ///
    /// Returns the effects that expired this tick.
    pub fn update_round(&mut self, state: &mut GameState) -> EngineResult<Vec<Effect>> {
        let mut expired = Vec::new();
        let mut kept = Vec::with_capacity(self.active.len());

        for mut effect in self.active.drain(..) {
            effect.rounds_remaining = effect.rounds_remaining.saturating_sub(1);
            if effect.rounds_remaining == 0 {
                expired.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.active = kept;

        for effect in &expired {
            apply_delta(state, effect.target, effect.stat, -effect.delta())?;
            debug!(effect = effect.id, target = %effect.target, stat = %effect.stat, "Effect expired");
        }
        Ok(expired)
    }

    /// Revert and drop every active effect.
    pub fn clear_all_effects(&mut self, state: &mut GameState) -> EngineResult<()> {
        for effect in self.active.drain(..) {
            // Reset may already have cleared the card store.
            if state.card(effect.target).is_some() {
                apply_delta(state, effect.target, effect.stat, -effect.delta())?;
            }
        }
        Ok(())
    }

    /// Active effects on one card, oldest first.
    pub fn effects_on(&self, target: CardKey) -> impl Iterator<Item = &Effect> {
        self.active.iter().filter(move |e| e.target == target)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.active.iter()
    }
}

fn apply_delta(state: &mut GameState, target: CardKey, stat: Stat, delta: i64) -> EngineResult<()> {
    let stats = state
        .card_mut(target)
        .and_then(|c| c.monster_mut())
        .ok_or_else(|| EngineError::inconsistent(format!("effect target {target} is not a monster")))?;
    match stat {
        Stat::Attack => stats.attack += delta,
        Stat::Defense => stats.defense += delta,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardTemplate, SpellAbility};
    use crate::core::{EngineConfig, PlayerId};

    fn setup() -> (GameState, CardKey) {
        let mut state = GameState::new(EngineConfig::default());
        let key = state.instantiate(
            &CardTemplate::monster("Apprentice Scholar", "Scholar", 1200, 1000, 1),
            PlayerId::new(0),
        );
        (state, key)
    }

    fn attack_of(state: &GameState, key: CardKey) -> i64 {
        state.card(key).unwrap().monster().unwrap().attack
    }

    #[test]
    fn test_buff_applies_immediately() {
        let (mut state, key) = setup();
        let mut tracker = EffectTracker::new();

        tracker
            .add_effect(&mut state, EffectKind::Buff, key, Stat::Attack, 300, 3)
            .unwrap();

        assert_eq!(attack_of(&state, key), 1500);
        assert_eq!(tracker.active_count(), 1);
    }

    #[test]
    fn test_reverts_after_exactly_duration_ticks() {
        let (mut state, key) = setup();
        let mut tracker = EffectTracker::new();
        tracker
            .add_effect(&mut state, EffectKind::Debuff, key, Stat::Defense, 500, 3)
            .unwrap();

        for _ in 0..2 {
            assert!(tracker.update_round(&mut state).unwrap().is_empty());
            assert_eq!(state.card(key).unwrap().monster().unwrap().defense, 500);
        }

        let expired = tracker.update_round(&mut state).unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(state.card(key).unwrap().monster().unwrap().defense, 1000);

        // Never twice.
        assert!(tracker.update_round(&mut state).unwrap().is_empty());
        assert_eq!(state.card(key).unwrap().monster().unwrap().defense, 1000);
    }

    #[test]
    fn test_effects_stack_additively() {
        let (mut state, key) = setup();
        let mut tracker = EffectTracker::new();
        tracker.add_effect(&mut state, EffectKind::Buff, key, Stat::Attack, 300, 1).unwrap();
        tracker.add_effect(&mut state, EffectKind::Debuff, key, Stat::Attack, 500, 2).unwrap();

        assert_eq!(attack_of(&state, key), 1000);
        assert_eq!(tracker.effects_on(key).count(), 2);

        tracker.update_round(&mut state).unwrap();
        assert_eq!(attack_of(&state, key), 700);

        tracker.update_round(&mut state).unwrap();
        assert_eq!(attack_of(&state, key), 1200);
    }

    #[test]
    fn test_zero_duration_lasts_one_tick() {
        let (mut state, key) = setup();
        let mut tracker = EffectTracker::new();
        tracker.add_effect(&mut state, EffectKind::Buff, key, Stat::Attack, 100, 0).unwrap();

        assert_eq!(tracker.iter().next().unwrap().rounds_remaining, 1);
        tracker.update_round(&mut state).unwrap();
        assert_eq!(attack_of(&state, key), 1200);
    }

    #[test]
    fn test_clear_all_reverts() {
        let (mut state, key) = setup();
        let mut tracker = EffectTracker::new();
        tracker.add_effect(&mut state, EffectKind::Buff, key, Stat::Attack, 300, 3).unwrap();
        tracker.add_effect(&mut state, EffectKind::Buff, key, Stat::Defense, 300, 3).unwrap();

        tracker.clear_all_effects(&mut state).unwrap();

        assert_eq!(tracker.active_count(), 0);
        assert_eq!(attack_of(&state, key), 1200);
        assert_eq!(state.card(key).unwrap().monster().unwrap().defense, 1000);
    }

    #[test]
    fn test_non_monster_target_rejected() {
        let (mut state, _) = setup();
        let spell = state.instantiate(&CardTemplate::spell("Pot of Greed", SpellAbility::DrawCards), PlayerId::new(0));
        let mut tracker = EffectTracker::new();

        let err = tracker
            .add_effect(&mut state, EffectKind::Buff, spell, Stat::Attack, 300, 3)
            .unwrap_err();

        assert_eq!(err.as_rule(), Some(&RuleViolation::WrongCardKind(spell)));
        assert_eq!(tracker.active_count(), 0);
    }
}
