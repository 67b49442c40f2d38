//! Trap resolution.
//!
//! Face-down traps are scanned in row-major order over their owner's
//! half of the field.
//!
//! - Attack traps fire when an opposing monster declares an attack,
//!   direct attacks included. Debuff traps apply and the scan continues;
//!   the first dodge or reflect trap ends the attack.
//! - Summon traps fire when an opposing monster is summoned. Every
//!   qualifying trap fires.
//!
//! A trap that fires is flipped face-up, applied, then sent to the
//! graveyard.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cards::{CardCatalog, CardKind, TrapAbility, TrapTrigger};
use crate::core::{CardKey, EngineError, EngineResult, PlayerId, RuleViolation, TimedModifier};
use crate::effects::{EffectKind, Stat};
use crate::events::GameEvent;

use super::combat::AttackOutcome;
use super::game::GameEngine;

/// What a fired trap did to its subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapResolution {
    /// Timed debuff applied; the attack or summon goes on.
    Debuffed,
    /// The attack is cancelled.
    Negated,
    /// The attacker is destroyed.
    Reflected,
}

impl<C: CardCatalog> GameEngine<C> {
    /// Fire a face-down trap against an opposing monster.
    ///
    /// The trap must be armed (face-down on the field) and the subject
    /// an opposing on-field monster.
    pub fn resolve_trap(&mut self, trap: CardKey, subject: CardKey) -> EngineResult<TrapResolution> {
        if self.state.is_game_over() {
            return Err(RuleViolation::GameOver.into());
        }
        let trap_card = self.state.require_card(trap)?;
        if !trap_card.is_armed_trap() {
            return Err(RuleViolation::WrongCardKind(trap).into());
        }
        let subject_card = self.state.require_card(subject)?;
        if subject_card.kind() != CardKind::Monster
            || !subject_card.is_placed()
            || subject_card.owner == trap_card.owner
        {
            return Err(RuleViolation::InvalidTarget.into());
        }

        Ok(self.fire_trap(trap, subject))
    }

    /// Run the defender's attack traps against `attacker`.
    ///
    /// Returns the outcome if a trap ended the attack.
    pub(super) fn spring_attack_traps(&mut self, defender: PlayerId, attacker: CardKey) -> Option<AttackOutcome> {
        for trap in self.armed_traps_for(defender, TrapTrigger::Attack) {
            match self.fire_trap(trap, attacker) {
                TrapResolution::Debuffed => {}
                TrapResolution::Negated => return Some(AttackOutcome::Negated { trap }),
                TrapResolution::Reflected => return Some(AttackOutcome::Reflected { trap }),
            }
        }
        None
    }

    /// Run the opponent's summon traps against a freshly summoned monster.
    pub(super) fn spring_summon_traps(&mut self, summoner: PlayerId, monster: CardKey) {
        let opponent = self.state.opponent_of(summoner);
        for trap in self.armed_traps_for(opponent, TrapTrigger::Summon) {
            self.fire_trap(trap, monster);
        }
    }

    fn armed_traps_for(&self, owner: PlayerId, trigger: TrapTrigger) -> Vec<CardKey> {
        self.state
            .armed_traps(owner)
            .into_iter()
            .filter(|&k| {
                self.state
                    .card(k)
                    .and_then(|c| c.trap())
                    .is_some_and(|t| t.ability.trigger() == trigger)
            })
            .collect()
    }

    /// Flip, apply and discard a validated trap.
    fn fire_trap(&mut self, trap: CardKey, subject: CardKey) -> TrapResolution {
        let spec = match self.state.card(trap).and_then(|c| c.trap()) {
            Some(trap_state) => trap_state.clone(),
            None => self.abort(EngineError::inconsistent(format!("{trap} is not a trap")), "trap"),
        };
        if let Some(card) = self.state.card_mut(trap) {
            card.face_down = false;
        }

        let config = self.state.config();
        let modifier = |base: TimedModifier| {
            TimedModifier::new(spec.value.unwrap_or(base.magnitude), spec.duration.unwrap_or(base.duration))
        };
        let (trap_debuff, summon_debuff) = (modifier(config.trap_debuff), modifier(config.summon_debuff));

        let resolution = match spec.ability {
            TrapAbility::DebuffAttack => {
                self.debuff(subject, Stat::Attack, trap_debuff);
                TrapResolution::Debuffed
            }
            TrapAbility::DebuffDefense => {
                self.debuff(subject, Stat::Defense, trap_debuff);
                TrapResolution::Debuffed
            }
            TrapAbility::DebuffSummon => {
                self.debuff(subject, Stat::Attack, summon_debuff);
                self.debuff(subject, Stat::Defense, summon_debuff);
                TrapResolution::Debuffed
            }
            TrapAbility::DodgeAttack => {
                if let Some(stats) = self.state.card_mut(subject).and_then(|c| c.monster_mut()) {
                    stats.has_attacked = true;
                }
                TrapResolution::Negated
            }
            TrapAbility::ReflectAttack => {
                self.destroy(subject);
                TrapResolution::Reflected
            }
        };

        info!(trap = %trap, ability = spec.ability.tag(), subject = %subject, result = ?resolution, "Trap triggered");
        self.events.push(GameEvent::TrapTriggered {
            trap,
            ability: spec.ability,
            subject,
        });
        self.destroy(trap);
        resolution
    }

    fn debuff(&mut self, target: CardKey, stat: Stat, modifier: TimedModifier) {
        let added = self.effects.add_effect(
            &mut self.state,
            EffectKind::Debuff,
            target,
            stat,
            modifier.magnitude,
            modifier.duration,
        );
        self.expect_consistent(added, "trap debuff");
    }
}
