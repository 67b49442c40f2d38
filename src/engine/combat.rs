//! Attack declaration and battle resolution.
//!
//! ## Battle rules
//!
//! Against a monster in attack mode the higher attack value wins: the
//! loser is destroyed and its owner takes the difference as damage.
//! Equal values destroy both with no damage.
//!
//! Against a monster in defense mode the attacker's attack is compared
//! with the defender's defense. Strictly greater destroys the defender
//! with no damage; strictly less damages the attacker's owner by the
//! difference; a tie does nothing.
//!
//! A direct attack subtracts the attacker's attack from the defending
//! player's life. An attack at or below zero deals no damage.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::cards::{CardCatalog, Mode};
use crate::core::{Action, AttackTarget, CardKey, EngineError, EngineResult, PlayerId};
use crate::events::GameEvent;

use super::game::GameEngine;

/// Life points lost by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub player: PlayerId,
    pub amount: i64,
}

/// What a battle did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Cards sent to the graveyard, attacker first when both fell.
    pub destroyed: SmallVec<[CardKey; 2]>,
    pub damage: Option<Damage>,
}

/// How a declared attack ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// A dodge trap cancelled the attack.
    Negated { trap: CardKey },
    /// A reflect trap destroyed the attacker.
    Reflected { trap: CardKey },
    /// Battle ran.
    Battle(BattleReport),
}

impl AttackOutcome {
    /// Whether battle resolution ran.
    #[must_use]
    pub fn reached_battle(&self) -> bool {
        matches!(self, AttackOutcome::Battle(_))
    }

    #[must_use]
    pub fn involves(&self, key: CardKey) -> bool {
        match self {
            AttackOutcome::Negated { trap } | AttackOutcome::Reflected { trap } => *trap == key,
            AttackOutcome::Battle(report) => report.destroyed.contains(&key),
        }
    }
}

impl<C: CardCatalog> GameEngine<C> {
    /// Declare an attack.
    ///
    /// The defender's face-down attack traps are checked first, in
    /// row-major order. A dodge or reflect trap ends the attack before
    /// battle. The attacking monster is marked as having attacked
    /// whatever the outcome.
    pub fn attack(
        &mut self,
        attacker: PlayerId,
        defender: PlayerId,
        card: CardKey,
        target: AttackTarget,
    ) -> EngineResult<AttackOutcome> {
        self.gate(self.rules().check_attack(attacker, defender, card, target), "attack")?;
        debug!(attacker = %attacker, card = %card, target = ?target, "Attack declared");

        if let Some(stats) = self.state.card_mut(card).and_then(|c| c.monster_mut()) {
            stats.has_attacked = true;
        }

        let outcome = match self.spring_attack_traps(defender, card) {
            Some(stopped) => stopped,
            None => AttackOutcome::Battle(self.resolve_battle(card, target)),
        };

        info!(
            attacker = %attacker,
            card = %card,
            outcome = ?outcome,
            life = ?(self.state.player(attacker).life_points, self.state.player(defender).life_points),
            "Attack resolved"
        );
        self.events.push(GameEvent::AttackResolved {
            attacker: card,
            outcome: outcome.clone(),
        });
        self.record(attacker, Action::Attack { card, target });
        Ok(outcome)
    }

    fn resolve_battle(&mut self, card: CardKey, target: AttackTarget) -> BattleReport {
        let report = self.compute_battle(card, target);
        let report = self.expect_consistent(report, "battle");

        for &key in &report.destroyed {
            self.destroy(key);
        }
        if let Some(Damage { player, amount }) = report.damage {
            self.state.players[player].take_damage(amount);
        }
        report
    }

    /// Decide a battle without touching state.
    fn compute_battle(&self, card: CardKey, target: AttackTarget) -> EngineResult<BattleReport> {
        let attacker = self.state.require_card(card)?;
        let atk = attacker
            .monster()
            .map(|m| m.attack)
            .ok_or_else(|| EngineError::inconsistent(format!("attacker {card} is not a monster")))?;

        let mut report = BattleReport::default();
        match target {
            AttackTarget::Player(player) => {
                // Debuffs may leave attack negative; that deals nothing.
                report.damage = (atk > 0).then_some(Damage { player, amount: atk });
            }
            AttackTarget::Monster(key) => {
                let defender = self.state.require_card(key)?;
                let stats = defender
                    .monster()
                    .ok_or_else(|| EngineError::inconsistent(format!("target {key} is not a monster")))?;

                match stats.mode {
                    Mode::Attack => {
                        if atk > stats.attack {
                            report.destroyed.push(key);
                            report.damage = Some(Damage {
                                player: defender.owner,
                                amount: atk - stats.attack,
                            });
                        } else if atk < stats.attack {
                            report.destroyed.push(card);
                            report.damage = Some(Damage {
                                player: attacker.owner,
                                amount: stats.attack - atk,
                            });
                        } else {
                            report.destroyed.push(card);
                            report.destroyed.push(key);
                        }
                    }
                    Mode::Defense => {
                        if atk > stats.defense {
                            report.destroyed.push(key);
                        } else if atk < stats.defense {
                            report.damage = Some(Damage {
                                player: attacker.owner,
                                amount: stats.defense - atk,
                            });
                        }
                    }
                }
            }
        }
        Ok(report)
    }

    /// Send a card to its owner's graveyard and announce it.
    pub(super) fn destroy(&mut self, key: CardKey) {
        let owner = self.state.card(key).map(|c| c.owner);
        let moved = self.state.send_to_graveyard(key);
        self.expect_consistent(moved, "destroy");
        if let Some(owner) = owner {
            debug!(card = %key, owner = %owner, "Card destroyed");
            self.events.push(GameEvent::CardDestroyed { card: key, owner });
        }
    }
}
