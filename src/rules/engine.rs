//! Legality predicates.
//!
//! `RuleEngine` borrows the state and turn manager and answers "would
//! this action be accepted?" without mutating anything. Every predicate
//! comes in two forms: `check_*` returns the structured reason, `can_*`
//! the boolean.
//!
//! Every predicate refuses once the match is over or when the acting
//! player is not the current player.

use rustc_hash::FxHashMap;

use crate::cards::{Card, CardKind, Mode, MonsterStats, SpellAbility};
use crate::core::{AttackTarget, CardKey, Cell, GameState, PlayerId, RuleViolation};
use crate::turn::TurnManager;

type RuleResult = Result<(), RuleViolation>;

/// On-field monsters sharing a type and level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeGroup {
    pub monster_type: String,
    pub level: u8,
    /// Placement order.
    pub cards: Vec<CardKey>,
}

/// Read-only legality checks over a match.
#[derive(Clone, Copy)]
pub struct RuleEngine<'a> {
    pub(crate) state: &'a GameState,
    pub(crate) turns: &'a TurnManager,
}

impl<'a> RuleEngine<'a> {
    #[must_use]
    pub fn new(state: &'a GameState, turns: &'a TurnManager) -> Self {
        Self { state, turns }
    }

    /// The match is live and it is `player`'s turn.
    pub fn check_active(&self, player: PlayerId) -> RuleResult {
        if self.state.is_game_over() {
            return Err(RuleViolation::GameOver);
        }
        if !self.turns.is_current(player) {
            return Err(RuleViolation::NotYourTurn(player));
        }
        Ok(())
    }

    pub fn check_draw(&self, player: PlayerId) -> RuleResult {
        self.check_active(player)?;
        if self.state.hand(player).len() >= self.state.config().hand_cap {
            return Err(RuleViolation::HandFull);
        }
        Ok(())
    }

    #[must_use]
    pub fn can_draw(&self, player: PlayerId) -> bool {
        self.check_draw(player).is_ok()
    }

    /// Summon a monster or set a trap from hand onto `cell`.
    pub fn check_summon(&self, player: PlayerId, card: CardKey, cell: Cell) -> RuleResult {
        self.check_active(player)?;
        if !self.state.in_hand(player, card) {
            return Err(RuleViolation::CardNotInHand(card));
        }
        let kind = self.card(card)?.kind();
        if kind == CardKind::Spell {
            return Err(RuleViolation::WrongCardKind(card));
        }
        if self.state.info(player).has_summoned(kind) {
            return Err(RuleViolation::AlreadySummoned(kind));
        }
        self.state.validate_card_placement(card, cell)
    }

    #[must_use]
    pub fn can_summon(&self, player: PlayerId, card: CardKey, cell: Cell) -> bool {
        self.check_summon(player, card, cell).is_ok()
    }

    /// Summon legality restricted to trap cards.
    pub fn check_set_trap(&self, player: PlayerId, card: CardKey, cell: Cell) -> RuleResult {
        if self.card(card)?.kind() != CardKind::Trap {
            return Err(RuleViolation::WrongCardKind(card));
        }
        self.check_summon(player, card, cell)
    }

    #[must_use]
    pub fn can_set_trap(&self, player: PlayerId, card: CardKey, cell: Cell) -> bool {
        self.check_set_trap(player, card, cell).is_ok()
    }

    pub fn check_attack(&self, attacker: PlayerId, defender: PlayerId, card: CardKey, target: AttackTarget) -> RuleResult {
        self.check_active(attacker)?;
        if self.turns.turn_count() <= 1 {
            return Err(RuleViolation::OpeningTurn);
        }
        if attacker == defender {
            return Err(RuleViolation::InvalidTarget);
        }

        let stats = self.own_monster(attacker, card)?;
        if stats.mode != Mode::Attack {
            return Err(RuleViolation::NotInAttackMode(card));
        }
        if stats.has_attacked {
            return Err(RuleViolation::AlreadyAttacked(card));
        }

        match target {
            AttackTarget::Monster(key) => {
                let target = self.card(key).map_err(|_| RuleViolation::InvalidTarget)?;
                if target.owner != defender || !target.is_placed() || target.kind() != CardKind::Monster {
                    return Err(RuleViolation::InvalidTarget);
                }
            }
            AttackTarget::Player(player) => {
                if player != defender {
                    return Err(RuleViolation::InvalidTarget);
                }
                if self.state.monster_count(defender) > 0 {
                    return Err(RuleViolation::DefenderHasMonsters);
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn can_attack(&self, attacker: PlayerId, defender: PlayerId, card: CardKey, target: AttackTarget) -> bool {
        self.check_attack(attacker, defender, card, target).is_ok()
    }

    pub fn check_toggle(&self, player: PlayerId, card: CardKey) -> RuleResult {
        self.check_active(player)?;
        self.own_monster(player, card)?;
        if self.state.info(player).has_toggled {
            return Err(RuleViolation::AlreadyToggled);
        }
        Ok(())
    }

    #[must_use]
    pub fn can_toggle(&self, player: PlayerId, card: CardKey) -> bool {
        self.check_toggle(player, card).is_ok()
    }

    /// Merge two on-field monsters of the same type and level.
    pub fn check_upgrade(&self, player: PlayerId, a: CardKey, b: CardKey) -> RuleResult {
        self.check_active(player)?;
        if a == b {
            return Err(RuleViolation::SameCard);
        }
        let first = self.own_monster(player, a)?;
        let second = self.own_monster(player, b)?;
        if first.monster_type != second.monster_type {
            return Err(RuleViolation::TypeMismatch);
        }
        if first.level != second.level {
            return Err(RuleViolation::LevelMismatch);
        }
        Ok(())
    }

    #[must_use]
    pub fn can_upgrade(&self, player: PlayerId, a: CardKey, b: CardKey) -> bool {
        self.check_upgrade(player, a, b).is_ok()
    }

    /// Cast a spell from hand.
    ///
    /// Buffs need an own on-field monster. Trap destruction needs an
    /// opposing on-field trap.
    pub fn check_cast(&self, player: PlayerId, spell: CardKey, target: Option<CardKey>) -> RuleResult {
        self.check_active(player)?;
        if !self.state.in_hand(player, spell) {
            return Err(RuleViolation::CardNotInHand(spell));
        }
        let ability = self
            .card(spell)?
            .spell_ability()
            .ok_or(RuleViolation::WrongCardKind(spell))?;

        if !ability.needs_target() {
            return Ok(());
        }
        let target_key = target.ok_or(RuleViolation::TargetRequired)?;
        let target = self.card(target_key)?;
        if !target.is_placed() {
            return Err(RuleViolation::CardNotOnBoard(target_key));
        }

        match ability {
            SpellAbility::BuffAttack | SpellAbility::BuffDefense => {
                if target.owner != player {
                    return Err(RuleViolation::NotOwner(target_key));
                }
                if target.kind() != CardKind::Monster {
                    return Err(RuleViolation::WrongCardKind(target_key));
                }
            }
            SpellAbility::DestroyTrap => {
                if target.owner == player {
                    return Err(RuleViolation::InvalidTarget);
                }
                if target.kind() != CardKind::Trap {
                    return Err(RuleViolation::WrongCardKind(target_key));
                }
            }
            SpellAbility::DrawCards | SpellAbility::ExtraSummon => {}
        }
        Ok(())
    }

    #[must_use]
    pub fn can_cast(&self, player: PlayerId, spell: CardKey, target: Option<CardKey>) -> bool {
        self.check_cast(player, spell, target).is_ok()
    }

    /// The player's on-field monsters grouped by (type, level), groups
    /// of two or more only, sorted by type then level.
    #[must_use]
    pub fn mergeable_groups(&self, player: PlayerId) -> Vec<MergeGroup> {
        let mut groups: FxHashMap<(String, u8), Vec<CardKey>> = FxHashMap::default();
        for key in self.state.cards_typed(player, CardKind::Monster) {
            if let Some(stats) = self.state.card(key).and_then(Card::monster) {
                groups
                    .entry((stats.monster_type.clone(), stats.level))
                    .or_default()
                    .push(key);
            }
        }

        let mut out: Vec<MergeGroup> = groups
            .into_iter()
            .filter(|(_, cards)| cards.len() >= 2)
            .map(|((monster_type, level), cards)| MergeGroup {
                monster_type,
                level,
                cards,
            })
            .collect();
        out.sort_by(|a, b| (&a.monster_type, a.level).cmp(&(&b.monster_type, b.level)));
        out
    }

    fn card(&self, key: CardKey) -> Result<&'a Card, RuleViolation> {
        self.state.card(key).ok_or(RuleViolation::InvalidTarget)
    }

    fn own_monster(&self, player: PlayerId, key: CardKey) -> Result<&'a MonsterStats, RuleViolation> {
        let card = self.card(key)?;
        if !card.is_placed() {
            return Err(RuleViolation::CardNotOnBoard(key));
        }
        if card.owner != player {
            return Err(RuleViolation::NotOwner(key));
        }
        card.monster().ok_or(RuleViolation::WrongCardKind(key))
    }
}
