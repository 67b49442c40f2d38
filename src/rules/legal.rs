//! Legal-action enumeration.
//!
//! Walks every action shape and keeps the ones the predicates accept.
//! RL clients use this as their action mask; it also drives random
//! rollouts in tests and benches.

use crate::cards::CardKind;
use crate::core::{Action, AttackTarget, PlayerId};

use super::engine::RuleEngine;

impl RuleEngine<'_> {
    /// Every action `player` could take right now.
    ///
    /// Empty when the match is over or it is not the player's turn.
    /// Otherwise always contains `EndTurn`. Drawing needs a non-empty
    /// deck. Merges are listed once per unordered pair; the upgraded
    /// monster lands on `b`'s cell.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        if self.check_active(player).is_err() {
            return Vec::new();
        }

        let state = self.state;
        let mut actions = Vec::new();

        if self.can_draw(player) && !state.deck(player).is_empty() {
            actions.push(Action::Draw);
        }

        let empty = state.empty_slots(player);
        for &card in state.hand(player) {
            let Some(kind) = state.card(card).map(|c| c.kind()) else { continue };
            match kind {
                CardKind::Monster => actions.extend(
                    empty
                        .iter()
                        .filter(|&&cell| self.can_summon(player, card, cell))
                        .map(|&cell| Action::Summon { card, cell }),
                ),
                CardKind::Trap => actions.extend(
                    empty
                        .iter()
                        .filter(|&&cell| self.can_set_trap(player, card, cell))
                        .map(|&cell| Action::SetTrap { card, cell }),
                ),
                CardKind::Spell => {
                    if self.can_cast(player, card, None) {
                        actions.push(Action::CastSpell { spell: card, target: None });
                    } else {
                        let opponent = state.opponent_of(player);
                        for &target in state.player_cards(player).iter().chain(state.player_cards(opponent)) {
                            if self.can_cast(player, card, Some(target)) {
                                actions.push(Action::CastSpell {
                                    spell: card,
                                    target: Some(target),
                                });
                            }
                        }
                    }
                }
            }
        }

        let opponent = state.opponent_of(player);
        let own_monsters = state.cards_typed(player, CardKind::Monster);
        let their_monsters = state.cards_typed(opponent, CardKind::Monster);

        for &card in &own_monsters {
            if self.can_toggle(player, card) {
                actions.push(Action::Toggle { card });
            }
        }

        for &card in &own_monsters {
            let targets = their_monsters
                .iter()
                .map(|&k| AttackTarget::Monster(k))
                .chain(std::iter::once(AttackTarget::Player(opponent)));
            for target in targets {
                if self.can_attack(player, opponent, card, target) {
                    actions.push(Action::Attack { card, target });
                }
            }
        }

        for group in self.mergeable_groups(player) {
            for (i, &a) in group.cards.iter().enumerate() {
                for &b in &group.cards[i + 1..] {
                    actions.push(Action::Merge { a, b });
                }
            }
        }

        actions.push(Action::EndTurn);
        actions
    }
}

#[cfg(test)]
mod tests {
    use crate::cards::{CardTemplate, SpellAbility, TrapAbility};
    use crate::core::{Action, AttackTarget, Cell, EngineConfig, FieldOp, GameState, PlayerId};
    use crate::effects::EffectTracker;
    use crate::rules::RuleEngine;
    use crate::turn::TurnManager;

    fn p0() -> PlayerId {
        PlayerId::new(0)
    }

    #[test]
    fn test_not_your_turn_is_empty() {
        let state = GameState::new(EngineConfig::default());
        let turns = TurnManager::new(2);

        assert!(RuleEngine::new(&state, &turns).legal_actions(PlayerId::new(1)).is_empty());
    }

    #[test]
    fn test_fresh_turn_with_empty_deck() {
        let state = GameState::new(EngineConfig::default());
        let turns = TurnManager::new(2);

        assert_eq!(RuleEngine::new(&state, &turns).legal_actions(p0()), vec![Action::EndTurn]);
    }

    #[test]
    fn test_hand_and_board_actions() {
        let mut state = GameState::new(EngineConfig::default());
        let mut turns = TurnManager::new(2);
        let mut effects = EffectTracker::new();
        turns.end_turn(&mut state, &mut effects).unwrap();
        turns.end_turn(&mut state, &mut effects).unwrap();

        let imp = CardTemplate::monster("Imp", "Demon", 900, 600, 1);
        let a = state.instantiate(&imp, p0());
        let b = state.instantiate(&imp, p0());
        state.modify_field(FieldOp::Add, a, Cell::new(2, 0)).unwrap();
        state.modify_field(FieldOp::Add, b, Cell::new(2, 1)).unwrap();

        let in_hand = state.instantiate(&imp, p0());
        let trap = state.instantiate(&CardTemplate::trap("Phantom Dodge", TrapAbility::DodgeAttack), p0());
        let buff = state.instantiate(&CardTemplate::spell("Maniac War", SpellAbility::BuffAttack), p0());
        for key in [in_hand, trap, buff] {
            state.add_to_hand(p0(), key);
        }
        let deck_card = state.instantiate(&imp, p0());
        state.push_deck(p0(), deck_card);

        let actions = RuleEngine::new(&state, &turns).legal_actions(p0());
        let count = |pred: &dyn Fn(&Action) -> bool| actions.iter().filter(|a| pred(a)).count();

        assert!(actions.contains(&Action::Draw));
        // Eight empty own cells for each placeable card.
        assert_eq!(count(&|a| matches!(a, Action::Summon { .. })), 8);
        assert_eq!(count(&|a| matches!(a, Action::SetTrap { .. })), 8);
        assert_eq!(count(&|a| matches!(a, Action::CastSpell { .. })), 2);
        assert_eq!(count(&|a| matches!(a, Action::Toggle { .. })), 2);
        assert!(actions.contains(&Action::Attack {
            card: a,
            target: AttackTarget::Player(PlayerId::new(1))
        }));
        assert!(actions.contains(&Action::Merge { a, b }));
        assert_eq!(actions.last(), Some(&Action::EndTurn));
    }
}
