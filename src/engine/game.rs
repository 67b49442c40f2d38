//! The match orchestrator.
//!
//! `GameEngine` is the only writer of match state. Every mutating
//! operation is a verify-then-commit transaction:
//!
//! 1. Ask `RuleEngine` whether the action is legal and look up any
//!    catalog entries it needs. A refusal returns an error with nothing
//!    changed.
//! 2. Commit the mutation, emit events, append to history.
//!
//! A state inconsistency surfacing during step 2 means the engine's own
//! bookkeeping is corrupt. The engine logs it and panics rather than
//! continue on a broken match.
//!
//! ## Example
//!
//! ```
//! use duel_engine::cards::{CardRegistry, CardTemplate};
//! use duel_engine::core::{Cell, EngineConfig, PlayerId};
//! use duel_engine::engine::GameEngine;
//!
//! let catalog = CardRegistry::from_templates([
//!     CardTemplate::monster("Apprentice Scholar", "Scholar", 1200, 1000, 1),
//! ]);
//! let mut engine = GameEngine::new(catalog, EngineConfig::default(), 7);
//! let p0 = PlayerId::new(0);
//!
//! let card = engine.grant_card(p0, "Apprentice Scholar").unwrap();
//! engine.summon_card(p0, card, Cell::new(3, 2)).unwrap();
//!
//! assert_eq!(engine.state().card_at(Cell::new(3, 2)), Some(card));
//! ```

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::cards::{CardCatalog, CardKind, CardTemplate, Mode};
use crate::core::{
    Action, ActionRecord, CardKey, Cell, EngineConfig, EngineError, EngineResult, FieldOp,
    GameRng, GameRngState, GameState, PlayerId, RuleViolation, Unavailable,
};
use crate::effects::EffectTracker;
use crate::events::{EventLog, GameEvent};
use crate::rules::{MergeGroup, RuleEngine};
use crate::turn::TurnManager;

/// A running match over a card catalog.
pub struct GameEngine<C: CardCatalog> {
    pub(super) catalog: C,
    pub(super) state: GameState,
    pub(super) turns: TurnManager,
    pub(super) effects: EffectTracker,
    pub(super) rng: GameRng,
    pub(super) events: EventLog,
    pub(super) history: Vector<ActionRecord>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    state: &'a GameState,
    turns: &'a TurnManager,
    effects: &'a EffectTracker,
    rng: GameRngState,
    history: &'a Vector<ActionRecord>,
}

#[derive(Deserialize)]
struct Snapshot {
    state: GameState,
    turns: TurnManager,
    effects: EffectTracker,
    rng: GameRngState,
    history: Vector<ActionRecord>,
}

impl<C: CardCatalog> GameEngine<C> {
    /// Create a match at turn 1 with empty zones.
    #[must_use]
    pub fn new(catalog: C, config: EngineConfig, seed: u64) -> Self {
        let turns = TurnManager::new(config.player_count);
        Self {
            catalog,
            state: GameState::new(config),
            turns,
            effects: EffectTracker::new(),
            rng: GameRng::new(seed),
            events: EventLog::new(),
            history: Vector::new(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub fn turns(&self) -> &TurnManager {
        &self.turns
    }

    #[must_use]
    pub fn effects(&self) -> &EffectTracker {
        &self.effects
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turns.current_player()
    }

    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turns.turn_count()
    }

    /// Legality checks over the current match.
    #[must_use]
    pub fn rules(&self) -> RuleEngine<'_> {
        RuleEngine::new(&self.state, &self.turns)
    }

    /// Every action the current player could take.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        self.rules().legal_actions(self.current_player())
    }

    /// On-field monsters the player could merge, grouped by type and level.
    #[must_use]
    pub fn get_mergeable_groups(&self, player: PlayerId) -> Vec<MergeGroup> {
        self.rules().mergeable_groups(player)
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner()
    }

    /// Committed actions, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take every pending event.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // === Setup ===

    /// Instantiate catalog cards into a player's deck, last name on top.
    ///
    /// All names are resolved before any card is created.
    pub fn load_deck<I, S>(&mut self, player: PlayerId, names: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let templates = names
            .into_iter()
            .map(|name| self.template(name.as_ref()).cloned())
            .collect::<EngineResult<Vec<_>>>()?;

        for template in &templates {
            let key = self.state.instantiate(template, player);
            self.state.push_deck(player, key);
        }
        debug!(player = %player, cards = templates.len(), "Deck loaded");
        Ok(())
    }

    pub fn shuffle_deck(&mut self, player: PlayerId) {
        self.state.shuffle_deck(player, &mut self.rng);
    }

    /// Instantiate a catalog card straight into a player's hand.
    ///
    /// Ignores the hand cap and the turn order.
    pub fn grant_card(&mut self, player: PlayerId, name: &str) -> EngineResult<CardKey> {
        let template = self.template(name)?.clone();
        let key = self.state.instantiate(&template, player);
        self.state.add_to_hand(player, key);
        debug!(player = %player, card = %key, name, "Card granted");
        Ok(key)
    }

    /// Draw the opening hand for every player, turn order aside.
    ///
    /// Stops early for a player whose deck runs out or whose hand is full.
    pub fn deal_opening_hands(&mut self) {
        let count = self.state.config().opening_hand;
        for player in PlayerId::all(self.state.player_count()) {
            for _ in 0..count {
                if self.draw_unchecked(player).is_none() {
                    break;
                }
            }
        }
    }

    /// Return to a fresh match: effects reverted, zones and field empty,
    /// life restored, turn 1, no history or pending events.
    ///
    /// The RNG keeps its position, so the next match plays differently.
    pub fn reset(&mut self) {
        let cleared = self.effects.clear_all_effects(&mut self.state);
        self.expect_consistent(cleared, "reset");
        self.state.reset();
        self.turns.reset();
        self.events.clear();
        self.history = Vector::new();
        info!("Match reset");
    }

    // === Actions ===

    /// Apply an action for the current player.
    pub fn apply(&mut self, action: &Action) -> EngineResult<()> {
        let player = self.current_player();
        match *action {
            Action::Draw => self.draw_card(player).map(drop),
            Action::Summon { card, cell } => self.summon_card(player, card, cell),
            Action::SetTrap { card, cell } => self.set_trap(player, card, cell),
            Action::Toggle { card } => self.toggle_card(player, card).map(drop),
            Action::Attack { card, target } => {
                let defender = self.state.opponent_of(player);
                self.attack(player, defender, card, target).map(drop)
            }
            Action::CastSpell { spell, target } => self.cast_spell(player, spell, target),
            Action::Merge { a, b } => self.upgrade_monster(player, a, b).map(drop),
            Action::EndTurn => self.end_turn(),
        }
    }

    /// Move the top card of the player's deck to their hand.
    pub fn draw_card(&mut self, player: PlayerId) -> EngineResult<CardKey> {
        self.gate(self.rules().check_draw(player), "draw")?;
        if self.state.deck(player).is_empty() {
            debug!(player = %player, "Draw refused: deck empty");
            return Err(Unavailable::DeckEmpty(player).into());
        }

        let key = self
            .draw_unchecked(player)
            .ok_or_else(|| EngineError::inconsistent("deck emptied during draw"));
        let key = self.expect_consistent(key, "draw");
        self.record(player, Action::Draw);
        Ok(key)
    }

    /// Summon a monster or set a trap from hand.
    ///
    /// A monster summon springs the opponent's face-down summon traps.
    pub fn summon_card(&mut self, player: PlayerId, card: CardKey, cell: Cell) -> EngineResult<()> {
        self.gate(self.rules().check_summon(player, card, cell), "summon")?;
        self.place_from_hand(player, card, cell);

        let action = match self.kind_of(card) {
            CardKind::Trap => Action::SetTrap { card, cell },
            _ => Action::Summon { card, cell },
        };
        self.record(player, action);
        Ok(())
    }

    /// Set a trap face-down.
    pub fn set_trap(&mut self, player: PlayerId, card: CardKey, cell: Cell) -> EngineResult<()> {
        self.gate(self.rules().check_set_trap(player, card, cell), "set_trap")?;
        self.place_from_hand(player, card, cell);
        self.record(player, Action::SetTrap { card, cell });
        Ok(())
    }

    /// Flip a monster between attack and defense mode. Returns the new mode.
    pub fn toggle_card(&mut self, player: PlayerId, card: CardKey) -> EngineResult<Mode> {
        self.gate(self.rules().check_toggle(player, card), "toggle")?;

        let mode = match self.state.card_mut(card).and_then(|c| c.monster_mut()) {
            Some(stats) => {
                stats.mode = stats.mode.flipped();
                stats.mode
            }
            None => self.abort(EngineError::inconsistent(format!("{card} lost its monster body")), "toggle"),
        };
        self.state.info_mut(player).has_toggled = true;

        info!(player = %player, card = %card, mode = ?mode, "Mode toggled");
        self.events.push(GameEvent::ModeToggled { card, mode });
        self.record(player, Action::Toggle { card });
        Ok(mode)
    }

    /// End the current player's turn and draw for the next player.
    ///
    /// The next player's draw is skipped when their deck is empty or
    /// their hand is full.
    pub fn end_turn(&mut self) -> EngineResult<()> {
        if self.state.is_game_over() {
            return self.gate(Err(RuleViolation::GameOver), "end_turn");
        }

        let ending = self.current_player();
        let turn = self.turn_count();
        self.record(ending, Action::EndTurn);

        let expired = self.turns.end_turn(&mut self.state, &mut self.effects);
        let expired = self.expect_consistent(expired, "end_turn");
        self.events.push(GameEvent::TurnEnded { player: ending, turn });
        info!(player = %ending, turn, expired = expired.len(), "Turn ended");

        let next = self.current_player();
        if self.rules().can_draw(next) {
            self.draw_unchecked(next);
        }
        Ok(())
    }

    // === Snapshots ===

    /// Encode the full mutable match state.
    pub fn snapshot(&self) -> EngineResult<Vec<u8>> {
        let snapshot = SnapshotRef {
            state: &self.state,
            turns: &self.turns,
            effects: &self.effects,
            rng: self.rng.state(),
            history: &self.history,
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Replace the match state with a snapshot. Pending events are dropped.
    ///
    /// The snapshot is decoded and checked before anything is replaced.
    pub fn restore(&mut self, bytes: &[u8]) -> EngineResult<()> {
        let snapshot: Snapshot = bincode::deserialize(bytes)?;
        snapshot.state.check_invariants()?;

        self.state = snapshot.state;
        self.turns = snapshot.turns;
        self.effects = snapshot.effects;
        self.rng = GameRng::from_state(&snapshot.rng);
        self.history = snapshot.history;
        self.events.clear();
        debug!(turn = self.turn_count(), "Snapshot restored");
        Ok(())
    }

    // === Internals ===

    pub(super) fn template(&self, name: &str) -> EngineResult<&CardTemplate> {
        self.catalog
            .by_name(name)
            .ok_or_else(|| Unavailable::UnknownTemplate(name.to_string()).into())
    }

    pub(super) fn kind_of(&self, card: CardKey) -> CardKind {
        match self.state.card(card) {
            Some(c) => c.kind(),
            None => self.abort(EngineError::inconsistent(format!("{card} vanished mid-action")), "lookup"),
        }
    }

    /// Log a refused action and convert the reason.
    pub(super) fn gate(&self, check: Result<(), RuleViolation>, action: &'static str) -> EngineResult<()> {
        check.map_err(|reason| {
            debug!(player = %self.current_player(), action, reason = %reason, "Action refused");
            EngineError::from(reason)
        })
    }

    pub(super) fn record(&mut self, player: PlayerId, action: Action) {
        let sequence = self.history.len() as u32;
        self.history
            .push_back(ActionRecord::new(player, action, self.turns.turn_count(), sequence));
    }

    /// Unwrap a commit-phase result, aborting on failure.
    pub(super) fn expect_consistent<T>(&self, result: EngineResult<T>, action: &'static str) -> T {
        match result {
            Ok(value) => value,
            Err(err) => self.abort(err, action),
        }
    }

    pub(super) fn abort(&self, err: EngineError, action: &'static str) -> ! {
        error!(action, error = %err, turn = self.turn_count(), "Engine state corrupt, aborting");
        panic!("{action}: {err}");
    }

    /// Top deck card to hand, if the deck has one and the hand has room.
    pub(super) fn draw_unchecked(&mut self, player: PlayerId) -> Option<CardKey> {
        if self.state.hand(player).len() >= self.state.config().hand_cap {
            return None;
        }
        let key = self.state.draw_from_deck(player)?;
        debug!(player = %player, card = %key, "Card drawn");
        self.events.push(GameEvent::CardDrawn { player, card: key });
        Some(key)
    }

    /// Commit a validated summon or trap set.
    fn place_from_hand(&mut self, player: PlayerId, card: CardKey, cell: Cell) {
        let kind = self.kind_of(card);

        self.state.remove_from_hand(player, card);
        let flags = self.state.info_mut(player);
        match kind {
            CardKind::Monster => flags.has_summoned_monster = true,
            CardKind::Trap => flags.has_summoned_trap = true,
            CardKind::Spell => {}
        }
        let placed = self.state.modify_field(FieldOp::Add, card, cell);
        self.expect_consistent(placed, "summon");

        if kind == CardKind::Trap {
            info!(player = %player, card = %card, cell = %cell, "Trap set");
            self.events.push(GameEvent::TrapSet { player, card, cell });
        } else {
            info!(player = %player, card = %card, cell = %cell, "Monster summoned");
            self.events.push(GameEvent::CardSummoned { player, card, cell });
            self.spring_summon_traps(player, card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRegistry, SpellAbility};

    fn catalog() -> CardRegistry {
        CardRegistry::from_templates([
            CardTemplate::monster("Imp", "Demon", 900, 600, 1),
            CardTemplate::spell("Pot of Greed", SpellAbility::DrawCards),
        ])
    }

    fn engine() -> GameEngine<CardRegistry> {
        GameEngine::new(catalog(), EngineConfig::default(), 11)
    }

    fn p0() -> PlayerId {
        PlayerId::new(0)
    }

    fn p1() -> PlayerId {
        PlayerId::new(1)
    }

    #[test]
    fn test_load_deck_resolves_all_names_first() {
        let mut engine = engine();

        let err = engine.load_deck(p0(), ["Imp", "Nope"]).unwrap_err();
        assert!(matches!(err, EngineError::Unavailable(Unavailable::UnknownTemplate(ref n)) if n == "Nope"));
        assert!(engine.state().deck(p0()).is_empty());

        engine.load_deck(p0(), ["Imp", "Pot of Greed"]).unwrap();
        assert_eq!(engine.state().deck(p0()).len(), 2);
    }

    #[test]
    fn test_draw_takes_top_card() {
        let mut engine = engine();
        engine.load_deck(p0(), ["Imp", "Pot of Greed"]).unwrap();
        let top = *engine.state().deck(p0()).last().unwrap();

        let drawn = engine.draw_card(p0()).unwrap();

        assert_eq!(drawn, top);
        assert_eq!(engine.state().hand(p0()), &[top]);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(
            engine.drain_events(),
            vec![GameEvent::CardDrawn { player: p0(), card: top }]
        );
    }

    #[test]
    fn test_draw_empty_deck() {
        let mut engine = engine();
        let err = engine.draw_card(p0()).unwrap_err();
        assert!(matches!(err, EngineError::Unavailable(Unavailable::DeckEmpty(p)) if p == p0()));
    }

    #[test]
    fn test_draw_out_of_turn_is_rule_violation() {
        let mut engine = engine();
        engine.load_deck(p1(), ["Imp"]).unwrap();
        let err = engine.draw_card(p1()).unwrap_err();
        assert_eq!(err.as_rule(), Some(&RuleViolation::NotYourTurn(p1())));
    }

    #[test]
    fn test_deal_opening_hands() {
        let mut engine = engine();
        engine.load_deck(p0(), vec!["Imp"; 7]).unwrap();
        engine.load_deck(p1(), vec!["Imp"; 3]).unwrap();

        engine.deal_opening_hands();

        assert_eq!(engine.state().hand(p0()).len(), 5);
        assert_eq!(engine.state().deck(p0()).len(), 2);
        assert_eq!(engine.state().hand(p1()).len(), 3);
    }

    #[test]
    fn test_end_turn_draws_for_next_player() {
        let mut engine = engine();
        engine.load_deck(p1(), ["Imp"]).unwrap();

        engine.end_turn().unwrap();

        assert_eq!(engine.current_player(), p1());
        assert_eq!(engine.turn_count(), 2);
        assert_eq!(engine.state().hand(p1()).len(), 1);
        let names: Vec<_> = engine.drain_events().iter().map(GameEvent::name).collect();
        assert_eq!(names, vec!["turn_ended", "card_drawn"]);
    }

    #[test]
    fn test_toggle_flips_mode() {
        let mut engine = engine();
        let card = engine.grant_card(p0(), "Imp").unwrap();
        engine.summon_card(p0(), card, Cell::new(3, 0)).unwrap();

        assert_eq!(engine.toggle_card(p0(), card).unwrap(), Mode::Defense);
        let err = engine.toggle_card(p0(), card).unwrap_err();
        assert_eq!(err.as_rule(), Some(&RuleViolation::AlreadyToggled));
    }

    #[test]
    fn test_apply_records_history() {
        let mut engine = engine();
        let card = engine.grant_card(p0(), "Imp").unwrap();

        engine.apply(&Action::Summon { card, cell: Cell::new(2, 2) }).unwrap();
        engine.apply(&Action::EndTurn).unwrap();

        let history = engine.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, Action::Summon { card, cell: Cell::new(2, 2) });
        assert_eq!(history[1].sequence, 1);
        assert_eq!(history[1].turn, 1);
    }

    #[test]
    fn test_game_over_gate() {
        let mut engine = engine();
        let card = engine.grant_card(p0(), "Imp").unwrap();
        engine.state.players[p1()].take_damage(8000);

        let err = engine.summon_card(p0(), card, Cell::new(2, 0)).unwrap_err();
        assert_eq!(err.as_rule(), Some(&RuleViolation::GameOver));
        assert_eq!(engine.end_turn().unwrap_err().as_rule(), Some(&RuleViolation::GameOver));
        assert_eq!(engine.winner(), Some(p0()));
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        engine.load_deck(p0(), ["Imp", "Imp"]).unwrap();
        let card = engine.grant_card(p0(), "Imp").unwrap();
        engine.summon_card(p0(), card, Cell::new(2, 0)).unwrap();
        engine.end_turn().unwrap();

        engine.reset();

        assert_eq!(engine.turn_count(), 1);
        assert_eq!(engine.current_player(), p0());
        assert!(engine.state().player_cards(p0()).is_empty());
        assert!(engine.state().deck(p0()).is_empty());
        assert!(engine.history().is_empty());
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut engine = engine();
        engine.load_deck(p0(), ["Imp", "Imp", "Pot of Greed"]).unwrap();
        engine.shuffle_deck(p0());
        engine.draw_card(p0()).unwrap();
        let bytes = engine.snapshot().unwrap();
        let hand = engine.state().hand(p0()).to_vec();

        engine.end_turn().unwrap();
        engine.end_turn().unwrap();
        assert_ne!(engine.state().hand(p0()), hand.as_slice());

        engine.restore(&bytes).unwrap();
        assert_eq!(engine.state().hand(p0()), hand.as_slice());
        assert_eq!(engine.turn_count(), 1);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let mut engine = engine();
        let err = engine.restore(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, EngineError::Snapshot(_)));
    }
}
