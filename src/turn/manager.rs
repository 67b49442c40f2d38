//! Turn order and the end-of-turn sequence.
//!
//! A round-robin counter over the seats. There is no phase machine:
//! `get_phase_count` exists for display and never gates legality.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::CardKind;
use crate::core::{EngineResult, GameState, PlayerId};
use crate::effects::{Effect, EffectTracker};

/// Current seat and turn counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnManager {
    current: PlayerId,
    turn_count: u32,
    player_count: usize,
}

impl TurnManager {
    /// Start at turn 1 with seat 0 to act.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            current: PlayerId::new(0),
            turn_count: 1,
            player_count,
        }
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    #[must_use]
    pub fn is_current(&self, player: PlayerId) -> bool {
        self.current == player
    }

    /// Whole rounds completed, for display.
    #[must_use]
    pub fn get_phase_count(&self) -> u32 {
        self.turn_count / self.player_count as u32
    }

    /// Close the current player's turn.
    ///
    /// Clears the ending player's turn flags and their monsters'
    /// attack flags, ticks every effect once, then hands the turn on.
    /// Returns the effects that expired.
    pub fn end_turn(&mut self, state: &mut GameState, effects: &mut EffectTracker) -> EngineResult<Vec<Effect>> {
        let ending = self.current;

        state.info_mut(ending).reset_turn_flags();
        for key in state.cards_typed(ending, CardKind::Monster) {
            if let Some(stats) = state.card_mut(key).and_then(|c| c.monster_mut()) {
                stats.has_attacked = false;
            }
        }

        let expired = effects.update_round(state)?;

        self.current = ending.next(self.player_count);
        self.turn_count += 1;
        debug!(ended = %ending, next = %self.current, turn = self.turn_count, "Turn advanced");
        Ok(expired)
    }

    /// Back to turn 1, seat 0.
    pub fn reset(&mut self) {
        self.current = PlayerId::new(0);
        self.turn_count = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardTemplate;
    use crate::core::{Cell, EngineConfig, FieldOp};
    use crate::effects::{EffectKind, Stat};

    #[test]
    fn test_round_robin() {
        let mut state = GameState::new(EngineConfig::default());
        let mut effects = EffectTracker::new();
        let mut turns = TurnManager::new(2);

        assert_eq!(turns.current_player(), PlayerId::new(0));
        assert_eq!(turns.turn_count(), 1);
        assert_eq!(turns.get_phase_count(), 0);

        turns.end_turn(&mut state, &mut effects).unwrap();
        assert_eq!(turns.current_player(), PlayerId::new(1));
        assert_eq!(turns.turn_count(), 2);
        assert_eq!(turns.get_phase_count(), 1);

        turns.end_turn(&mut state, &mut effects).unwrap();
        assert_eq!(turns.current_player(), PlayerId::new(0));
        assert_eq!(turns.get_phase_count(), 1);
    }

    #[test]
    fn test_end_turn_clears_flags() {
        let mut state = GameState::new(EngineConfig::default());
        let mut effects = EffectTracker::new();
        let mut turns = TurnManager::new(2);
        let p0 = PlayerId::new(0);

        let key = state.instantiate(&CardTemplate::monster("Imp", "Demon", 900, 600, 1), p0);
        state.modify_field(FieldOp::Add, key, Cell::new(2, 0)).unwrap();
        state.card_mut(key).unwrap().monster_mut().unwrap().has_attacked = true;
        let info = state.info_mut(p0);
        info.has_summoned_monster = true;
        info.has_summoned_trap = true;
        info.has_toggled = true;

        turns.end_turn(&mut state, &mut effects).unwrap();

        let info = state.info(p0);
        assert!(!info.has_summoned_monster);
        assert!(!info.has_summoned_trap);
        assert!(!info.has_toggled);
        assert!(!state.card(key).unwrap().monster().unwrap().has_attacked);
    }

    #[test]
    fn test_end_turn_ticks_effects_once() {
        let mut state = GameState::new(EngineConfig::default());
        let mut effects = EffectTracker::new();
        let mut turns = TurnManager::new(2);
        let key = state.instantiate(&CardTemplate::monster("Imp", "Demon", 900, 600, 1), PlayerId::new(1));
        effects
            .add_effect(&mut state, EffectKind::Buff, key, Stat::Attack, 300, 2)
            .unwrap();

        assert!(turns.end_turn(&mut state, &mut effects).unwrap().is_empty());
        let expired = turns.end_turn(&mut state, &mut effects).unwrap();

        assert_eq!(expired.len(), 1);
        assert_eq!(state.card(key).unwrap().monster().unwrap().attack, 900);
    }
}
