//! Monster merges.
//!
//! Two on-field monsters of the same type and level combine into the
//! catalog's monster of that type one level up. The sources go to the
//! graveyard and the new monster takes the second source's cell.

use tracing::{info, warn};

use crate::cards::{Card, CardCatalog};
use crate::core::{Action, CardKey, EngineError, EngineResult, FieldOp, PlayerId, Unavailable};
use crate::events::GameEvent;

use super::game::GameEngine;

impl<C: CardCatalog> GameEngine<C> {
    /// Merge `a` and `b` into a higher-level monster. Returns the new card.
    ///
    /// Fails without mutation if the catalog has no monster of that type
    /// at the next level.
    pub fn upgrade_monster(&mut self, player: PlayerId, a: CardKey, b: CardKey) -> EngineResult<CardKey> {
        self.gate(self.rules().check_upgrade(player, a, b), "merge")?;

        let (monster_type, level) = match self.state.card(a).and_then(Card::monster) {
            Some(stats) => (stats.monster_type.clone(), stats.level),
            None => self.abort(EngineError::inconsistent(format!("{a} is not a monster")), "merge"),
        };
        let cell = match self.state.card(b).and_then(|c| c.position) {
            Some(cell) => cell,
            None => self.abort(EngineError::inconsistent(format!("{b} is not on the field")), "merge"),
        };

        let template = level
            .checked_add(1)
            .and_then(|next| self.catalog.monster(&monster_type, next))
            .cloned();
        let Some(template) = template else {
            warn!(monster_type = %monster_type, level, "No upgrade in catalog");
            return Err(Unavailable::NoMonster {
                monster_type,
                level: level.saturating_add(1),
            }
            .into());
        };

        let moved = self
            .state
            .send_to_graveyard(a)
            .and_then(|()| self.state.send_to_graveyard(b));
        self.expect_consistent(moved, "merge");

        let result = self.state.instantiate(&template, player);
        let placed = self.state.modify_field(FieldOp::Add, result, cell);
        self.expect_consistent(placed, "merge");

        info!(
            player = %player,
            sources = ?(a, b),
            result = %result,
            name = %template.name,
            cell = %cell,
            "Monsters merged"
        );
        self.events.push(GameEvent::MergeCompleted { sources: [a, b], result });
        self.record(player, Action::Merge { a, b });
        Ok(result)
    }
}
