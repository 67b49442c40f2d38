//! Domain events emitted by the engine.
//!
//! Every committed action emits one or more events. Renderers and
//! training harnesses read them from the `EventLog`; the engine never
//! depends on anyone consuming them.

use serde::{Deserialize, Serialize};

use crate::cards::{Mode, SpellAbility, TrapAbility};
use crate::core::{CardKey, Cell, PlayerId};
use crate::engine::AttackOutcome;

/// Something that happened in the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CardDrawn {
        player: PlayerId,
        card: CardKey,
    },
    CardSummoned {
        player: PlayerId,
        card: CardKey,
        cell: Cell,
    },
    TrapSet {
        player: PlayerId,
        card: CardKey,
        cell: Cell,
    },
    ModeToggled {
        card: CardKey,
        mode: Mode,
    },
    /// A declared attack finished, whether or not battle ran.
    AttackResolved {
        attacker: CardKey,
        outcome: AttackOutcome,
    },
    /// A face-down trap flipped and applied its ability to `subject`.
    TrapTriggered {
        trap: CardKey,
        ability: TrapAbility,
        subject: CardKey,
    },
    SpellActivated {
        spell: CardKey,
        ability: SpellAbility,
        target: Option<CardKey>,
    },
    MergeCompleted {
        sources: [CardKey; 2],
        result: CardKey,
    },
    /// A card left the field for the graveyard.
    CardDestroyed {
        card: CardKey,
        owner: PlayerId,
    },
    TurnEnded {
        player: PlayerId,
        turn: u32,
    },
}

impl GameEvent {
    /// Short name for logs and filters.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::CardDrawn { .. } => "card_drawn",
            GameEvent::CardSummoned { .. } => "card_summoned",
            GameEvent::TrapSet { .. } => "trap_set",
            GameEvent::ModeToggled { .. } => "mode_toggled",
            GameEvent::AttackResolved { .. } => "attack_resolved",
            GameEvent::TrapTriggered { .. } => "trap_triggered",
            GameEvent::SpellActivated { .. } => "spell_activated",
            GameEvent::MergeCompleted { .. } => "merge_completed",
            GameEvent::CardDestroyed { .. } => "card_destroyed",
            GameEvent::TurnEnded { .. } => "turn_ended",
        }
    }

    /// Whether the event involves the given card.
    #[must_use]
    pub fn involves(&self, key: CardKey) -> bool {
        match self {
            GameEvent::CardDrawn { card, .. }
            | GameEvent::CardSummoned { card, .. }
            | GameEvent::TrapSet { card, .. }
            | GameEvent::ModeToggled { card, .. }
            | GameEvent::CardDestroyed { card, .. } => *card == key,
            GameEvent::AttackResolved { attacker, outcome } => *attacker == key || outcome.involves(key),
            GameEvent::TrapTriggered { trap, subject, .. } => *trap == key || *subject == key,
            GameEvent::SpellActivated { spell, target, .. } => *spell == key || *target == Some(key),
            GameEvent::MergeCompleted { sources, result } => sources.contains(&key) || *result == key,
            GameEvent::TurnEnded { .. } => false,
        }
    }
}

/// Append-only buffer of events awaiting a reader.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_log() {
        let mut log = EventLog::new();
        log.push(GameEvent::TurnEnded {
            player: PlayerId::new(0),
            turn: 1,
        });
        log.push(GameEvent::CardDrawn {
            player: PlayerId::new(1),
            card: CardKey::new(3),
        });

        let events = log.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "turn_ended");
        assert!(log.is_empty());
    }

    #[test]
    fn test_involves() {
        let merge = GameEvent::MergeCompleted {
            sources: [CardKey::new(1), CardKey::new(2)],
            result: CardKey::new(9),
        };
        assert!(merge.involves(CardKey::new(2)));
        assert!(merge.involves(CardKey::new(9)));
        assert!(!merge.involves(CardKey::new(3)));
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::ModeToggled {
            card: CardKey::new(5),
            mode: Mode::Defense,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
