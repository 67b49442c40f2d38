//! Engine errors.
//!
//! Three kinds of failure reach callers:
//!
//! - `Rule`: the action is outside its legality window. Nothing changed;
//!   the caller may pick another action.
//! - `Unavailable`: a catalog entry, deck card or card key the action
//!   needs does not exist. Nothing changed.
//! - `Inconsistent`: an internal invariant broke (grid and card
//!   positions disagree, board index out of sync). This is a bug in the
//!   engine; the engine aborts rather than continue on corrupt state.

use thiserror::Error;

use super::entity::{CardKey, Cell};
use super::player::PlayerId;
use crate::cards::CardKind;

/// Why an action was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),
    #[error("the match is over")]
    GameOver,
    #[error("{0} is not in the player's hand")]
    CardNotInHand(CardKey),
    #[error("{0} is not on the field")]
    CardNotOnBoard(CardKey),
    #[error("a {0} was already summoned this turn")]
    AlreadySummoned(CardKind),
    #[error("cell {0} is outside the field")]
    OutOfBounds(Cell),
    #[error("cell {0} is occupied")]
    CellOccupied(Cell),
    #[error("cell {0} belongs to the other player")]
    CellNotOwned(Cell),
    #[error("the player's side of the field is full")]
    BoardFull,
    #[error("the player's hand is full")]
    HandFull,
    #[error("no attacks on the opening turn")]
    OpeningTurn,
    #[error("{0} is not owned by the acting player")]
    NotOwner(CardKey),
    #[error("{0} is the wrong kind of card for this action")]
    WrongCardKind(CardKey),
    #[error("{0} is not in attack mode")]
    NotInAttackMode(CardKey),
    #[error("{0} has already attacked this turn")]
    AlreadyAttacked(CardKey),
    #[error("invalid target")]
    InvalidTarget,
    #[error("a direct attack needs the defender to have no monsters")]
    DefenderHasMonsters,
    #[error("a monster was already toggled this turn")]
    AlreadyToggled,
    #[error("monsters must share a level to merge")]
    LevelMismatch,
    #[error("monsters must share a type to merge")]
    TypeMismatch,
    #[error("a card cannot merge with itself")]
    SameCard,
    #[error("this ability needs a target")]
    TargetRequired,
}

/// A resource the action needed was missing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Unavailable {
    #[error("no card template named {0:?}")]
    UnknownTemplate(String),
    #[error("no {monster_type} monster at level {level}")]
    NoMonster { monster_type: String, level: u8 },
    #[error("{0}'s deck is empty")]
    DeckEmpty(PlayerId),
    #[error("no card with key {0}")]
    UnknownCard(CardKey),
}

/// Top-level engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rule violation: {0}")]
    Rule(#[from] RuleViolation),

    #[error("resource unavailable: {0}")]
    Unavailable(#[from] Unavailable),

    #[error("state inconsistency: {0}")]
    Inconsistent(String),

    #[error("snapshot codec failed: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl EngineError {
    /// Build a state-inconsistency error.
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::Inconsistent(message.into())
    }

    /// The rule violation, if that is what this is.
    #[must_use]
    pub fn as_rule(&self) -> Option<&RuleViolation> {
        match self {
            EngineError::Rule(v) => Some(v),
            _ => None,
        }
    }

    /// Recoverable errors left the match untouched.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EngineError::Inconsistent(_))
    }
}

/// Shorthand for engine results.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err: EngineError = RuleViolation::CellOccupied(Cell::new(2, 3)).into();
        assert_eq!(err.to_string(), "rule violation: cell (2, 3) is occupied");

        let err: EngineError = Unavailable::NoMonster {
            monster_type: "Scholar".into(),
            level: 4,
        }
        .into();
        assert_eq!(err.to_string(), "resource unavailable: no Scholar monster at level 4");
    }

    #[test]
    fn test_recoverability() {
        assert!(EngineError::from(RuleViolation::HandFull).is_recoverable());
        assert!(!EngineError::inconsistent("grid drift").is_recoverable());
        assert_eq!(
            EngineError::from(RuleViolation::GameOver).as_rule(),
            Some(&RuleViolation::GameOver)
        );
    }
}
