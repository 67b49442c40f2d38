//! Snapshot, restore and reset behavior.

mod common;

use common::{dealt_engine, engine, p0, p1, summon_on_next_turn};
use duel_engine::{Action, AttackTarget, Cell, EngineError, PlayerId};

/// Play `count` legal actions, always taking the first non-end-turn one
/// when there is a choice.
fn play(engine: &mut duel_engine::GameEngine<duel_engine::CardRegistry>, count: usize) {
    for i in 0..count {
        let actions = engine.legal_actions();
        if actions.is_empty() {
            return;
        }
        let action = actions[i % actions.len()].clone();
        let _ = engine.apply(&action);
    }
}

#[test]
fn test_restore_rewinds_match() {
    let mut engine = dealt_engine(21);
    play(&mut engine, 30);

    let bytes = engine.snapshot().unwrap();
    let history = engine.history().clone();
    let legal = engine.legal_actions();
    let board: Vec<_> = engine.state().cells().map(|c| engine.state().card_at(c)).collect();
    let life: Vec<_> = PlayerId::all(2).map(|p| engine.state().player(p).life_points).collect();

    play(&mut engine, 40);
    engine.restore(&bytes).unwrap();

    assert_eq!(engine.history(), &history);
    assert_eq!(engine.legal_actions(), legal);
    let board_after: Vec<_> = engine.state().cells().map(|c| engine.state().card_at(c)).collect();
    assert_eq!(board_after, board);
    let life_after: Vec<_> = PlayerId::all(2).map(|p| engine.state().player(p).life_points).collect();
    assert_eq!(life_after, life);
    engine.state().check_invariants().unwrap();
}

#[test]
fn test_restored_match_plays_on_identically() {
    let mut engine = dealt_engine(22);
    play(&mut engine, 25);
    let bytes = engine.snapshot().unwrap();

    let mut copy = dealt_engine(999);
    copy.restore(&bytes).unwrap();

    play(&mut engine, 25);
    play(&mut copy, 25);
    assert_eq!(engine.history(), copy.history());
}

#[test]
fn test_restore_rejects_garbage() {
    let mut engine = engine(23);
    let before = engine.history().clone();

    let err = engine.restore(&[0xff, 0x01, 0x02]).unwrap_err();

    assert!(matches!(err, EngineError::Snapshot(_)));
    assert_eq!(engine.history(), &before);
}

#[test]
fn test_reset_reverts_effects_and_clears_field() {
    let mut engine = engine(24);
    let imp = summon_on_next_turn(&mut engine, p0(), "Imp", Cell::new(2, 0));
    let war = engine.grant_card(p0(), "Maniac War").unwrap();
    common::pass_to(&mut engine, p0());
    engine
        .apply(&Action::CastSpell { spell: war, target: Some(imp) })
        .unwrap();
    engine
        .apply(&Action::Attack { card: imp, target: AttackTarget::Player(p1()) })
        .unwrap();
    assert_eq!(engine.state().player(p1()).life_points, 8000 - 1200);

    engine.reset();

    assert_eq!(engine.effects().active_count(), 0);
    assert_eq!(engine.turn_count(), 1);
    assert_eq!(engine.current_player(), p0());
    assert!(engine.history().is_empty());
    assert!(engine.events().is_empty());
    assert!(engine.state().cells().all(|c| engine.state().card_at(c).is_none()));
    for player in [p0(), p1()] {
        assert_eq!(engine.state().player(player).life_points, 8000);
        assert!(engine.state().hand(player).is_empty());
        assert!(engine.state().graveyard(player).is_empty());
    }
}
