//! Shared fixtures for integration tests.

#![allow(dead_code)]

use duel_engine::{
    CardKey, CardRegistry, CardTemplate, Cell, EngineConfig, GameEngine, PlayerId, SpellAbility, TrapAbility,
};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test log subscriber once.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, else "warn".
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn p0() -> PlayerId {
    PlayerId::new(0)
}

pub fn p1() -> PlayerId {
    PlayerId::new(1)
}

/// A small catalog covering every card kind and ability.
pub fn catalog() -> CardRegistry {
    CardRegistry::from_templates([
        CardTemplate::monster("Swordsman", "Warrior", 1800, 1200, 1),
        CardTemplate::monster("Stone Golem", "Golem", 1500, 1500, 1),
        CardTemplate::monster("Apprentice Scholar", "Scholar", 1200, 1000, 1),
        CardTemplate::monster("Master Scholar", "Scholar", 2000, 1700, 2),
        CardTemplate::monster("Imp", "Demon", 900, 600, 1),
        CardTemplate::spell("Pot of Greed", SpellAbility::DrawCards),
        CardTemplate::spell("Maniac War", SpellAbility::BuffAttack),
        CardTemplate::spell("Holy Shield", SpellAbility::BuffDefense),
        CardTemplate::spell("Trap Smasher", SpellAbility::DestroyTrap),
        CardTemplate::spell("Double Call", SpellAbility::ExtraSummon),
        CardTemplate::trap("Crippling Curse", TrapAbility::DebuffAttack),
        CardTemplate::trap("Brittle Hex", TrapAbility::DebuffDefense),
        CardTemplate::trap("Phantom Dodge", TrapAbility::DodgeAttack),
        CardTemplate::trap("Mirror Strike", TrapAbility::ReflectAttack),
        CardTemplate::trap("Welcome Snare", TrapAbility::DebuffSummon),
    ])
}

/// A 22-card deck mixing every kind.
pub fn deck() -> Vec<&'static str> {
    let mut names = Vec::new();
    for _ in 0..2 {
        names.extend([
            "Swordsman",
            "Stone Golem",
            "Apprentice Scholar",
            "Apprentice Scholar",
            "Imp",
            "Pot of Greed",
            "Maniac War",
            "Trap Smasher",
            "Phantom Dodge",
            "Welcome Snare",
            "Crippling Curse",
        ]);
    }
    names
}

pub fn engine(seed: u64) -> GameEngine<CardRegistry> {
    init_logging();
    GameEngine::new(catalog(), EngineConfig::default(), seed)
}

/// An engine with shuffled decks and opening hands dealt.
pub fn dealt_engine(seed: u64) -> GameEngine<CardRegistry> {
    let mut engine = engine(seed);
    for player in [p0(), p1()] {
        engine.load_deck(player, deck()).unwrap();
        engine.shuffle_deck(player);
    }
    engine.deal_opening_hands();
    engine
}

/// End turns until it is `player`'s turn.
pub fn pass_to(engine: &mut GameEngine<CardRegistry>, player: PlayerId) {
    while engine.current_player() != player {
        engine.end_turn().unwrap();
    }
}

/// On `player`'s next turn, summon `name` at `cell`, then end the turn.
pub fn summon_on_next_turn(
    engine: &mut GameEngine<CardRegistry>,
    player: PlayerId,
    name: &str,
    cell: Cell,
) -> CardKey {
    pass_to(engine, player);
    let card = engine.grant_card(player, name).unwrap();
    engine.summon_card(player, card, cell).unwrap();
    engine.end_turn().unwrap();
    card
}
