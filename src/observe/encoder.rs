//! Flat observation vectors for RL clients.
//!
//! Layout, from one player's perspective:
//!
//! - `[0]`: own life / max life
//! - hand: `hand_cap` slots x 6 features, zero-padded
//! - field: every cell row-major x 6 features, zero for empty cells
//!
//! Per-card features: kind (1 monster, 2 spell, 3 trap), attack and
//! defense over `max_stats`, owner flag (0 own, 1 opposing), ability
//! hash in `[0, 1)`, face-down flag. An opposing face-down card hides its
//! ability.

use crate::cards::{Card, CardKind};
use crate::core::{GameState, PlayerId};

/// Features encoded per card.
pub const CARD_FEATURES: usize = 6;

/// Encodes a `GameState` as a flat `f32` vector.
#[derive(Clone, Debug)]
pub struct BoardEncoder {
    max_stats: f32,
}

impl Default for BoardEncoder {
    fn default() -> Self {
        Self { max_stats: 9999.0 }
    }
}

impl BoardEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attack/defense normalizer.
    #[must_use]
    pub fn with_max_stats(mut self, max_stats: f32) -> Self {
        self.max_stats = max_stats;
        self
    }

    /// Length of the vector `encode` produces for this state's config.
    #[must_use]
    pub fn output_len(&self, state: &GameState) -> usize {
        let config = state.config();
        1 + (config.hand_cap + config.cell_count()) * CARD_FEATURES
    }

    #[must_use]
    pub fn encode(&self, state: &GameState, perspective: PlayerId) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.output_len(state));

        let player = state.player(perspective);
        out.push(if player.max_life_points > 0 {
            player.life_points as f32 / player.max_life_points as f32
        } else {
            0.0
        });

        let hand_cap = state.config().hand_cap;
        let hand = state.hand(perspective);
        for slot in 0..hand_cap {
            match hand.get(slot).and_then(|&k| state.card(k)) {
                Some(card) => self.push_card(&mut out, card, perspective),
                None => out.extend([0.0; CARD_FEATURES]),
            }
        }

        for cell in state.cells() {
            match state.card_at(cell).and_then(|k| state.card(k)) {
                Some(card) => self.push_card(&mut out, card, perspective),
                None => out.extend([0.0; CARD_FEATURES]),
            }
        }

        out
    }

    fn push_card(&self, out: &mut Vec<f32>, card: &Card, perspective: PlayerId) {
        let own = card.owner == perspective;
        let (attack, defense) = card
            .monster()
            .map_or((0.0, 0.0), |m| (m.attack as f32, m.defense as f32));
        let ability = if own || !card.face_down {
            card.ability_tag().map_or(0.0, ability_hash)
        } else {
            0.0
        };

        out.extend([
            kind_code(card.kind()),
            attack / self.max_stats,
            defense / self.max_stats,
            if own { 0.0 } else { 1.0 },
            ability,
            if card.face_down { 1.0 } else { 0.0 },
        ]);
    }
}

fn kind_code(kind: CardKind) -> f32 {
    match kind {
        CardKind::Monster => 1.0,
        CardKind::Spell => 2.0,
        CardKind::Trap => 3.0,
    }
}

/// Stable scalar for an ability tag.
fn ability_hash(tag: &str) -> f32 {
    let sum: u32 = tag.chars().map(u32::from).sum();
    (sum % 1000) as f32 / 1000.0
}
