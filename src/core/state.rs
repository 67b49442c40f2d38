//! Game state: the field grid, ownership, zones and per-turn flags.
//!
//! ## Field
//!
//! A fixed `rows x cols` grid of optional card keys, stored row-major.
//! A parallel ownership grid assigns each cell permanently to a player:
//! the top half to player 1, the bottom half to player 0.
//!
//! ## Board index
//!
//! Each player has an insertion-ordered list of the cards they have on
//! the field. `modify_field` is the only writer of the grid, the board
//! index and `Card::position`; it keeps all three in step:
//!
//! - a card is in player P's index iff it occupies a cell owned by P
//! - `card.position == Some(cell)` iff `grid[cell] == Some(card.key)`
//!
//! ## Zones
//!
//! Hand, deck (top = end) and graveyard per player, plus the turn flags
//! that restrict summons and toggles to once per turn.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::EngineConfig;
use super::entity::{CardKey, Cell};
use super::error::{EngineError, EngineResult, RuleViolation, Unavailable};
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Card, CardKind, CardTemplate};

/// Direction of a field modification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldOp {
    Add,
    Remove,
}

/// Per-player zones and turn flags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub hand: Vec<CardKey>,
    /// Top of the deck is the end of the vec.
    pub deck: Vec<CardKey>,
    pub graveyard: Vector<CardKey>,
    pub has_summoned_monster: bool,
    pub has_summoned_trap: bool,
    pub has_toggled: bool,
    /// Face-down traps this player has on the field, in placement order.
    pub active_traps: Vec<CardKey>,
}

impl PlayerInfo {
    /// Clear the once-per-turn flags.
    pub fn reset_turn_flags(&mut self) {
        self.has_summoned_monster = false;
        self.has_summoned_trap = false;
        self.has_toggled = false;
    }

    /// The summon flag for a card kind. Spells have none.
    #[must_use]
    pub fn has_summoned(&self, kind: CardKind) -> bool {
        match kind {
            CardKind::Monster => self.has_summoned_monster,
            CardKind::Trap => self.has_summoned_trap,
            CardKind::Spell => false,
        }
    }
}

/// Field and zone counts for one player, for logging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub total_cards: usize,
    pub monsters: usize,
    pub traps: usize,
    pub hand_size: usize,
    pub graveyard_size: usize,
    pub deck_size: usize,
    pub has_summoned_monster: bool,
    pub has_summoned_trap: bool,
    pub has_toggled: bool,
}

/// Complete match state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    config: EngineConfig,

    /// Duelists, indexed by seat.
    pub players: PlayerMap<Player>,

    /// Row-major field cells.
    grid: Vec<Option<CardKey>>,

    /// Row-major cell owners. Never changes after construction.
    ownership: Vec<PlayerId>,

    info: PlayerMap<PlayerInfo>,

    /// Cards each player has on the field, in placement order.
    board: PlayerMap<Vec<CardKey>>,

    /// Every card instantiated this match, wherever it is.
    cards: FxHashMap<CardKey, Card>,

    next_key: u32,
}

impl GameState {
    /// Create a state with default player names.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_players(config, ["Player 1", "Player 2"])
    }

    /// Create a state with named players. Seat 1 is marked as the opponent.
    ///
    /// Panics unless the config describes two players on an even-row board.
    #[must_use]
    pub fn with_players(config: EngineConfig, names: [&str; 2]) -> Self {
        assert_eq!(config.player_count, 2, "The field supports exactly two players");
        assert!(config.rows % 2 == 0, "Board rows must split evenly between two players");

        let life = config.starting_life;
        let players = PlayerMap::new(2, |p| {
            let player = Player::new(p, names[p.index()], life);
            if p.index() == 1 {
                player.as_opponent()
            } else {
                player
            }
        });

        let half = config.rows / 2;
        let ownership = (0..config.rows)
            .flat_map(|row| {
                let owner = if row < half { PlayerId::new(1) } else { PlayerId::new(0) };
                std::iter::repeat(owner).take(config.cols)
            })
            .collect();

        Self {
            grid: vec![None; config.cell_count()],
            ownership,
            info: PlayerMap::with_default(2),
            board: PlayerMap::with_default(2),
            cards: FxHashMap::default(),
            next_key: 0,
            players,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Return the match to its starting point: empty field and zones,
    /// starting life, no cards.
    pub fn reset(&mut self) {
        self.grid.iter_mut().for_each(|cell| *cell = None);
        self.info = PlayerMap::with_default(self.player_count());
        self.board = PlayerMap::with_default(self.player_count());
        self.cards.clear();
        self.next_key = 0;
        for (_, player) in self.players.iter_mut() {
            player.reset();
        }
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    /// The other seat.
    #[must_use]
    pub fn opponent_of(&self, player: PlayerId) -> PlayerId {
        player.next(self.player_count())
    }

    /// True iff any player's life points are at or below zero.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.players.iter().any(|(_, p)| p.is_defeated())
    }

    /// The surviving player once the match is over.
    ///
    /// `None` while the match continues or if both players fell together.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        let alive: Vec<_> = self
            .players
            .iter()
            .filter(|(_, p)| !p.is_defeated())
            .map(|(id, _)| id)
            .collect();
        match alive.as_slice() {
            [only] if alive.len() < self.player_count() => Some(*only),
            _ => None,
        }
    }

    // === Cards ===

    /// Instantiate a template for `owner`. The new card is in no zone.
    pub fn instantiate(&mut self, template: &CardTemplate, owner: PlayerId) -> CardKey {
        let key = CardKey::new(self.next_key);
        self.next_key += 1;
        self.cards.insert(key, Card::from_template(key, template, owner));
        key
    }

    #[must_use]
    pub fn card(&self, key: CardKey) -> Option<&Card> {
        self.cards.get(&key)
    }

    pub fn card_mut(&mut self, key: CardKey) -> Option<&mut Card> {
        self.cards.get_mut(&key)
    }

    /// Look up a card or report it unavailable.
    pub fn require_card(&self, key: CardKey) -> Result<&Card, Unavailable> {
        self.cards.get(&key).ok_or(Unavailable::UnknownCard(key))
    }

    // === Zones ===

    #[must_use]
    pub fn info(&self, player: PlayerId) -> &PlayerInfo {
        &self.info[player]
    }

    pub fn info_mut(&mut self, player: PlayerId) -> &mut PlayerInfo {
        &mut self.info[player]
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[CardKey] {
        &self.info[player].hand
    }

    #[must_use]
    pub fn deck(&self, player: PlayerId) -> &[CardKey] {
        &self.info[player].deck
    }

    #[must_use]
    pub fn graveyard(&self, player: PlayerId) -> &Vector<CardKey> {
        &self.info[player].graveyard
    }

    #[must_use]
    pub fn in_hand(&self, player: PlayerId, key: CardKey) -> bool {
        self.info[player].hand.contains(&key)
    }

    pub fn add_to_hand(&mut self, player: PlayerId, key: CardKey) {
        self.info[player].hand.push(key);
    }

    /// Remove a card from a hand. Returns false if it was not there.
    pub fn remove_from_hand(&mut self, player: PlayerId, key: CardKey) -> bool {
        let hand = &mut self.info[player].hand;
        match hand.iter().position(|&k| k == key) {
            Some(idx) => {
                hand.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Put a card on top of a player's deck.
    pub fn push_deck(&mut self, player: PlayerId, key: CardKey) {
        self.info[player].deck.push(key);
    }

    /// Move the top deck card to hand.
    pub fn draw_from_deck(&mut self, player: PlayerId) -> Option<CardKey> {
        let key = self.info[player].deck.pop()?;
        self.add_to_hand(player, key);
        Some(key)
    }

    pub fn shuffle_deck(&mut self, player: PlayerId, rng: &mut GameRng) {
        rng.shuffle(&mut self.info[player].deck);
    }

    /// Move a card to its owner's graveyard from the field or hand.
    pub fn send_to_graveyard(&mut self, key: CardKey) -> EngineResult<()> {
        let card = self.require_card(key)?;
        let (owner, position) = (card.owner, card.position);

        if let Some(cell) = position {
            self.modify_field(FieldOp::Remove, key, cell)?;
        } else {
            self.remove_from_hand(owner, key);
        }

        self.info[owner].graveyard.push_back(key);
        debug!(card = %key, owner = %owner, "Card sent to graveyard");
        Ok(())
    }

    // === Field ===

    #[must_use]
    pub fn rows(&self) -> usize {
        self.config.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.config.cols
    }

    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.config.rows && cell.col < self.config.cols
    }

    /// Every field cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.config.cols;
        (0..self.config.cell_count()).map(move |i| Cell::new(i / cols, i % cols))
    }

    #[must_use]
    pub fn card_at(&self, cell: Cell) -> Option<CardKey> {
        if self.in_bounds(cell) {
            self.grid[cell.index(self.config.cols)]
        } else {
            None
        }
    }

    /// Owner of a cell, or `None` out of bounds.
    #[must_use]
    pub fn cell_owner(&self, cell: Cell) -> Option<PlayerId> {
        self.in_bounds(cell)
            .then(|| self.ownership[cell.index(self.config.cols)])
    }

    /// Add or remove a card on the field.
    ///
    /// `Add` requires the cell to be in bounds, empty, and owned by the
    /// card's owner; it then binds card and cell and indexes the card.
    /// `Remove` requires the cell to hold this card; it clears both
    /// directions and drops the card from the index.
    pub fn modify_field(&mut self, op: FieldOp, key: CardKey, cell: Cell) -> EngineResult<()> {
        if !self.in_bounds(cell) {
            return Err(RuleViolation::OutOfBounds(cell).into());
        }
        let idx = cell.index(self.config.cols);
        let card = self.require_card(key)?;
        let owner = card.owner;
        let is_armed_trap = card.face_down && card.kind() == CardKind::Trap;

        match op {
            FieldOp::Add => {
                if self.grid[idx].is_some() {
                    return Err(RuleViolation::CellOccupied(cell).into());
                }
                if self.ownership[idx] != owner {
                    return Err(RuleViolation::CellNotOwned(cell).into());
                }
                if let Some(existing) = card.position {
                    return Err(EngineError::inconsistent(format!(
                        "{key} is already placed at {existing}"
                    )));
                }

                self.grid[idx] = Some(key);
                self.board[owner].push(key);
                if is_armed_trap {
                    self.info[owner].active_traps.push(key);
                }
                if let Some(card) = self.cards.get_mut(&key) {
                    card.position = Some(cell);
                }
                debug!(card = %key, cell = %cell, owner = %owner, "Field modified: card placed");
            }
            FieldOp::Remove => {
                if self.grid[idx] != Some(key) || card.position != Some(cell) {
                    return Err(EngineError::inconsistent(format!(
                        "{key} is not bound to {cell} (grid holds {:?})",
                        self.grid[idx]
                    )));
                }

                self.grid[idx] = None;
                self.board[owner].retain(|&k| k != key);
                self.info[owner].active_traps.retain(|&k| k != key);
                if let Some(card) = self.cards.get_mut(&key) {
                    card.position = None;
                }
                debug!(card = %key, cell = %cell, owner = %owner, "Field modified: card removed");
            }
        }
        Ok(())
    }

    /// Check whether a card could be placed at a cell, without placing it.
    ///
    /// The error explains the refusal.
    pub fn validate_card_placement(&self, key: CardKey, cell: Cell) -> Result<(), RuleViolation> {
        if !self.in_bounds(cell) {
            return Err(RuleViolation::OutOfBounds(cell));
        }
        let owner = self
            .card(key)
            .map(|c| c.owner)
            .ok_or(RuleViolation::InvalidTarget)?;
        if self.card_at(cell).is_some() {
            return Err(RuleViolation::CellOccupied(cell));
        }
        if self.cell_owner(cell) != Some(owner) {
            return Err(RuleViolation::CellNotOwned(cell));
        }
        if !self.has_slot_available(owner) {
            return Err(RuleViolation::BoardFull);
        }
        Ok(())
    }

    /// Whether the player is below the board cap.
    #[must_use]
    pub fn has_slot_available(&self, player: PlayerId) -> bool {
        self.board[player].len() < self.config.board_cap
    }

    /// Cards the player has on the field, in placement order.
    #[must_use]
    pub fn player_cards(&self, player: PlayerId) -> &[CardKey] {
        &self.board[player]
    }

    /// The player's on-field cards of one kind, in placement order.
    #[must_use]
    pub fn cards_typed(&self, player: PlayerId, kind: CardKind) -> Vec<CardKey> {
        self.board[player]
            .iter()
            .copied()
            .filter(|&k| self.card(k).is_some_and(|c| c.kind() == kind))
            .collect()
    }

    #[must_use]
    pub fn monster_count(&self, player: PlayerId) -> usize {
        self.board[player]
            .iter()
            .filter(|&&k| self.card(k).is_some_and(|c| c.kind() == CardKind::Monster))
            .count()
    }

    /// The player's face-down traps in row-major field order.
    #[must_use]
    pub fn armed_traps(&self, player: PlayerId) -> Vec<CardKey> {
        let mut traps: Vec<(Cell, CardKey)> = self.info[player]
            .active_traps
            .iter()
            .filter_map(|&k| self.card(k).and_then(|c| c.position).map(|cell| (cell, k)))
            .collect();
        traps.sort_unstable();
        traps.into_iter().map(|(_, k)| k).collect()
    }

    /// Empty cells owned by the player, row-major.
    #[must_use]
    pub fn empty_slots(&self, player: PlayerId) -> Vec<Cell> {
        self.cells()
            .filter(|&cell| self.card_at(cell).is_none() && self.cell_owner(cell) == Some(player))
            .collect()
    }

    /// A uniformly chosen empty cell owned by the player.
    pub fn get_random_empty_slot(&self, player: PlayerId, rng: &mut GameRng) -> Option<Cell> {
        let slots = self.empty_slots(player);
        let slot = rng.choose(&slots).copied();
        if slot.is_none() {
            debug!(player = %player, "No empty slots available");
        }
        slot
    }

    #[must_use]
    pub fn field_summary(&self, player: PlayerId) -> FieldSummary {
        let info = &self.info[player];
        FieldSummary {
            total_cards: self.board[player].len(),
            monsters: self.monster_count(player),
            traps: self.cards_typed(player, CardKind::Trap).len(),
            hand_size: info.hand.len(),
            graveyard_size: info.graveyard.len(),
            deck_size: info.deck.len(),
            has_summoned_monster: info.has_summoned_monster,
            has_summoned_trap: info.has_summoned_trap,
            has_toggled: info.has_toggled,
        }
    }

    /// Verify the field bookkeeping invariants.
    pub fn check_invariants(&self) -> EngineResult<()> {
        for cell in self.cells() {
            let idx = cell.index(self.config.cols);
            let Some(key) = self.grid[idx] else { continue };
            let card = self
                .card(key)
                .ok_or_else(|| EngineError::inconsistent(format!("grid cell {cell} holds unknown {key}")))?;
            if card.position != Some(cell) {
                return Err(EngineError::inconsistent(format!(
                    "{key} at {cell} records position {:?}",
                    card.position
                )));
            }
            if self.ownership[idx] != card.owner {
                return Err(EngineError::inconsistent(format!(
                    "{key} owned by {} sits in a cell owned by {}",
                    card.owner, self.ownership[idx]
                )));
            }
            if !self.board[card.owner].contains(&key) {
                return Err(EngineError::inconsistent(format!("{key} at {cell} is not indexed")));
            }
        }

        for (player, keys) in self.board.iter() {
            for &key in keys {
                let card = self
                    .card(key)
                    .ok_or_else(|| EngineError::inconsistent(format!("index holds unknown {key}")))?;
                let bound = card.position.and_then(|cell| self.card_at(cell)) == Some(key);
                if card.owner != player || !bound {
                    return Err(EngineError::inconsistent(format!(
                        "{key} indexed for {player} but not on their field"
                    )));
                }
            }
        }

        Ok(())
    }
}
