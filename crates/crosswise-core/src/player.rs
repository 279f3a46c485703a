//! Player state.
//!
//! This module contains:
//! - The fixed-size, slot-addressable hand
//! - Player records with a human or AI controller

use crate::bot::Bot;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Tiles held by each active player
pub const HAND_SIZE: usize = 4;

/// Number of seats at the table
pub const SEAT_COUNT: usize = 4;

/// An ordered hand of tiles.
///
/// Slots are addressed by index. Removing a slot shifts the later slots
/// down, inserting shifts them up, so remove-then-insert at the same index
/// refills a slot without disturbing the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    tiles: Vec<Tile>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile in a slot, if the slot exists
    pub fn get(&self, slot: usize) -> Option<Tile> {
        self.tiles.get(slot).copied()
    }

    /// Remove the tile at `slot`, shifting later slots down
    pub fn remove_at(&mut self, slot: usize) -> Tile {
        self.tiles.remove(slot)
    }

    /// Insert a tile at `slot`, shifting later slots up
    pub fn insert_at(&mut self, tile: Tile, slot: usize) {
        self.tiles.insert(slot, tile);
    }

    /// Swap the tile in `slot` for another, returning the old one
    pub fn replace_at(&mut self, slot: usize, tile: Tile) -> Tile {
        let old = self.remove_at(slot);
        self.insert_at(tile, slot);
        old
    }

    pub fn count_of(&self, tile: Tile) -> u32 {
        self.tiles.iter().filter(|t| **t == tile).count() as u32
    }

    pub fn standard_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_standard()).count()
    }

    /// First slot holding `tile`
    pub fn slot_of(&self, tile: Tile) -> Option<usize> {
        self.tiles.iter().position(|t| *t == tile)
    }

    /// Slots paired with their tiles, in slot order
    pub fn slots(&self) -> impl Iterator<Item = (usize, Tile)> + '_ {
        self.tiles.iter().copied().enumerate()
    }
}

/// Who decides a player's moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Controller {
    /// Moves are submitted by the presentation layer
    Human,
    /// Moves are computed by the move selector
    Ai(Bot),
}

/// A seat at the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Inactive seats hold no hand and are skipped in turn order
    pub active: bool,
    pub controller: Controller,
    pub hand: Hand,
}

impl Player {
    pub fn new(name: impl Into<String>, active: bool, is_ai: bool) -> Self {
        Self {
            name: name.into(),
            active,
            controller: if is_ai {
                Controller::Ai(Bot::new())
            } else {
                Controller::Human
            },
            hand: Hand::new(),
        }
    }

    pub fn human(name: impl Into<String>) -> Self {
        Self::new(name, true, false)
    }

    pub fn ai(name: impl Into<String>) -> Self {
        Self::new(name, true, true)
    }

    /// An empty, inactive seat
    pub fn inactive(name: impl Into<String>) -> Self {
        Self::new(name, false, false)
    }

    pub fn with_hand(mut self, hand: Hand) -> Self {
        self.hand = hand;
        self
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai(_))
    }

    pub fn bot(&self) -> Option<&Bot> {
        match &self.controller {
            Controller::Ai(bot) => Some(bot),
            Controller::Human => None,
        }
    }

    pub fn bot_mut(&mut self) -> Option<&mut Bot> {
        match &mut self.controller {
            Controller::Ai(bot) => Some(bot),
            Controller::Human => None,
        }
    }
}
