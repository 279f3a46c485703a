//! Tile vocabulary.
//!
//! This module contains:
//! - The closed set of 11 tile kinds (empty, 6 standard symbols, 4 wildcards)
//! - The stable ordinal used for tie-breaks and the persisted encoding
//! - Bag composition constants

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Number of standard (symbol) tile kinds
pub const STANDARD_KINDS: usize = 6;

/// Copies of each standard kind in a full bag
pub const STANDARD_COPIES: u32 = 7;

/// Number of wildcard kinds
pub const WILDCARD_KINDS: usize = 4;

/// Copies of each wildcard kind in a full bag
pub const WILDCARD_COPIES: u32 = 3;

/// Total number of tiles in a full bag (6 x 7 + 4 x 3)
pub const BAG_SIZE: usize =
    STANDARD_KINDS * STANDARD_COPIES as usize + WILDCARD_KINDS * WILDCARD_COPIES as usize;

/// A single tile kind.
///
/// `Empty` is a real tile: every board cell and hand slot always holds
/// exactly one `Tile`. The ordinal returned by [`Tile::index`] is fixed and
/// must never change, as tie-breaks and save files depend on it. It is
/// spelled out explicitly instead of relying on declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tile {
    /// Free cell / empty hand slot
    #[default]
    Empty,
    Sun,
    Cross,
    Triangle,
    Square,
    Pentagon,
    Star,
    /// Clears one occupied cell (single phase)
    Remover,
    /// Moves a board tile to a free cell (two phases)
    Mover,
    /// Exchanges two board tiles (two phases)
    SwapOnBoard,
    /// Exchanges a hand tile with a board tile (two phases)
    SwapWithHand,
}

impl Tile {
    /// Number of tile kinds, including `Empty`
    pub const COUNT: usize = 11;

    /// All tile kinds in ordinal order
    pub const ALL: [Tile; Tile::COUNT] = [
        Tile::Empty,
        Tile::Sun,
        Tile::Cross,
        Tile::Triangle,
        Tile::Square,
        Tile::Pentagon,
        Tile::Star,
        Tile::Remover,
        Tile::Mover,
        Tile::SwapOnBoard,
        Tile::SwapWithHand,
    ];

    /// The standard kinds, which score on the board
    pub const STANDARD: [Tile; STANDARD_KINDS] = [
        Tile::Sun,
        Tile::Cross,
        Tile::Triangle,
        Tile::Square,
        Tile::Pentagon,
        Tile::Star,
    ];

    /// The wildcard kinds, in usage-counter order
    pub const WILDCARDS: [Tile; WILDCARD_KINDS] = [
        Tile::Remover,
        Tile::Mover,
        Tile::SwapOnBoard,
        Tile::SwapWithHand,
    ];

    /// Stable ordinal of this tile
    pub fn index(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Sun => 1,
            Tile::Cross => 2,
            Tile::Triangle => 3,
            Tile::Square => 4,
            Tile::Pentagon => 5,
            Tile::Star => 6,
            Tile::Remover => 7,
            Tile::Mover => 8,
            Tile::SwapOnBoard => 9,
            Tile::SwapWithHand => 10,
        }
    }

    /// Inverse of [`Tile::index`]
    pub fn from_index(index: u8) -> Option<Tile> {
        Tile::ALL.get(index as usize).copied()
    }

    pub fn is_empty(self) -> bool {
        self == Tile::Empty
    }

    pub fn is_standard(self) -> bool {
        self.standard_slot().is_some()
    }

    pub fn is_wildcard(self) -> bool {
        self.wildcard_slot().is_some()
    }

    /// Position of a standard kind inside a six-entry segment count vector
    pub fn standard_slot(self) -> Option<usize> {
        match self {
            Tile::Sun => Some(0),
            Tile::Cross => Some(1),
            Tile::Triangle => Some(2),
            Tile::Square => Some(3),
            Tile::Pentagon => Some(4),
            Tile::Star => Some(5),
            _ => None,
        }
    }

    /// Position of a wildcard kind inside the four-entry usage counter
    pub fn wildcard_slot(self) -> Option<usize> {
        match self {
            Tile::Remover => Some(0),
            Tile::Mover => Some(1),
            Tile::SwapOnBoard => Some(2),
            Tile::SwapWithHand => Some(3),
            _ => None,
        }
    }

    /// Whether playing this wildcard takes an activation and an effect phase
    pub fn has_second_phase(self) -> bool {
        matches!(self, Tile::Mover | Tile::SwapOnBoard | Tile::SwapWithHand)
    }

    /// How many copies of this kind a full bag holds
    pub fn copies_in_full_bag(self) -> u32 {
        if self.is_standard() {
            STANDARD_COPIES
        } else if self.is_wildcard() {
            WILDCARD_COPIES
        } else {
            0
        }
    }

    /// Display label, independent of the ordinal
    pub fn label(self) -> &'static str {
        match self {
            Tile::Empty => "Empty",
            Tile::Sun => "Sun",
            Tile::Cross => "Cross",
            Tile::Triangle => "Triangle",
            Tile::Square => "Square",
            Tile::Pentagon => "Pentagon",
            Tile::Star => "Star",
            Tile::Remover => "Remover",
            Tile::Mover => "Mover",
            Tile::SwapOnBoard => "Swap on board",
            Tile::SwapWithHand => "Swap with hand",
        }
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-kind tile counts, indexed by ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileCounts([u32; Tile::COUNT]);

impl TileCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count tiles from any iterator
    pub fn from_tiles<I: IntoIterator<Item = Tile>>(tiles: I) -> Self {
        let mut counts = Self::new();
        for tile in tiles {
            counts.add(tile);
        }
        counts
    }

    pub fn add(&mut self, tile: Tile) {
        self.0[tile.index() as usize] += 1;
    }

    pub fn get(&self, tile: Tile) -> u32 {
        self.0[tile.index() as usize]
    }

    /// Counts of the six standard kinds, the input of segment scoring
    pub fn standard(&self) -> [u32; STANDARD_KINDS] {
        let mut result = [0; STANDARD_KINDS];
        for (slot, tile) in Tile::STANDARD.iter().enumerate() {
            result[slot] = self.get(*tile);
        }
        result
    }
}
