//! The tile bag.
//!
//! A finite multiset of 54 tiles dispensed without replacement. Each game
//! session owns its bag; there is no shared instance.

use crate::tile::{Tile, TileCounts, BAG_SIZE, WILDCARD_KINDS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::info;

/// Seed used when a bag is rebuilt from visible game state
pub const RECONSTRUCTION_SEED: u64 = 42;

/// How many wildcards of each kind have been consumed so far.
///
/// Indexed in [`Tile::WILDCARDS`] order (Remover, Mover, SwapOnBoard,
/// SwapWithHand), which is also the persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WildcardUsage(pub [u32; WILDCARD_KINDS]);

impl WildcardUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one use of a wildcard. Standard tiles are ignored.
    pub fn record(&mut self, wildcard: Tile) {
        if let Some(slot) = wildcard.wildcard_slot() {
            self.0[slot] += 1;
        }
    }

    pub fn count(&self, wildcard: Tile) -> u32 {
        wildcard.wildcard_slot().map_or(0, |slot| self.0[slot])
    }

    /// Consumed wildcards as a tile multiset
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        Tile::WILDCARDS
            .into_iter()
            .flat_map(move |w| std::iter::repeat(w).take(self.count(w) as usize))
    }
}

/// The draw pile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBag {
    tiles: VecDeque<Tile>,
}

impl TileBag {
    /// A full bag shuffled with fresh entropy
    pub fn new() -> Self {
        Self::shuffled(full_composition(), &mut rand::thread_rng())
    }

    /// A full bag shuffled with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::shuffled(full_composition(), &mut StdRng::seed_from_u64(seed))
    }

    /// A bag that dispenses exactly `tiles`, front first
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self {
            tiles: tiles.into(),
        }
    }

    /// Rebuild the bag from everything visible in a game.
    ///
    /// `visible` are the tiles on the board and in every hand (`Empty` is
    /// ignored); `used` counts wildcards consumed earlier. The remainder of
    /// the full composition is shuffled with `seed`, so two reloads of the
    /// same state produce the same draw order.
    pub fn reconstruct<I>(visible: I, used: &WildcardUsage, seed: u64) -> Self
    where
        I: IntoIterator<Item = Tile>,
    {
        let seen = TileCounts::from_tiles(visible.into_iter().chain(used.tiles()));

        let mut remaining = Vec::with_capacity(BAG_SIZE);
        for tile in Tile::ALL {
            let left = tile.copies_in_full_bag().saturating_sub(seen.get(tile));
            remaining.extend(std::iter::repeat(tile).take(left as usize));
        }

        let bag = Self::shuffled(remaining, &mut StdRng::seed_from_u64(seed));
        info!(remaining = bag.remaining(), "Tile bag reconstructed");
        bag
    }

    fn shuffled<R: Rng>(mut tiles: Vec<Tile>, rng: &mut R) -> Self {
        tiles.shuffle(rng);
        Self::from_tiles(tiles)
    }

    /// Take the next tile, or `None` once the bag is exhausted
    pub fn draw(&mut self) -> Option<Tile> {
        self.tiles.pop_front()
    }

    /// The tile the next [`TileBag::draw`] would return
    pub fn peek(&self) -> Option<Tile> {
        self.tiles.front().copied()
    }

    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Remaining tiles in draw order
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.tiles.iter().copied()
    }
}

impl Default for TileBag {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed 54-tile composition, unshuffled
fn full_composition() -> Vec<Tile> {
    Tile::ALL
        .iter()
        .flat_map(|t| std::iter::repeat(*t).take(t.copies_in_full_bag() as usize))
        .collect()
}
