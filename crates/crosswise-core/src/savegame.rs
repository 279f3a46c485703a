//! Save/load payload.
//!
//! Tiles are persisted by their ordinal and the board is stored column by
//! column (`field[column][row]`). File IO is left to the caller.

use crate::bag::{TileBag, WildcardUsage};
use crate::board::{Board, PlayerId};
use crate::game::Game;
use crate::player::{Hand, Player, HAND_SIZE, SEAT_COUNT};
use crate::tile::{Tile, TileCounts, WILDCARD_KINDS};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that prevent a saved game from loading
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown tile ordinal {0}")]
    UnknownTile(u8),

    #[error("Save holds {0} players, a table has four seats")]
    PlayerCount(usize),

    #[error("Current player {0} is not an active seat")]
    CurrentPlayer(usize),

    #[error("Board is not a non-empty square grid")]
    BoardShape,

    #[error("Player {player} holds {found} tiles instead of a full hand")]
    HandSize { player: usize, found: usize },

    #[error("{count} uses of {wildcard} exceed the copies in a full bag")]
    WildcardUsage { wildcard: Tile, count: u32 },
}

/// One seat as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub is_active: bool,
    pub is_ai: bool,
    pub hand: Vec<u8>,
}

/// A complete saved game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    pub players: Vec<PlayerData>,
    pub curr_player: usize,
    /// Tile ordinals, `field[column][row]`
    pub field: Vec<Vec<u8>>,
    pub used_action_tiles: [u32; WILDCARD_KINDS],
    /// Remaining bag in draw order; rebuilt when absent or unusable
    #[serde(
        default,
        deserialize_with = "lenient_bag",
        skip_serializing_if = "Option::is_none"
    )]
    pub tile_bag: Option<Vec<u8>>,
}

/// Accept any JSON for the bag; anything that is not a list of ordinals
/// counts as missing.
fn lenient_bag<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl GameData {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn decode(ordinal: u8) -> Result<Tile, LoadError> {
    Tile::from_index(ordinal).ok_or(LoadError::UnknownTile(ordinal))
}

fn decode_all(ordinals: &[u8]) -> Result<Vec<Tile>, LoadError> {
    ordinals.iter().map(|o| decode(*o)).collect()
}

fn encode_all(tiles: impl IntoIterator<Item = Tile>) -> Vec<u8> {
    tiles.into_iter().map(Tile::index).collect()
}

/// A stored bag is usable when it holds no `Empty`/unknown ordinals and,
/// together with everything visible, stays within the full composition.
fn usable_bag(stored: &[u8], visible: &TileCounts) -> Option<Vec<Tile>> {
    let tiles = decode_all(stored).ok()?;
    if tiles.iter().any(|t| t.is_empty()) {
        return None;
    }

    let mut total = *visible;
    for tile in &tiles {
        total.add(*tile);
    }
    Tile::ALL
        .iter()
        .filter(|t| !t.is_empty())
        .all(|t| total.get(*t) <= t.copies_in_full_bag())
        .then_some(tiles)
}

/// Used wildcards plus the visible copies of each kind must fit in a full bag
fn check_usage(used: &WildcardUsage, visible: &TileCounts) -> Result<(), LoadError> {
    for wildcard in Tile::WILDCARDS {
        let count = used.count(wildcard);
        if count.saturating_add(visible.get(wildcard)) > wildcard.copies_in_full_bag() {
            return Err(LoadError::WildcardUsage { wildcard, count });
        }
    }
    Ok(())
}

impl Game {
    /// Snapshot the session as a save payload.
    ///
    /// The payload has no phase field. A snapshot taken between a wildcard
    /// activation and its effect reloads in `AwaitingMove` for the same
    /// player; the activated wildcard stays spent and its effect is lost.
    pub fn to_data(&self) -> GameData {
        GameData {
            players: self
                .players
                .iter()
                .map(|p| PlayerData {
                    name: p.name.clone(),
                    is_active: p.active,
                    is_ai: p.is_ai(),
                    hand: encode_all(p.hand.tiles().iter().copied()),
                })
                .collect(),
            curr_player: self.current_player as usize,
            field: self
                .board
                .columns()
                .into_iter()
                .map(encode_all)
                .collect(),
            used_action_tiles: self.used_wildcards.0,
            tile_bag: Some(encode_all(self.bag.tiles())),
        }
    }

    /// Restore a session from a save payload.
    ///
    /// A missing or unusable bag is rebuilt from the visible tiles and the
    /// wildcard counter, shuffled with `reload_seed`.
    pub fn from_data(data: GameData, reload_seed: u64) -> Result<Self, LoadError> {
        if data.players.len() != SEAT_COUNT {
            return Err(LoadError::PlayerCount(data.players.len()));
        }

        let mut players = Vec::with_capacity(SEAT_COUNT);
        for (seat, p) in data.players.iter().enumerate() {
            let hand = if p.is_active {
                if p.hand.len() != HAND_SIZE {
                    return Err(LoadError::HandSize {
                        player: seat,
                        found: p.hand.len(),
                    });
                }
                Hand::from_tiles(decode_all(&p.hand)?)
            } else {
                Hand::new()
            };
            players.push(Player::new(p.name.clone(), p.is_active, p.is_ai).with_hand(hand));
        }

        if !players.get(data.curr_player).is_some_and(|p| p.active) {
            return Err(LoadError::CurrentPlayer(data.curr_player));
        }

        let columns = data
            .field
            .iter()
            .map(|column| decode_all(column))
            .collect::<Result<Vec<_>, _>>()?;
        let board = Board::from_columns(&columns).ok_or(LoadError::BoardShape)?;
        let used = WildcardUsage(data.used_action_tiles);

        let visible: Vec<Tile> = board
            .tiles()
            .chain(players.iter().flat_map(|p| p.hand.tiles().iter().copied()))
            .collect();
        check_usage(&used, &TileCounts::from_tiles(visible.iter().copied()))?;
        let seen = TileCounts::from_tiles(visible.iter().copied().chain(used.tiles()));

        let bag = match data.tile_bag.as_deref().and_then(|b| usable_bag(b, &seen)) {
            Some(tiles) => TileBag::from_tiles(tiles),
            None => {
                warn!("Saved tile bag missing or unusable, rebuilding it");
                TileBag::reconstruct(visible, &used, reload_seed)
            }
        };

        let game = Game::from_parts(board, players, data.curr_player as PlayerId, used, bag);
        info!(
            current_player = data.curr_player,
            bag = game.bag().remaining(),
            state = ?game.state(),
            "Game loaded"
        );
        Ok(game)
    }

    /// Parse and restore a JSON save payload
    pub fn from_json(json: &str, reload_seed: u64) -> Result<Self, LoadError> {
        Self::from_data(GameData::from_json(json)?, reload_seed)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.to_data().to_json()
    }
}
