//! Moves players can submit.
//!
//! This module defines every fully-specified move and the events that
//! result from resolving one. Events are what the presentation layer
//! consumes; no GUI types appear here.

use crate::board::{PlayerId, Position};
use crate::game::GameState;
use crate::scoring::Score;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// A move request from the current player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    // ==================== Single Phase ====================
    /// Place the standard tile from `slot` on a free cell
    Place { slot: usize, at: Position },
    /// Use the Remover in `slot` to clear an occupied cell
    Remove { slot: usize, at: Position },

    // ==================== Two Phases ====================
    /// Phase 1: activate the Mover, SwapOnBoard or SwapWithHand in `slot`
    ActivateWildcard { slot: usize },
    /// Mover phase 2: move a board tile to a free cell
    MoveTile { from: Position, to: Position },
    /// SwapOnBoard phase 2: exchange two board tiles
    SwapTiles { from: Position, to: Position },
    /// SwapWithHand phase 2: exchange the standard tile in `slot` with the
    /// board tile at `at`
    SwapWithHand { slot: usize, at: Position },
}

impl Move {
    /// Whether this move completes a two-phase wildcard
    pub fn is_second_phase(&self) -> bool {
        matches!(
            self,
            Move::MoveTile { .. } | Move::SwapTiles { .. } | Move::SwapWithHand { .. }
        )
    }
}

/// Events that occur as a result of moves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A cell changed; `tile` is `Empty` when a cell was cleared
    TilePlaced { position: Position, tile: Tile },

    /// A player's hand changed
    HandChanged { player: PlayerId, hand: Vec<Tile> },

    /// A two-phase wildcard was activated and awaits its second phase
    WildcardActivated { player: PlayerId, wildcard: Tile },

    /// Team totals after a resolved move
    ScoresChanged { vertical: Score, horizontal: Score },

    /// The turn passed to another player
    TurnChanged { player: PlayerId },

    /// The current player is an AI and should be asked for its move
    AiToPlay { player: PlayerId },

    /// The game reached a terminal state
    GameEnded {
        result: GameState,
        vertical: Score,
        horizontal: Score,
    },
}
