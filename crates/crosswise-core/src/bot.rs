//! AI players for Crosswise.
//!
//! The bot is fully deterministic. It enumerates every candidate with
//! [`movegen::generate`] and narrows them down in fixed stages:
//! - Win detection: a move that completes six of a kind is taken outright
//! - Threat prevention: defuse an opponent segment sitting at 7 points
//! - Maximum own gain
//! - Tie-breaks: standard over wildcard, most frequent in hand, rarest on
//!   the board, lowest ordinal, lowest target position
//!
//! Two-phase wildcards are split: the activation is returned first and the
//! effect is cached until the next call.

use crate::board::{Board, Team};
use crate::movegen::{self, PossibleTurn};
use crate::player::Hand;
use crate::scoring::{board_segment_score, Score, HAZARD_POINTS};
use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

/// A bot player. Holds only the pending second phase between calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pending: Option<PossibleTurn>,
}

impl Bot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached effect of an activated wildcard, if any
    pub fn pending_second_phase(&self) -> Option<&PossibleTurn> {
        self.pending.as_ref()
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Best candidate for `hand` on `board` without touching any state
    pub fn best_turn(&self, board: &Board, hand: &Hand, team: Team) -> Option<PossibleTurn> {
        select_turn(board, hand, team)
    }

    /// Choose the next move.
    ///
    /// A cached second phase is returned verbatim and cleared. Otherwise the
    /// best candidate is selected; a two-phase candidate yields its
    /// activation now and caches its effect.
    pub fn choose_turn(&mut self, board: &Board, hand: &Hand, team: Team) -> Option<PossibleTurn> {
        if let Some(effect) = self.pending.take() {
            debug!(target_cell = %effect.position, wildcard = ?effect.wildcard, "Bot plays cached second phase");
            return Some(effect);
        }

        let turn = select_turn(board, hand, team)?;
        if !turn.second_phase {
            debug!(tile = %turn.tile, target_cell = %turn.position, gain = turn.gain, "Bot chose move");
            return Some(turn);
        }

        let (activation, effect) = turn.split();
        debug!(wildcard = %activation.tile, target_cell = %effect.position, "Bot activates wildcard");
        self.pending = Some(effect);
        Some(activation)
    }

    /// Second phase for an already activated `wildcard`.
    ///
    /// Uses the cached effect when it belongs to that wildcard, otherwise
    /// selects among the wildcard's effects on the current board.
    pub fn complete_second_phase(
        &mut self,
        board: &Board,
        hand: &Hand,
        team: Team,
        wildcard: Tile,
    ) -> Option<PossibleTurn> {
        if let Some(effect) = self.pending.take() {
            if effect.wildcard == Some(wildcard) {
                return Some(effect);
            }
        }

        let candidates = match wildcard {
            Tile::Mover => movegen::mover_turns(board, 0, team),
            Tile::SwapOnBoard => movegen::swap_on_board_turns(board, 0, team),
            Tile::SwapWithHand => movegen::swap_with_hand_turns(board, hand, 0, team),
            _ => return None,
        };
        select(candidates, board, hand, team).map(|turn| turn.split().1)
    }
}

/// Select the move for `hand`, or `None` if there is none
pub fn select_turn(board: &Board, hand: &Hand, team: Team) -> Option<PossibleTurn> {
    if board.is_full() {
        return None;
    }
    select(movegen::generate(board, hand, team), board, hand, team)
}

/// Reduce candidates to a single move
pub fn select(
    candidates: Vec<PossibleTurn>,
    board: &Board,
    hand: &Hand,
    team: Team,
) -> Option<PossibleTurn> {
    if let Some(win) = candidates.iter().find(|c| c.own_points.is_win()) {
        return Some(*win);
    }

    if let Some(block) = prevent_threat(&candidates, board, team) {
        return Some(block);
    }

    let best_gain = candidates.iter().map(|c| c.gain).max()?;
    let mut survivors: Vec<PossibleTurn> =
        candidates.into_iter().filter(|c| c.gain == best_gain).collect();

    survivors = narrow(survivors, |c| c.wildcard.is_none());
    survivors = narrow(survivors, |c| hand.count_of(c.kind()));
    survivors = narrow(survivors, |c| Reverse(board.occurrences_of(c.kind())));
    survivors = narrow(survivors, |c| Reverse(c.kind()));
    survivors = narrow(survivors, |c| Reverse(c.position));

    survivors.first().copied()
}

/// Keep the candidates maximising `key`, preserving order
fn narrow<K, F>(survivors: Vec<PossibleTurn>, key: F) -> Vec<PossibleTurn>
where
    K: Ord,
    F: Fn(&PossibleTurn) -> K,
{
    if survivors.len() <= 1 {
        return survivors;
    }
    let Some(best) = survivors.iter().map(&key).max() else {
        return survivors;
    };
    survivors.into_iter().filter(|c| key(c) == best).collect()
}

/// The candidate that best defuses an opponent segment at 7 points.
///
/// A candidate qualifies when the opponent segment it affects currently
/// scores exactly 7, its resulting opponent score stays at or below 7 and
/// the tile it places does not yet occur in the opponent segment through
/// its target. The lowest resulting opponent score wins, first found on
/// ties.
fn prevent_threat(candidates: &[PossibleTurn], board: &Board, team: Team) -> Option<PossibleTurn> {
    let opponent = team.opponent();
    let hazard = Score::Points(HAZARD_POINTS);

    candidates
        .iter()
        .filter(|c| {
            let threatened = opponent.segment_of(c.threat_position());
            board_segment_score(board, threatened, opponent) == hazard
                && c.opponent_points <= hazard
                && board
                    .occurrences_at_segment(opponent.segment_of(c.position), opponent)
                    .get(c.tile)
                    == 0
        })
        .min_by_key(|c| c.opponent_points)
        .copied()
}
