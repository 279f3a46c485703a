//! Candidate move enumeration.
//!
//! Every legal move for a hand is evaluated on its own copy of the board,
//! so one candidate never observes another's effect and the live board is
//! never touched. Enumeration order is hand slot, then board scan order
//! (column-major, then row); the selector's tie-breaks rely on it.

use crate::actions::Move;
use crate::board::{Board, Position, Team};
use crate::player::Hand;
use crate::scoring::{board_segment_score, Score};
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// A fully specified move considered by the AI but not yet committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleTurn {
    /// Target cell
    pub position: Position,
    /// Tile that lands on the target (the Remover itself for Remover moves)
    pub tile: Tile,
    /// Hand slot of the played tile; `None` for a cached second phase
    pub hand_slot: Option<usize>,
    /// SwapWithHand: slot of the standard tile going onto the board
    pub swap_slot: Option<usize>,
    /// Mover / SwapOnBoard: cell the moved tile comes from
    pub source: Option<Position>,
    /// Tile displaced by a swap
    pub displaced: Option<Tile>,
    /// Mover's resulting total for its own segment
    pub own_points: Score,
    /// Opponent's resulting total for the perpendicular segment
    pub opponent_points: Score,
    /// `own_points` minus the segment's total before the move
    pub gain: i64,
    /// Whether this is the activation of a two-phase wildcard
    pub second_phase: bool,
    /// Wildcard that produced this candidate
    pub wildcard: Option<Tile>,
}

impl PossibleTurn {
    /// Tile kind used for tie-breaks: the wildcard if any, else the placed tile
    pub fn kind(&self) -> Tile {
        self.wildcard.unwrap_or(self.tile)
    }

    /// Cell whose opponent segment this move can defuse. A Mover defuses
    /// the segment it vacates, everything else the segment it lands in.
    pub fn threat_position(&self) -> Position {
        match (self.wildcard, self.source) {
            (Some(Tile::Mover), Some(source)) => source,
            _ => self.position,
        }
    }

    /// Split a two-phase candidate into its activation and its effect.
    ///
    /// The activation plays the wildcard from its hand slot; the effect keeps
    /// target, tile and source/swap data but no hand slot.
    pub fn split(self) -> (PossibleTurn, PossibleTurn) {
        let activation = PossibleTurn {
            tile: self.wildcard.unwrap_or(self.tile),
            ..self
        };
        let effect = PossibleTurn {
            hand_slot: None,
            second_phase: false,
            ..self
        };
        (activation, effect)
    }

    /// The protocol move that commits this candidate
    pub fn to_move(&self) -> Option<Move> {
        if self.second_phase {
            return Some(Move::ActivateWildcard {
                slot: self.hand_slot?,
            });
        }

        let at = self.position;
        Some(match self.wildcard {
            None => Move::Place {
                slot: self.hand_slot?,
                at,
            },
            Some(Tile::Remover) => Move::Remove {
                slot: self.hand_slot?,
                at,
            },
            Some(Tile::Mover) => Move::MoveTile {
                from: self.source?,
                to: at,
            },
            Some(Tile::SwapOnBoard) => Move::SwapTiles {
                from: self.source?,
                to: at,
            },
            Some(Tile::SwapWithHand) => Move::SwapWithHand {
                slot: self.swap_slot?,
                at,
            },
            Some(_) => return None,
        })
    }
}

/// Own and opponent totals of a hypothetical board
struct Evaluation {
    own: Score,
    opponent: Score,
    gain: i64,
}

fn evaluate(
    live: &Board,
    snapshot: &Board,
    team: Team,
    own_at: Position,
    opponent_at: Position,
) -> Evaluation {
    let own_segment = team.segment_of(own_at);
    let before = board_segment_score(live, own_segment, team);
    let own = board_segment_score(snapshot, own_segment, team);

    let opponent_team = team.opponent();
    let opponent = board_segment_score(
        snapshot,
        opponent_team.segment_of(opponent_at),
        opponent_team,
    );

    Evaluation {
        own,
        opponent,
        gain: own.gain_over(before),
    }
}

/// Every legal candidate for `hand` on `board`
pub fn generate(board: &Board, hand: &Hand, team: Team) -> Vec<PossibleTurn> {
    let mut turns = Vec::new();

    for (slot, tile) in hand.slots() {
        match tile {
            Tile::Empty => {}
            Tile::Remover => turns.extend(remover_turns(board, slot, team)),
            Tile::Mover => turns.extend(mover_turns(board, slot, team)),
            Tile::SwapOnBoard => turns.extend(swap_on_board_turns(board, slot, team)),
            Tile::SwapWithHand => turns.extend(swap_with_hand_turns(board, hand, slot, team)),
            standard => turns.extend(basic_turns(board, standard, slot, team)),
        }
    }

    turns
}

/// One candidate per free cell
pub fn basic_turns(board: &Board, tile: Tile, slot: usize, team: Team) -> Vec<PossibleTurn> {
    board
        .free_positions()
        .map(|pos| {
            let mut snapshot = board.clone();
            snapshot.place(tile, pos);
            let eval = evaluate(board, &snapshot, team, pos, pos);

            PossibleTurn {
                position: pos,
                tile,
                hand_slot: Some(slot),
                swap_slot: None,
                source: None,
                displaced: None,
                own_points: eval.own,
                opponent_points: eval.opponent,
                gain: eval.gain,
                second_phase: false,
                wildcard: None,
            }
        })
        .collect()
}

/// One candidate per occupied cell
pub fn remover_turns(board: &Board, slot: usize, team: Team) -> Vec<PossibleTurn> {
    board
        .occupied_positions()
        .map(|pos| {
            let mut snapshot = board.clone();
            snapshot.place(Tile::Empty, pos);
            let eval = evaluate(board, &snapshot, team, pos, pos);

            PossibleTurn {
                position: pos,
                tile: Tile::Remover,
                hand_slot: Some(slot),
                swap_slot: None,
                source: None,
                displaced: None,
                own_points: eval.own,
                opponent_points: eval.opponent,
                gain: eval.gain,
                second_phase: false,
                wildcard: Some(Tile::Remover),
            }
        })
        .collect()
}

/// One candidate per (occupied source, distinct free target) pair
pub fn mover_turns(board: &Board, slot: usize, team: Team) -> Vec<PossibleTurn> {
    let mut turns = Vec::new();

    for source in board.occupied_positions() {
        let moved = board.tile_at(source);

        for target in board.free_positions().filter(|p| *p != source) {
            let mut snapshot = board.clone();
            snapshot.place(Tile::Empty, source);
            snapshot.place(moved, target);
            let eval = evaluate(board, &snapshot, team, target, source);

            turns.push(PossibleTurn {
                position: target,
                tile: moved,
                hand_slot: Some(slot),
                swap_slot: None,
                source: Some(source),
                displaced: Some(Tile::Empty),
                own_points: eval.own,
                opponent_points: eval.opponent,
                gain: eval.gain,
                second_phase: true,
                wildcard: Some(Tile::Mover),
            });
        }
    }

    turns
}

/// One candidate per (occupied source, distinct occupied target) pair
pub fn swap_on_board_turns(board: &Board, slot: usize, team: Team) -> Vec<PossibleTurn> {
    let mut turns = Vec::new();
    if board.occupied_count() < 2 {
        return turns;
    }

    for source in board.occupied_positions() {
        let moved = board.tile_at(source);

        for target in board.occupied_positions().filter(|p| *p != source) {
            let swapped = board.tile_at(target);
            let mut snapshot = board.clone();
            snapshot.place(moved, target);
            snapshot.place(swapped, source);
            let eval = evaluate(board, &snapshot, team, target, target);

            turns.push(PossibleTurn {
                position: target,
                tile: moved,
                hand_slot: Some(slot),
                swap_slot: None,
                source: Some(source),
                displaced: Some(swapped),
                own_points: eval.own,
                opponent_points: eval.opponent,
                gain: eval.gain,
                second_phase: true,
                wildcard: Some(Tile::SwapOnBoard),
            });
        }
    }

    turns
}

/// One candidate per (occupied cell, standard hand tile) pair
pub fn swap_with_hand_turns(
    board: &Board,
    hand: &Hand,
    slot: usize,
    team: Team,
) -> Vec<PossibleTurn> {
    let mut turns = Vec::new();

    for pos in board.occupied_positions() {
        let taken = board.tile_at(pos);

        for (hand_slot, placed) in hand.slots().filter(|(_, t)| t.is_standard()) {
            let mut snapshot = board.clone();
            snapshot.place(placed, pos);
            let eval = evaluate(board, &snapshot, team, pos, pos);

            turns.push(PossibleTurn {
                position: pos,
                tile: placed,
                hand_slot: Some(slot),
                swap_slot: Some(hand_slot),
                source: None,
                displaced: Some(taken),
                own_points: eval.own,
                opponent_points: eval.opponent,
                gain: eval.gain,
                second_phase: true,
                wildcard: Some(Tile::SwapWithHand),
            });
        }
    }

    turns
}
