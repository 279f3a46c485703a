//! Core game state machine.
//!
//! This module contains the `Game` session and the turn protocol: basic
//! placement, the single-phase Remover, the two-phase wildcards and the
//! evaluation that runs after every fully resolved move.

use crate::actions::{GameEvent, Move};
use crate::bag::{TileBag, WildcardUsage};
use crate::board::{Board, PlayerId, Position, Team};
use crate::bot::select_turn;
use crate::config::GameConfig;
use crate::player::{Controller, Hand, Player, HAND_SIZE, SEAT_COUNT};
use crate::scoring::{self, Score};
use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, info};

/// Outcome of a session. Every value but `Ongoing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Ongoing,
    Draw,
    TeamVertical,
    TeamHorizontal,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        self != GameState::Ongoing
    }

    /// Winning team, if the game was decided in someone's favour
    pub fn winner(self) -> Option<Team> {
        match self {
            GameState::TeamVertical => Some(Team::Vertical),
            GameState::TeamHorizontal => Some(Team::Horizontal),
            GameState::Ongoing | GameState::Draw => None,
        }
    }

    /// Higher total wins, equal totals draw
    pub fn from_scores(vertical: Score, horizontal: Score) -> Self {
        match vertical.cmp(&horizontal) {
            Ordering::Greater => GameState::TeamVertical,
            Ordering::Less => GameState::TeamHorizontal,
            Ordering::Equal => GameState::Draw,
        }
    }
}

/// Turn protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// The player may place a tile, use a Remover or activate a wildcard
    AwaitingMove { player: PlayerId },
    /// The player activated a two-phase wildcard and must complete it
    AwaitingSecondPhase { player: PlayerId, wildcard: Tile },
    /// Game over
    Ended { result: GameState },
}

/// Errors that can occur when applying moves
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Game is over")]
    GameOver,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid move for current phase")]
    InvalidPhase,

    #[error("No playable tile in hand slot {0}")]
    InvalidHandSlot(usize),

    #[error("Position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("Cell {0} is occupied")]
    CellOccupied(Position),

    #[error("Cell {0} is empty")]
    CellEmpty(Position),

    #[error("Source and target are both {0}")]
    SameCell(Position),

    #[error("Hand slot {slot} holds {found}, which cannot be played this way")]
    TileMismatch { slot: usize, found: Tile },

    #[error("Wildcard cannot be activated: {0}")]
    WildcardUnavailable(String),

    #[error("Current player is not controlled by the AI")]
    NotAiTurn,
}

/// A game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub(crate) board: Board,
    /// All four seats, active or not
    pub(crate) players: Vec<Player>,
    pub(crate) current_player: PlayerId,
    pub(crate) phase: GamePhase,
    pub(crate) used_wildcards: WildcardUsage,
    pub(crate) bag: TileBag,
}

impl Game {
    /// Start a fresh game: shuffle a full bag and deal to every active seat
    pub fn new(config: &GameConfig, players: Vec<Player>) -> Self {
        let bag = match config.bag_seed {
            Some(seed) => TileBag::with_seed(seed),
            None => TileBag::new(),
        };
        Self::with_bag(config.board_size, players, bag)
    }

    /// Start a fresh game drawing from a prepared bag.
    ///
    /// Active seats are dealt [`HAND_SIZE`] tiles each in seat order; the
    /// first active seat moves first.
    pub fn with_bag(board_size: usize, mut players: Vec<Player>, mut bag: TileBag) -> Self {
        assert_eq!(players.len(), SEAT_COUNT, "A table has exactly {SEAT_COUNT} seats");
        assert!(players.iter().any(|p| p.active), "At least one seat must be active");

        for player in players.iter_mut() {
            player.hand = if player.active {
                Hand::from_tiles(
                    (0..HAND_SIZE)
                        .map(|_| bag.draw().unwrap_or(Tile::Empty))
                        .collect(),
                )
            } else {
                Hand::new()
            };
        }

        let first = players.iter().position(|p| p.active).unwrap_or(0) as PlayerId;
        let mut game = Self {
            board: Board::new(board_size),
            players,
            current_player: first,
            phase: GamePhase::AwaitingMove { player: first },
            used_wildcards: WildcardUsage::new(),
            bag,
        };

        info!(
            board_size,
            active = game.players.iter().filter(|p| p.active).count(),
            "Game started"
        );
        game.settle_opening();
        game
    }

    /// Resume a game from its parts. The phase is derived: a board that
    /// already meets an end condition, or a current player without any
    /// move, starts the session ended.
    pub fn from_parts(
        board: Board,
        players: Vec<Player>,
        current_player: PlayerId,
        used_wildcards: WildcardUsage,
        bag: TileBag,
    ) -> Self {
        let mut game = Self {
            board,
            players,
            current_player,
            phase: GamePhase::AwaitingMove {
                player: current_player,
            },
            used_wildcards,
            bag,
        };
        game.settle_opening();
        game
    }

    fn settle_opening(&mut self) {
        let result = match self.evaluate() {
            GameState::Ongoing if !self.can_move(self.current_player) => self.compare_scores(),
            result => result,
        };
        if result.is_terminal() {
            self.end(result);
        }
    }

    // ==================== Accessors ====================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub fn hand(&self, id: PlayerId) -> Option<&Hand> {
        self.player(id).map(|p| &p.hand)
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn used_wildcards(&self) -> &WildcardUsage {
        &self.used_wildcards
    }

    pub fn bag(&self) -> &TileBag {
        &self.bag
    }

    /// Result so far; `Ongoing` until the game has ended
    pub fn state(&self) -> GameState {
        match self.phase {
            GamePhase::Ended { result } => result,
            _ => GameState::Ongoing,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Ended { .. })
    }

    // ==================== Scores ====================

    pub fn team_score(&self, team: Team) -> Score {
        scoring::team_score(&self.board, team)
    }

    /// Per-segment scores of a team, in segment index order
    pub fn segment_scores(&self, team: Team) -> Vec<Score> {
        scoring::segment_scores(&self.board, team)
    }

    /// (vertical, horizontal) team totals
    pub fn scores(&self) -> (Score, Score) {
        (
            self.team_score(Team::Vertical),
            self.team_score(Team::Horizontal),
        )
    }

    /// End condition of the current board, ignoring whose turn it is.
    ///
    /// A WIN on either side, or a full board, ends the game by comparing
    /// totals; WIN on both sides at once compares equal and is a draw.
    pub fn evaluate(&self) -> GameState {
        let (vertical, horizontal) = self.scores();
        if vertical.is_win() || horizontal.is_win() || self.board.is_full() {
            GameState::from_scores(vertical, horizontal)
        } else {
            GameState::Ongoing
        }
    }

    fn compare_scores(&self) -> GameState {
        let (vertical, horizontal) = self.scores();
        GameState::from_scores(vertical, horizontal)
    }

    /// Whether `player` has any legal move. Never mutates bot state.
    pub fn can_move(&self, player: PlayerId) -> bool {
        let Some(seat) = self.player(player) else {
            return false;
        };
        if !seat.active {
            return false;
        }
        if seat.bot().is_some_and(|b| b.pending_second_phase().is_some()) {
            return true;
        }
        select_turn(&self.board, &seat.hand, Team::for_seat(player)).is_some()
    }

    /// Next active seat after `from`, wrapping around
    pub fn next_active_player(&self, from: PlayerId) -> PlayerId {
        (1..=SEAT_COUNT)
            .map(|offset| ((from as usize + offset) % SEAT_COUNT) as PlayerId)
            .find(|id| self.player(*id).is_some_and(|p| p.active))
            .unwrap_or(from)
    }

    // ==================== Moves ====================

    /// Apply a move for a player.
    ///
    /// Validation happens before any mutation, so a rejected move leaves the
    /// game untouched.
    pub fn apply_move(&mut self, player: PlayerId, mv: Move) -> Result<Vec<GameEvent>, GameError> {
        let (current, awaiting) = match self.phase {
            GamePhase::Ended { .. } => return Err(GameError::GameOver),
            GamePhase::AwaitingMove { player } => (player, None),
            GamePhase::AwaitingSecondPhase { player, wildcard } => (player, Some(wildcard)),
        };
        if player != current {
            return Err(GameError::NotYourTurn);
        }

        let mut events = Vec::new();

        match (mv, awaiting) {
            // ==================== Single Phase ====================
            (Move::Place { slot, at }, None) => self.place_from_hand(player, slot, at, &mut events)?,
            (Move::Remove { slot, at }, None) => self.remove_tile(player, slot, at, &mut events)?,

            // ==================== Two Phases ====================
            (Move::ActivateWildcard { slot }, None) => {
                self.activate_wildcard(player, slot, &mut events)?;
                return Ok(events);
            }
            (Move::MoveTile { from, to }, Some(Tile::Mover)) => {
                self.move_tile(from, to, &mut events)?
            }
            (Move::SwapTiles { from, to }, Some(Tile::SwapOnBoard)) => {
                self.swap_tiles(from, to, &mut events)?
            }
            (Move::SwapWithHand { slot, at }, Some(Tile::SwapWithHand)) => {
                self.swap_with_hand(player, slot, at, &mut events)?
            }

            _ => return Err(GameError::InvalidPhase),
        }

        debug!(player, ?mv, "Move resolved");
        events.extend(self.finish_move());
        Ok(events)
    }

    /// Let the AI in the current seat play one step of its turn.
    ///
    /// An AI without any legal move ends the game by score comparison.
    pub fn play_ai_turn(&mut self) -> Result<Vec<GameEvent>, GameError> {
        let (player, awaiting) = match self.phase {
            GamePhase::Ended { .. } => return Err(GameError::GameOver),
            GamePhase::AwaitingMove { player } => (player, None),
            GamePhase::AwaitingSecondPhase { player, wildcard } => (player, Some(wildcard)),
        };
        let team = Team::for_seat(player);

        let seat = self
            .players
            .get_mut(player as usize)
            .ok_or(GameError::NotYourTurn)?;
        let Controller::Ai(bot) = &mut seat.controller else {
            return Err(GameError::NotAiTurn);
        };
        let turn = match awaiting {
            None => bot.choose_turn(&self.board, &seat.hand, team),
            Some(wildcard) => bot.complete_second_phase(&self.board, &seat.hand, team, wildcard),
        };

        let Some(turn) = turn else {
            debug!(player, "AI has no legal move");
            let result = self.compare_scores();
            return Ok(vec![self.end(result)]);
        };

        let mv = turn.to_move().ok_or(GameError::InvalidPhase)?;
        debug!(player, ?mv, own = %turn.own_points, opponent = %turn.opponent_points, "AI move");
        self.apply_move(player, mv)
    }

    fn check_bounds(&self, pos: Position) -> Result<(), GameError> {
        if self.board.contains(pos) {
            Ok(())
        } else {
            Err(GameError::OutOfBounds(pos))
        }
    }

    /// Non-empty tile in a hand slot
    fn hand_tile(&self, player: PlayerId, slot: usize) -> Result<Tile, GameError> {
        self.hand(player)
            .and_then(|h| h.get(slot))
            .filter(|t| !t.is_empty())
            .ok_or(GameError::InvalidHandSlot(slot))
    }

    /// Replace a slot's tile with the next bag tile (or `Empty`)
    fn refill_slot(&mut self, player: PlayerId, slot: usize, events: &mut Vec<GameEvent>) {
        let drawn = self.bag.draw().unwrap_or(Tile::Empty);
        let hand = &mut self.players[player as usize].hand;
        hand.replace_at(slot, drawn);
        events.push(GameEvent::HandChanged {
            player,
            hand: hand.tiles().to_vec(),
        });
    }

    fn set_cell(&mut self, tile: Tile, position: Position, events: &mut Vec<GameEvent>) {
        self.board.place(tile, position);
        events.push(GameEvent::TilePlaced { position, tile });
    }

    fn place_from_hand(
        &mut self,
        player: PlayerId,
        slot: usize,
        at: Position,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        self.check_bounds(at)?;
        let tile = self.hand_tile(player, slot)?;
        if !tile.is_standard() {
            return Err(GameError::TileMismatch { slot, found: tile });
        }
        if !self.board.is_free(at) {
            return Err(GameError::CellOccupied(at));
        }

        self.set_cell(tile, at, events);
        self.refill_slot(player, slot, events);
        Ok(())
    }

    fn remove_tile(
        &mut self,
        player: PlayerId,
        slot: usize,
        at: Position,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        self.check_bounds(at)?;
        let tile = self.hand_tile(player, slot)?;
        if tile != Tile::Remover {
            return Err(GameError::TileMismatch { slot, found: tile });
        }
        if self.board.is_free(at) {
            return Err(GameError::CellEmpty(at));
        }

        self.set_cell(Tile::Empty, at, events);
        self.used_wildcards.record(Tile::Remover);
        self.refill_slot(player, slot, events);
        Ok(())
    }

    fn activate_wildcard(
        &mut self,
        player: PlayerId,
        slot: usize,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        let wildcard = self.hand_tile(player, slot)?;
        if !wildcard.has_second_phase() {
            return Err(GameError::TileMismatch {
                slot,
                found: wildcard,
            });
        }
        self.check_activation(player, slot, wildcard)?;

        self.refill_slot(player, slot, events);
        self.used_wildcards.record(wildcard);
        self.phase = GamePhase::AwaitingSecondPhase { player, wildcard };
        events.push(GameEvent::WildcardActivated { player, wildcard });

        debug!(player, %wildcard, "Wildcard activated");
        Ok(())
    }

    fn check_activation(&self, player: PlayerId, slot: usize, wildcard: Tile) -> Result<(), GameError> {
        if self.board.is_empty() {
            return Err(GameError::WildcardUnavailable("the board is empty".into()));
        }

        match wildcard {
            Tile::SwapOnBoard if self.board.occupied_count() < 2 => Err(
                GameError::WildcardUnavailable("fewer than two tiles on the board".into()),
            ),
            Tile::SwapWithHand => {
                let in_hand = self
                    .hand(player)
                    .is_some_and(|h| h.slots().any(|(s, t)| s != slot && t.is_standard()));
                let next_draw = self.bag.peek().is_some_and(Tile::is_standard);
                if in_hand || next_draw {
                    Ok(())
                } else {
                    Err(GameError::WildcardUnavailable(
                        "no standard tile to swap".into(),
                    ))
                }
            }
            _ => Ok(()),
        }
    }

    fn move_tile(
        &mut self,
        from: Position,
        to: Position,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if from == to {
            return Err(GameError::SameCell(from));
        }
        if self.board.is_free(from) {
            return Err(GameError::CellEmpty(from));
        }
        if !self.board.is_free(to) {
            return Err(GameError::CellOccupied(to));
        }

        let tile = self.board.tile_at(from);
        self.set_cell(Tile::Empty, from, events);
        self.set_cell(tile, to, events);
        Ok(())
    }

    fn swap_tiles(
        &mut self,
        from: Position,
        to: Position,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if from == to {
            return Err(GameError::SameCell(from));
        }
        for pos in [from, to] {
            if self.board.is_free(pos) {
                return Err(GameError::CellEmpty(pos));
            }
        }

        let moved = self.board.tile_at(from);
        let swapped = self.board.tile_at(to);
        self.set_cell(moved, to, events);
        self.set_cell(swapped, from, events);
        Ok(())
    }

    fn swap_with_hand(
        &mut self,
        player: PlayerId,
        slot: usize,
        at: Position,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), GameError> {
        self.check_bounds(at)?;
        let placed = self.hand_tile(player, slot)?;
        if !placed.is_standard() {
            return Err(GameError::TileMismatch { slot, found: placed });
        }
        if self.board.is_free(at) {
            return Err(GameError::CellEmpty(at));
        }

        let taken = self.board.tile_at(at);
        self.set_cell(placed, at, events);
        let hand = &mut self.players[player as usize].hand;
        hand.replace_at(slot, taken);
        events.push(GameEvent::HandChanged {
            player,
            hand: hand.tiles().to_vec(),
        });
        Ok(())
    }

    /// Post-move evaluation: scores, end conditions, then the turn passes
    fn finish_move(&mut self) -> Vec<GameEvent> {
        let (vertical, horizontal) = self.scores();
        let mut events = vec![GameEvent::ScoresChanged {
            vertical,
            horizontal,
        }];

        let result = self.evaluate();
        if result.is_terminal() {
            events.push(self.end(result));
            return events;
        }

        let next = self.next_active_player(self.current_player);
        let next_is_ai = self.player(next).is_some_and(Player::is_ai);
        if next_is_ai && !self.can_move(next) {
            debug!(player = next, "Next AI cannot move");
            let result = GameState::from_scores(vertical, horizontal);
            events.push(self.end(result));
            return events;
        }

        self.current_player = next;
        self.phase = GamePhase::AwaitingMove { player: next };
        events.push(GameEvent::TurnChanged { player: next });
        if next_is_ai {
            events.push(GameEvent::AiToPlay { player: next });
        }
        events
    }

    fn end(&mut self, result: GameState) -> GameEvent {
        let (vertical, horizontal) = self.scores();
        self.phase = GamePhase::Ended { result };
        info!(?result, %vertical, %horizontal, "Game ended");
        GameEvent::GameEnded {
            result,
            vertical,
            horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn humans() -> Vec<Player> {
        (0..SEAT_COUNT)
            .map(|i| Player::human(format!("Player {}", i + 1)))
            .collect()
    }

    fn pos(column: usize, row: usize) -> Position {
        Position::new(column, row)
    }

    /// A game with fixed hands on a prepared board
    fn game_with(board: Board, hands: [&[Tile]; SEAT_COUNT], bag: Vec<Tile>) -> Game {
        let players = humans()
            .into_iter()
            .zip(hands)
            .map(|(p, h)| p.with_hand(Hand::from_tiles(h.to_vec())))
            .collect();
        Game::from_parts(board, players, 0, WildcardUsage::new(), TileBag::from_tiles(bag))
    }

    fn standard_hand() -> [&'static [Tile]; SEAT_COUNT] {
        [
            &[Tile::Sun, Tile::Cross, Tile::Remover, Tile::Mover],
            &[Tile::Star, Tile::Star, Tile::Square, Tile::Sun],
            &[Tile::Cross, Tile::Triangle, Tile::Pentagon, Tile::Sun],
            &[Tile::Pentagon, Tile::Square, Tile::SwapOnBoard, Tile::Star],
        ]
    }

    fn seeded_board() -> Board {
        let mut board = Board::new(6);
        board.place(Tile::Square, pos(3, 3));
        board
    }

    #[test]
    fn test_new_game_deals_active_seats() {
        let mut players = humans();
        players[2] = Player::inactive("Nobody");
        let bag: Vec<Tile> = std::iter::repeat(Tile::Sun).take(20).collect();
        let game = Game::with_bag(6, players, TileBag::from_tiles(bag));

        assert_eq!(game.hand(0).unwrap().len(), HAND_SIZE);
        assert_eq!(game.hand(2).unwrap().len(), 0);
        assert_eq!(game.bag().remaining(), 20 - 3 * HAND_SIZE);
        assert_eq!(game.phase(), GamePhase::AwaitingMove { player: 0 });
    }

    #[test]
    fn test_seeded_games_deal_identically() {
        let config = GameConfig {
            bag_seed: Some(3),
            ..GameConfig::default()
        };
        let a = Game::new(&config, humans());
        let b = Game::new(&config, humans());
        assert_eq!(a.players(), b.players());
    }

    #[test]
    fn test_stranded_opening_ends_in_draw() {
        let wildcards = vec![Tile::Remover, Tile::Mover, Tile::SwapOnBoard, Tile::SwapWithHand];
        let mut bag = wildcards.clone();
        bag.extend(std::iter::repeat(Tile::Sun).take(12));
        let game = Game::with_bag(6, humans(), TileBag::from_tiles(bag));

        assert_eq!(game.hand(0).unwrap().tiles(), wildcards.as_slice());
        assert_eq!(game.state(), GameState::Draw);
        assert!(game.is_finished());
    }

    #[test]
    fn test_place_refills_and_passes_turn() {
        let mut game = game_with(seeded_board(), standard_hand(), vec![Tile::Triangle]);
        let events = game
            .apply_move(0, Move::Place { slot: 1, at: pos(0, 0) })
            .unwrap();

        assert_eq!(game.board().tile_at(pos(0, 0)), Tile::Cross);
        assert_eq!(
            game.hand(0).unwrap().tiles(),
            &[Tile::Sun, Tile::Triangle, Tile::Remover, Tile::Mover]
        );
        assert_eq!(game.current_player(), 1);
        assert_eq!(
            events,
            vec![
                GameEvent::TilePlaced {
                    position: pos(0, 0),
                    tile: Tile::Cross,
                },
                GameEvent::HandChanged {
                    player: 0,
                    hand: vec![Tile::Sun, Tile::Triangle, Tile::Remover, Tile::Mover],
                },
                GameEvent::ScoresChanged {
                    vertical: Score::ZERO,
                    horizontal: Score::ZERO,
                },
                GameEvent::TurnChanged { player: 1 },
            ]
        );
    }

    #[test]
    fn test_exhausted_bag_leaves_empty_slot() {
        let mut game = game_with(seeded_board(), standard_hand(), vec![]);
        game.apply_move(0, Move::Place { slot: 0, at: pos(0, 0) })
            .unwrap();
        assert_eq!(game.hand(0).unwrap().get(0), Some(Tile::Empty));
    }

    #[test]
    fn test_rejected_moves_leave_state_untouched() {
        let mut game = game_with(seeded_board(), standard_hand(), vec![Tile::Star]);
        let before = game.board().clone();

        let cases = [
            (1, Move::Place { slot: 0, at: pos(0, 0) }, GameError::NotYourTurn),
            (0, Move::Place { slot: 0, at: pos(3, 3) }, GameError::CellOccupied(pos(3, 3))),
            (0, Move::Place { slot: 0, at: pos(6, 0) }, GameError::OutOfBounds(pos(6, 0))),
            (0, Move::Place { slot: 7, at: pos(0, 0) }, GameError::InvalidHandSlot(7)),
            (
                0,
                Move::Place { slot: 2, at: pos(0, 0) },
                GameError::TileMismatch { slot: 2, found: Tile::Remover },
            ),
            (0, Move::Remove { slot: 2, at: pos(0, 0) }, GameError::CellEmpty(pos(0, 0))),
            (
                0,
                Move::MoveTile { from: pos(3, 3), to: pos(0, 0) },
                GameError::InvalidPhase,
            ),
        ];
        for (player, mv, expected) in cases {
            assert_eq!(game.apply_move(player, mv), Err(expected));
        }

        assert_eq!(game.board(), &before);
        assert_eq!(game.bag().remaining(), 1);
        assert_eq!(game.current_player(), 0);
    }

    #[test]
    fn test_remover_clears_and_counts() {
        let mut game = game_with(seeded_board(), standard_hand(), vec![Tile::Star]);
        game.apply_move(0, Move::Remove { slot: 2, at: pos(3, 3) })
            .unwrap();

        assert!(game.board().is_empty());
        assert_eq!(game.used_wildcards().count(Tile::Remover), 1);
        assert_eq!(game.hand(0).unwrap().get(2), Some(Tile::Star));
    }

    #[test]
    fn test_mover_two_phases() {
        let mut game = game_with(seeded_board(), standard_hand(), vec![Tile::Star]);

        let events = game.apply_move(0, Move::ActivateWildcard { slot: 3 }).unwrap();
        assert!(events.contains(&GameEvent::WildcardActivated {
            player: 0,
            wildcard: Tile::Mover,
        }));
        assert_eq!(game.hand(0).unwrap().get(3), Some(Tile::Star));
        assert_eq!(
            game.phase(),
            GamePhase::AwaitingSecondPhase {
                player: 0,
                wildcard: Tile::Mover,
            }
        );

        // Locked in: no other move type and no other player
        assert_eq!(
            game.apply_move(0, Move::Place { slot: 0, at: pos(0, 0) }),
            Err(GameError::InvalidPhase)
        );
        assert_eq!(
            game.apply_move(1, Move::MoveTile { from: pos(3, 3), to: pos(0, 0) }),
            Err(GameError::NotYourTurn)
        );
        assert_eq!(
            game.apply_move(0, Move::SwapTiles { from: pos(3, 3), to: pos(0, 0) }),
            Err(GameError::InvalidPhase)
        );

        game.apply_move(0, Move::MoveTile { from: pos(3, 3), to: pos(0, 5) })
            .unwrap();
        assert_eq!(game.board().tile_at(pos(0, 5)), Tile::Square);
        assert!(game.board().is_free(pos(3, 3)));
        assert_eq!(game.used_wildcards().count(Tile::Mover), 1);
        assert_eq!(game.phase(), GamePhase::AwaitingMove { player: 1 });
    }

    #[test]
    fn test_swap_on_board_needs_two_tiles() {
        let mut hands = standard_hand();
        hands[0] = &[Tile::SwapOnBoard, Tile::Sun, Tile::Sun, Tile::Sun];
        let mut game = game_with(seeded_board(), hands, vec![Tile::Star]);

        assert!(matches!(
            game.apply_move(0, Move::ActivateWildcard { slot: 0 }),
            Err(GameError::WildcardUnavailable(_))
        ));
        assert_eq!(game.used_wildcards().count(Tile::SwapOnBoard), 0);
    }

    #[test]
    fn test_swap_on_board_exchanges_tiles() {
        let mut board = seeded_board();
        board.place(Tile::Sun, pos(0, 0));
        let mut hands = standard_hand();
        hands[0] = &[Tile::Cross, Tile::SwapOnBoard, Tile::Sun, Tile::Sun];
        let mut game = game_with(board, hands, vec![Tile::Star]);

        game.apply_move(0, Move::ActivateWildcard { slot: 1 }).unwrap();
        assert_eq!(
            game.apply_move(0, Move::SwapTiles { from: pos(0, 0), to: pos(0, 0) }),
            Err(GameError::SameCell(pos(0, 0)))
        );
        game.apply_move(0, Move::SwapTiles { from: pos(0, 0), to: pos(3, 3) })
            .unwrap();

        assert_eq!(game.board().tile_at(pos(0, 0)), Tile::Square);
        assert_eq!(game.board().tile_at(pos(3, 3)), Tile::Sun);
    }

    #[test]
    fn test_swap_with_hand_exchanges_with_slot() {
        let mut hands = standard_hand();
        hands[0] = &[Tile::SwapWithHand, Tile::Triangle, Tile::Remover, Tile::Mover];
        let mut game = game_with(seeded_board(), hands, vec![Tile::Mover]);

        game.apply_move(0, Move::ActivateWildcard { slot: 0 }).unwrap();
        assert_eq!(
            game.apply_move(0, Move::SwapWithHand { slot: 0, at: pos(3, 3) }),
            Err(GameError::TileMismatch { slot: 0, found: Tile::Mover })
        );
        game.apply_move(0, Move::SwapWithHand { slot: 1, at: pos(3, 3) })
            .unwrap();

        assert_eq!(game.board().tile_at(pos(3, 3)), Tile::Triangle);
        assert_eq!(
            game.hand(0).unwrap().tiles(),
            &[Tile::Mover, Tile::Square, Tile::Remover, Tile::Mover]
        );
    }

    #[test]
    fn test_swap_with_hand_needs_standard_tile() {
        let mut hands = standard_hand();
        hands[0] = &[Tile::SwapWithHand, Tile::Remover, Tile::Mover, Tile::Empty];

        let mut blocked = game_with(seeded_board(), hands, vec![Tile::Remover]);
        assert!(matches!(
            blocked.apply_move(0, Move::ActivateWildcard { slot: 0 }),
            Err(GameError::WildcardUnavailable(_))
        ));

        // The refill is standard, so the swap becomes possible
        let mut allowed = game_with(seeded_board(), hands, vec![Tile::Cross]);
        assert!(allowed.apply_move(0, Move::ActivateWildcard { slot: 0 }).is_ok());
    }

    #[test]
    fn test_win_of_sixes_ends_game() {
        let mut board = Board::new(6);
        for row in 0..5 {
            board.place(Tile::Star, pos(0, row));
        }
        let mut hands = standard_hand();
        hands[0] = &[Tile::Star, Tile::Sun, Tile::Sun, Tile::Sun];
        let mut game = game_with(board, hands, vec![]);

        let events = game
            .apply_move(0, Move::Place { slot: 0, at: pos(0, 5) })
            .unwrap();
        assert_eq!(game.state(), GameState::TeamVertical);
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameEnded {
                result: GameState::TeamVertical,
                vertical: Score::Win,
                ..
            })
        ));
        assert_eq!(
            game.apply_move(1, Move::Place { slot: 0, at: pos(1, 1) }),
            Err(GameError::GameOver)
        );
    }

    #[test]
    fn test_simultaneous_win_of_sixes_is_a_draw() {
        // Column 0 and row 5 each hold five stars and meet at (0,5)
        let mut board = Board::new(6);
        for i in 0..5 {
            board.place(Tile::Star, pos(0, i));
            board.place(Tile::Star, pos(i + 1, 5));
        }
        let mut hands = standard_hand();
        hands[0] = &[Tile::Star, Tile::Sun, Tile::Sun, Tile::Sun];
        let mut game = game_with(board, hands, vec![]);

        let events = game
            .apply_move(0, Move::Place { slot: 0, at: pos(0, 5) })
            .unwrap();
        assert_eq!(game.scores(), (Score::Win, Score::Win));
        assert_eq!(game.state(), GameState::Draw);
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameEnded {
                result: GameState::Draw,
                vertical: Score::Win,
                horizontal: Score::Win,
            })
        );
    }

    #[test]
    fn test_full_board_compares_scores() {
        // 2x2 board, three cells filled; horizontal already has a pair in row 0
        let board = Board::from_columns(&[
            vec![Tile::Sun, Tile::Cross],
            vec![Tile::Sun, Tile::Empty],
        ])
        .unwrap();
        let mut hands = standard_hand();
        hands[0] = &[Tile::Star, Tile::Star, Tile::Star, Tile::Star];
        let mut game = game_with(board, hands, vec![]);

        game.apply_move(0, Move::Place { slot: 0, at: pos(1, 1) })
            .unwrap();
        assert_eq!(game.state(), GameState::TeamHorizontal);
    }

    #[test]
    fn test_loaded_finished_board_starts_ended() {
        let mut board = Board::new(6);
        for column in 0..6 {
            board.place(Tile::Pentagon, pos(column, 4));
        }
        let game = game_with(board, standard_hand(), vec![]);
        assert_eq!(game.state(), GameState::TeamHorizontal);
    }

    #[test]
    fn test_turn_skips_inactive_seats() {
        let players = vec![
            Player::human("A").with_hand(Hand::from_tiles(vec![Tile::Sun; 4])),
            Player::inactive("B"),
            Player::inactive("C"),
            Player::human("D").with_hand(Hand::from_tiles(vec![Tile::Star; 4])),
        ];
        let mut game =
            Game::from_parts(Board::new(6), players, 0, WildcardUsage::new(), TileBag::from_tiles(vec![]));

        assert_eq!(game.next_active_player(0), 3);
        assert_eq!(game.next_active_player(3), 0);
        game.apply_move(0, Move::Place { slot: 0, at: pos(0, 0) })
            .unwrap();
        assert_eq!(game.current_player(), 3);
    }

    #[test]
    fn test_ai_plays_and_requests_next_ai() {
        let mut players: Vec<Player> = (0..SEAT_COUNT).map(|i| Player::ai(format!("Bot {i}"))).collect();
        for (player, hand) in players.iter_mut().zip(standard_hand()) {
            player.hand = Hand::from_tiles(hand.to_vec());
        }
        let mut game = Game::from_parts(
            seeded_board(),
            players,
            0,
            WildcardUsage::new(),
            TileBag::from_tiles(vec![Tile::Star; 10]),
        );

        let mut events = game.play_ai_turn().unwrap();
        if game.phase() == (GamePhase::AwaitingSecondPhase { player: 0, wildcard: Tile::Mover }) {
            events = game.play_ai_turn().unwrap();
        }
        assert_eq!(game.current_player(), 1);
        assert!(events.contains(&GameEvent::AiToPlay { player: 1 }));
    }

    #[test]
    fn test_play_ai_turn_rejects_humans() {
        let mut game = game_with(seeded_board(), standard_hand(), vec![]);
        assert_eq!(game.play_ai_turn(), Err(GameError::NotAiTurn));
    }

    #[test]
    fn test_ai_without_move_ends_game() {
        let wildcards = [Tile::Remover, Tile::Mover, Tile::SwapOnBoard, Tile::SwapWithHand];
        let players = vec![
            Player::human("A").with_hand(Hand::from_tiles(vec![Tile::Sun; 4])),
            Player::ai("B").with_hand(Hand::from_tiles(wildcards.to_vec())),
            Player::inactive("C"),
            Player::inactive("D"),
        ];
        let mut board = Board::new(6);
        board.place(Tile::Sun, pos(2, 2));
        let mut game =
            Game::from_parts(board, players, 0, WildcardUsage::new(), TileBag::from_tiles(vec![]));

        // Clearing the only tile leaves the AI with wildcards on an empty board
        game.players[0].hand = Hand::from_tiles(vec![Tile::Remover; 4]);
        let events = game
            .apply_move(0, Move::Remove { slot: 0, at: pos(2, 2) })
            .unwrap();

        assert_eq!(game.state(), GameState::Draw);
        assert!(matches!(events.last(), Some(GameEvent::GameEnded { .. })));
    }

    #[test]
    fn test_can_move_is_pure() {
        let mut board = Board::new(6);
        board.place(Tile::Sun, pos(1, 1));
        let players = vec![
            Player::ai("A").with_hand(Hand::from_tiles(vec![Tile::Mover; 4])),
            Player::inactive("B"),
            Player::inactive("C"),
            Player::inactive("D"),
        ];
        let game = Game::from_parts(board, players, 0, WildcardUsage::new(), TileBag::from_tiles(vec![]));

        assert!(game.can_move(0));
        assert_eq!(game.player(0).unwrap().bot().unwrap().pending_second_phase(), None);
        assert!(!game.can_move(1));
    }
}
