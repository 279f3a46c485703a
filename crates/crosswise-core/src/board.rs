//! Game board representation.
//!
//! This module contains:
//! - Board positions and their row-major ordering
//! - Teams and the segment orientation each one scores
//! - The N x N tile grid with query and mutation primitives

use crate::tile::{Tile, TileCounts};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Seat identifier (0-3)
pub type PlayerId = u8;

/// A cell on the board.
///
/// Positions are ordered row first, then column. Board scans, in contrast,
/// run column-major (see [`Board::positions`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

impl Position {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}|{})", self.column, self.row)
    }
}

/// The two teams. Each team scores the segments of one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Even seats, scores columns
    Vertical,
    /// Odd seats, scores rows
    Horizontal,
}

impl Team {
    /// Team of a seat: even seats play vertical, odd seats horizontal
    pub fn for_seat(seat: PlayerId) -> Self {
        if seat % 2 == 0 {
            Team::Vertical
        } else {
            Team::Horizontal
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Team::Vertical => Team::Horizontal,
            Team::Horizontal => Team::Vertical,
        }
    }

    /// Index of the segment this team scores through `pos`
    pub fn segment_of(self, pos: Position) -> usize {
        match self {
            Team::Vertical => pos.column,
            Team::Horizontal => pos.row,
        }
    }
}

/// The N x N tile grid.
///
/// Every cell always holds exactly one [`Tile`]; a free cell holds
/// [`Tile::Empty`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    /// Column-major storage: `cells[column * size + row]`
    cells: Vec<Tile>,
}

impl Board {
    /// Create an empty board
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Board size must be positive");
        Self {
            size,
            cells: vec![Tile::Empty; size * size],
        }
    }

    /// Build a board from columns (`columns[column][row]`).
    ///
    /// Returns `None` unless the input is a non-empty square grid.
    pub fn from_columns(columns: &[Vec<Tile>]) -> Option<Self> {
        let size = columns.len();
        if size == 0 || columns.iter().any(|c| c.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: columns.iter().flatten().copied().collect(),
        })
    }

    /// Board contents as columns (`result[column][row]`)
    pub fn columns(&self) -> Vec<Vec<Tile>> {
        self.cells.chunks(self.size).map(|c| c.to_vec()).collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.column < self.size && pos.row < self.size
    }

    /// Panics when `pos` is off the board; a row past the edge would
    /// otherwise alias a cell of the next column.
    fn index(&self, pos: Position) -> usize {
        assert!(self.contains(pos), "position {pos} outside board");
        pos.column * self.size + pos.row
    }

    pub fn tile_at(&self, pos: Position) -> Tile {
        self.cells[self.index(pos)]
    }

    /// Overwrite a cell. The caller guarantees legality.
    pub fn place(&mut self, tile: Tile, pos: Position) {
        let idx = self.index(pos);
        self.cells[idx] = tile;
    }

    pub fn is_free(&self, pos: Position) -> bool {
        self.tile_at(pos).is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|t| t.is_empty())
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|t| !t.is_empty()).count()
    }

    /// All positions in scan order: column-major, then row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        (0..size).flat_map(move |column| (0..size).map(move |row| Position::new(column, row)))
    }

    /// Occupied positions in scan order
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |p| !self.is_free(*p))
    }

    /// Free positions in scan order
    pub fn free_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |p| self.is_free(*p))
    }

    /// Occurrences of a tile kind on the whole board
    pub fn occurrences_of(&self, tile: Tile) -> u32 {
        self.cells.iter().filter(|t| **t == tile).count() as u32
    }

    /// Every tile on the board, including `Empty` cells
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().copied()
    }

    /// Per-kind counts of one segment: a column for the vertical team, a row
    /// for the horizontal team
    pub fn occurrences_at_segment(&self, index: usize, team: Team) -> TileCounts {
        TileCounts::from_tiles((0..self.size).map(|i| match team {
            Team::Vertical => self.tile_at(Position::new(index, i)),
            Team::Horizontal => self.tile_at(Position::new(i, index)),
        }))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let line: Vec<String> = (0..self.size)
                .map(|column| self.tile_at(Position::new(column, row)).index().to_string())
                .collect();
            writeln!(f, "[{}]", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(6);
        assert!(board.is_empty());
        assert!(!board.is_full());
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.positions().count(), 36);
    }

    #[test]
    #[should_panic(expected = "outside board")]
    fn test_row_past_edge_does_not_alias_next_column() {
        let mut board = Board::new(6);
        board.place(Tile::Sun, Position::new(1, 1));
        board.tile_at(Position::new(0, 7));
    }

    #[test]
    fn test_place_and_query() {
        let mut board = Board::new(3);
        let pos = Position::new(2, 1);
        board.place(Tile::Star, pos);

        assert_eq!(board.tile_at(pos), Tile::Star);
        assert!(!board.is_free(pos));
        assert!(board.is_free(Position::new(1, 2)));
        assert_eq!(board.occurrences_of(Tile::Star), 1);
        assert!(!board.is_empty());
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new(2);
        for pos in board.positions().collect::<Vec<_>>() {
            board.place(Tile::Sun, pos);
        }
        assert!(board.is_full());
        assert_eq!(board.occurrences_of(Tile::Sun), 4);
    }

    #[test]
    fn test_scan_order_is_column_major() {
        let board = Board::new(2);
        let scan: Vec<_> = board.positions().collect();
        assert_eq!(
            scan,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_position_order_is_row_major() {
        assert!(Position::new(5, 0) < Position::new(0, 1));
        assert!(Position::new(0, 3) < Position::new(1, 3));
        assert_eq!(
            Position::new(2, 2).cmp(&Position::new(2, 2)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_segment_counts_follow_team_orientation() {
        let mut board = Board::new(3);
        board.place(Tile::Sun, Position::new(0, 0));
        board.place(Tile::Sun, Position::new(0, 2));
        board.place(Tile::Cross, Position::new(1, 0));

        let column = board.occurrences_at_segment(0, Team::Vertical);
        assert_eq!(column.get(Tile::Sun), 2);
        assert_eq!(column.get(Tile::Cross), 0);

        let row = board.occurrences_at_segment(0, Team::Horizontal);
        assert_eq!(row.get(Tile::Sun), 1);
        assert_eq!(row.get(Tile::Cross), 1);
    }

    #[test]
    fn test_team_for_seat() {
        assert_eq!(Team::for_seat(0), Team::Vertical);
        assert_eq!(Team::for_seat(1), Team::Horizontal);
        assert_eq!(Team::for_seat(2), Team::Vertical);
        assert_eq!(Team::for_seat(3), Team::Horizontal);
        assert_eq!(Team::Vertical.opponent(), Team::Horizontal);
    }

    #[test]
    fn test_columns_round_trip() {
        let mut board = Board::new(3);
        board.place(Tile::Square, Position::new(1, 2));
        let rebuilt = Board::from_columns(&board.columns()).unwrap();
        assert_eq!(rebuilt, board);
        assert!(Board::from_columns(&[vec![Tile::Empty], vec![]]).is_none());
    }
}
