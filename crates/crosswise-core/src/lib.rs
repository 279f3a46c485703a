//! Crosswise - a four-player tile-placement game engine
//!
//! This crate provides the rules engine and the deterministic AI, including:
//! - The tile vocabulary and the N x N board
//! - Segment scoring with the win-of-sixes sentinel
//! - The tile bag and its reconstruction from visible state
//! - The turn protocol for basic moves and the four wildcards
//! - Candidate generation and move selection for AI seats
//!
//! # Architecture
//!
//! The engine is presentation-agnostic. Every mutation returns the
//! [`GameEvent`]s it caused; a GUI, a terminal driver or a test consumes
//! them and submits fully specified [`Move`]s back.
//!
//! # Modules
//!
//! - [`tile`]: Tile kinds and their stable ordinals
//! - [`board`]: Positions, teams and the grid
//! - [`scoring`]: Point rules
//! - [`bag`]: The draw pile
//! - [`player`]: Hands and seats
//! - [`actions`]: Moves and events
//! - [`movegen`]: Candidate enumeration
//! - [`bot`]: Move selection
//! - [`game`]: Game state machine
//! - [`savegame`]: Save/load payload
//! - [`config`]: Session settings

pub mod actions;
pub mod bag;
pub mod board;
pub mod bot;
pub mod config;
pub mod game;
pub mod movegen;
pub mod player;
pub mod savegame;
pub mod scoring;
pub mod tile;

// Re-export commonly used types
pub use actions::{GameEvent, Move};
pub use bag::{TileBag, WildcardUsage, RECONSTRUCTION_SEED};
pub use board::{Board, PlayerId, Position, Team};
pub use bot::Bot;
pub use config::GameConfig;
pub use game::{Game, GameError, GamePhase, GameState};
pub use movegen::PossibleTurn;
pub use player::{Controller, Hand, Player, HAND_SIZE, SEAT_COUNT};
pub use savegame::{GameData, LoadError, PlayerData};
pub use scoring::{Score, HAZARD_POINTS};
pub use tile::{Tile, TileCounts};
