//! Session configuration.

use crate::bag::RECONSTRUCTION_SEED;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Default edge length of the square board
pub const DEFAULT_BOARD_SIZE: usize = 6;

/// Settings for a game session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length of the board
    pub board_size: usize,
    /// Fixed shuffle for a fresh bag; `None` draws fresh entropy
    pub bag_seed: Option<u64>,
    /// Seed for rebuilding a bag from a save without one
    pub reload_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            bag_seed: None,
            reload_seed: RECONSTRUCTION_SEED,
        }
    }
}

impl GameConfig {
    /// Read `CROSSWISE_BOARD_SIZE` and `CROSSWISE_SEED`, falling back to
    /// defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let board_size = parse_var(&lookup, "CROSSWISE_BOARD_SIZE")
            .filter(|size: &usize| {
                if *size == 0 {
                    warn!("CROSSWISE_BOARD_SIZE must be positive, using default");
                }
                *size > 0
            })
            .unwrap_or(defaults.board_size);

        Self {
            board_size,
            bag_seed: parse_var(&lookup, "CROSSWISE_SEED"),
            ..defaults
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable setting");
            None
        }
    }
}
