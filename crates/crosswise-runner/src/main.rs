//! Crosswise self-play runner.
//!
//! Plays a game between four AI seats to completion, optionally resuming
//! from a save payload (`CROSSWISE_LOAD`) and writing the final state back
//! out (`CROSSWISE_SAVE`).

use anyhow::{bail, Context};
use crosswise_core::{Game, GameConfig, GameEvent, Player, Team, SEAT_COUNT};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound on AI steps; every real game ends long before
const MAX_STEPS: usize = 1_000;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GameConfig::from_env();
    info!(?config, "Starting Crosswise self-play");

    let mut game = match std::env::var("CROSSWISE_LOAD") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading save file {path}"))?;
            Game::from_json(&json, config.reload_seed)
                .with_context(|| format!("loading save file {path}"))?
        }
        Err(_) => {
            let players = (0..SEAT_COUNT)
                .map(|seat| Player::ai(format!("Bot {}", seat + 1)))
                .collect();
            Game::new(&config, players)
        }
    };

    let mut steps = 0;
    while !game.is_finished() {
        if steps == MAX_STEPS {
            bail!("game did not finish within {MAX_STEPS} steps");
        }
        for event in game.play_ai_turn()? {
            log_event(&event);
        }
        steps += 1;
    }

    println!("{}", game.board());
    info!(
        result = ?game.state(),
        vertical = %game.team_score(Team::Vertical),
        horizontal = %game.team_score(Team::Horizontal),
        steps,
        "Game finished"
    );

    if let Ok(path) = std::env::var("CROSSWISE_SAVE") {
        std::fs::write(&path, game.to_json()?)
            .with_context(|| format!("writing save file {path}"))?;
        info!(path = %path, "Saved final state");
    }

    Ok(())
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::TilePlaced { position, tile } => debug!(%position, %tile, "Tile placed"),
        GameEvent::WildcardActivated { player, wildcard } => {
            debug!(player, %wildcard, "Wildcard activated")
        }
        GameEvent::ScoresChanged {
            vertical,
            horizontal,
        } => debug!(%vertical, %horizontal, "Scores"),
        GameEvent::TurnChanged { player } => debug!(player, "Turn changed"),
        GameEvent::HandChanged { .. } | GameEvent::AiToPlay { .. } | GameEvent::GameEnded { .. } => {}
    }
}
