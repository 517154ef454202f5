//! Gambit - play chess against a UCI engine from the terminal.
//!
//! ```text
//! main() -> GambitConfig::load() -> EngineSession::connect()
//!        -> GameCoordinator::start() -> Play::run()
//! ```
//!
//! `gambit history` prints the result log and exits.

mod commands;
mod play;
mod render;

use anyhow::{Context, Result, bail};
use std::{
    env,
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gambit_config::GambitConfig;
use gambit_core::{GameCoordinator, ResultLog};
use gambit_uci::EngineSession;

use crate::play::Play;

const USAGE: &str = "\
Usage: gambit [history]

  (no argument)  play a game against the configured engine
  history        list finished games

Configuration: ~/.gambit/config.toml (GAMBIT_ENGINE and GAMBIT_DEPTH override it)";

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (log_file, init_warnings) = open_gambit_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than interleave logs with the board.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_gambit_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in gambit_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn gambit_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.gambit/logs/gambit.log
    if let Some(dir) = gambit_config::gambit_dir() {
        candidates.push(dir.join("logs").join("gambit.log"));
    }

    // Fallback: ./.gambit/logs/gambit.log
    candidates.push(PathBuf::from(".gambit").join("logs").join("gambit.log"));

    candidates
}

fn load_config() -> GambitConfig {
    let config = match GambitConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("{e}; using defaults");
            GambitConfig::default()
        }
    };
    config.with_env_overrides()
}

fn print_history(results: Option<&ResultLog>) -> Result<()> {
    let Some(log) = results else {
        bail!("cannot locate the result log: no home directory");
    };
    let entries = log
        .entries()
        .with_context(|| format!("reading {}", log.path().display()))?;
    print!("{}", render::results(&entries));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let results = config.results_log_path().map(ResultLog::new);

    match env::args().nth(1).as_deref() {
        None => {}
        Some("history") => return print_history(results.as_ref()),
        Some("-h" | "--help" | "help") => {
            println!("{USAGE}");
            return Ok(());
        }
        Some(other) => bail!("unknown argument `{other}`\n\n{USAGE}"),
    }

    let engine = config.engine_config();
    println!(
        "Starting {} (skill level {}, depth {})...",
        engine.command(),
        config.skill_level(),
        config.depth()
    );
    let session = EngineSession::connect(&engine)
        .await
        .context("starting the chess engine")?;
    let game = GameCoordinator::start(session, config.game_settings()).await;

    Play::new(game, &engine, results.as_ref()).run().await
}
