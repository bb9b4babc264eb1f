//! Gomoku viewer - unified CLI
//!
//! Replays recorded games, plays live ones, and can run the server both
//! depend on.

#![warn(missing_docs)]

mod cli;
mod input;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use gomoku_client::{RestClient, ViewerConfig};
use gomoku_engine::{
    Dimensions, EngineError, EngineMode, GameRecord, MoveOutcome, RecordId, RecordStore, TurnEngine,
};
use gomoku_server::ServerConfig;
use input::{PlayCommand, StepCommand};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(matches!(cli.command, Command::Serve { .. }));

    match cli.command {
        Command::Serve {
            host,
            port,
            records_dir,
            width,
            height,
            n_in_row,
        } => {
            let dims = Dimensions::new(width, height).context("Invalid board size")?;
            let config = ServerConfig::new(host, port, records_dir, dims, n_in_row);
            gomoku_server::serve(config).await.context("Server failed")
        }
        Command::List { limit } => {
            let client = connect(&load_config(&cli.config, cli.server_url)?)?;
            run_list(&client, limit).await
        }
        Command::Replay { id, turn, step } => {
            let client = connect(&load_config(&cli.config, cli.server_url)?)?;
            run_replay(client, id, turn, step).await
        }
        Command::Play => {
            let config = load_config(&cli.config, cli.server_url)?;
            run_play(connect(&config)?, &config).await
        }
    }
}

/// Loads the viewer config; `--server-url` wins over file and environment.
fn load_config(path: &Path, server_url: Option<String>) -> Result<ViewerConfig> {
    let mut config = ViewerConfig::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if let Some(url) = server_url {
        config.set_server_url(url);
    }
    Ok(config)
}

fn connect(config: &ViewerConfig) -> Result<RestClient> {
    info!(server_url = %config.server_url(), "Using server");
    RestClient::new(config).context("Failed to build HTTP client")
}

/// Logs to stderr. The server logs at info by default; the interactive
/// commands stay quiet unless `RUST_LOG` asks otherwise.
fn initialize_tracing(server: bool) {
    let default = if server {
        "info,gomoku_server=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the newest `limit` records, oldest first, with their dates.
#[instrument(skip(client))]
async fn run_list(client: &RestClient, limit: usize) -> Result<()> {
    let ids = client.list_records().await.context("Failed to list records")?;
    println!("Number of games: {}", ids.len());
    for id in ids.iter().skip(ids.len().saturating_sub(limit)) {
        println!("{:<24} {}", id, describe_date(id));
    }
    Ok(())
}

/// Fetches a record (newest when `id` is omitted) and shows it.
#[instrument(skip(client))]
async fn run_replay(client: RestClient, id: Option<String>, turn: Option<usize>, step: bool) -> Result<()> {
    let id = match id {
        Some(id) => RecordId::from(id),
        None => client
            .list_records()
            .await
            .context("Failed to list records")?
            .pop()
            .context("No records on the server")?,
    };
    let record = client
        .fetch_record(&id)
        .await
        .with_context(|| format!("Failed to fetch record {}", id))?;
    print_header(&id, &record);

    let mut engine = TurnEngine::new(client);
    engine
        .load_record(record)
        .with_context(|| format!("Record {} is corrupt", id))?;
    engine.jump_to(turn.unwrap_or(usize::MAX))?;
    print_position(&engine);

    if step {
        step_through(&mut engine).await?;
    }
    Ok(())
}

/// Interactive replay loop over stdin.
async fn step_through(engine: &mut TurnEngine<RestClient>) -> Result<()> {
    println!("[enter]/n next, p prev, <number> jump, q quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let moved = match StepCommand::parse(&line) {
            Some(StepCommand::Next) => engine.next()?,
            Some(StepCommand::Prev) => engine.prev()?,
            Some(StepCommand::Jump(turn)) => {
                let before = engine.turn();
                engine.jump_to(turn)? != before
            }
            Some(StepCommand::Quit) => break,
            None => {
                println!("Unrecognised command: {}", line.trim());
                continue;
            }
        };
        if moved {
            print_position(engine);
        } else {
            println!("Turn {}/{} (no change)", engine.turn(), engine.total_turns());
        }
    }
    Ok(())
}

/// Plays a live game, reading `x y` lines from stdin.
#[instrument(skip(client, config))]
async fn run_play(client: RestClient, config: &ViewerConfig) -> Result<()> {
    let dims = config.dimensions()?;
    let mut engine = TurnEngine::new(client).with_move_timeout(config.timeout());
    let game_id = engine
        .start_live(dims, *config.win_length())
        .await
        .context("Could not start a game")?;
    info!(%game_id, "Live game started");

    if let EngineMode::Live(session) = engine.controller() {
        println!(
            "Game {} on a {} board, {} in a row wins.",
            game_id,
            session.board().dimensions(),
            session.win_length()
        );
    }
    println!("Enter moves as 'x y' (column row, from 0), q to quit.");
    print_position(&engine);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (x, y) = match PlayCommand::parse(&line) {
            Some(PlayCommand::Place(x, y)) => (x, y),
            Some(PlayCommand::Quit) => break,
            None => {
                println!("Expected 'x y', got: {}", line.trim());
                continue;
            }
        };

        match engine.play(x, y).await {
            Ok(outcome) => {
                print_position(&engine);
                match outcome {
                    MoveOutcome::Continue => {}
                    MoveOutcome::Won { winner, .. } => {
                        println!("Game over: {} wins.", winner);
                        break;
                    }
                    MoveOutcome::Draw => {
                        println!("Game over: draw.");
                        break;
                    }
                }
            }
            Err(e @ (EngineError::MoveRejected(_) | EngineError::InvalidMove { .. })) => {
                println!("{}", e);
            }
            Err(e @ EngineError::Transport(_)) => {
                warn!(error = %e, "Move not delivered");
                println!("{} - the move was undone, try again.", e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn describe_date(id: &RecordId) -> String {
    id.recorded_at()
        .map(|at| at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn print_header(id: &RecordId, record: &GameRecord) {
    println!("Record {} {}", id, describe_date(id));
    println!(
        "{} moves, {} in a row, winner: {}",
        record.moves().len(),
        record.win_length(),
        record.winner()
    );
}

fn print_position(engine: &TurnEngine<RestClient>) {
    println!("Turn: {}/{}", engine.turn(), engine.total_turns());
    if let Some(board) = engine.board() {
        print!("{}", board);
    }
}
