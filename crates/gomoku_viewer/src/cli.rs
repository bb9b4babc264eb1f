//! Command-line interface for gomoku_viewer.

use clap::{Parser, Subcommand};

/// Gomoku viewer - replay recorded games or play live against the server
#[derive(Parser, Debug)]
#[command(name = "gomoku_viewer")]
#[command(about = "Replay recorded n-in-a-row games or play one live", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the viewer config file
    #[arg(long, global = true, default_value = "gomoku_viewer.toml")]
    pub config: std::path::PathBuf,

    /// Server URL (overrides config file and GOMOKU_SERVER_URL)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the record store and game authority over HTTP
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Directory of game records
        #[arg(long, default_value = "games")]
        records_dir: std::path::PathBuf,

        /// Board width for new games
        #[arg(long, default_value = "15")]
        width: usize,

        /// Board height for new games
        #[arg(long, default_value = "15")]
        height: usize,

        /// Marks in a row needed to win
        #[arg(long, default_value = "5")]
        n_in_row: usize,
    },

    /// List recorded games
    List {
        /// How many of the newest records to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Replay a recorded game
    Replay {
        /// Record identifier (newest when omitted)
        id: Option<String>,

        /// Turn to show (final position when omitted)
        #[arg(long)]
        turn: Option<usize>,

        /// Step through the game interactively
        #[arg(long)]
        step: bool,
    },

    /// Play a live game against the server, on the server's board
    Play,
}
