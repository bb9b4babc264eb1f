//! Reference server for recorded and live n-in-a-row games.
//!
//! Serves a directory of game records and acts as the authority for live
//! games: it assigns game ids, checks moves, detects wins, and saves each
//! finished game back into the record directory.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod records;
mod routes;
mod rules;
mod state;

pub use error::ServerError;
pub use records::RecordDir;
pub use routes::router;
pub use rules::{LiveBoard, RuleViolation};
pub use state::{AppState, GameRegistry};

use axum::body::Body;
use axum::http::Request;
use derive_getters::Getters;
use gomoku_engine::Dimensions;
use std::path::PathBuf;
use tower::ServiceBuilder;
use tracing::{info, instrument};

/// Server settings.
#[derive(Debug, Clone, Getters, derive_new::new)]
pub struct ServerConfig {
    /// Host to bind to.
    host: String,
    /// Port to bind to.
    port: u16,
    /// Directory of record files.
    records_dir: PathBuf,
    /// Board size for new games.
    dims: Dimensions,
    /// Marks in a row needed to win.
    win_length: usize,
}

/// Builds the application with request logging.
pub fn app(config: &ServerConfig) -> axum::Router {
    let state = AppState {
        records: RecordDir::new(config.records_dir.clone()),
        games: GameRegistry::new(config.dims, config.win_length),
    };
    router(state).layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
        info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
        req
    }))
}

/// Binds and serves until the process exits.
#[instrument(skip(config), fields(host = %config.host, port = config.port))]
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&config.records_dir).await?;
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(
        addr = %listener.local_addr()?,
        records = %config.records_dir.display(),
        "Server ready"
    );
    axum::serve(listener, app(&config)).await
}
