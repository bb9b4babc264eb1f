//! HTTP routes for the record store and the game authority.

use crate::error::ServerError;
use crate::state::AppState;
use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use gomoku_engine::{MoveReply, NewGame, RecordListing};
use tracing::{error, info, instrument};

/// Builds the router.
///
/// - `GET /items/` lists record identifiers.
/// - `GET /items/{item_id}` returns one record.
/// - `POST /play/new_game` creates a game.
/// - `POST /play/{game_id}/{move}` plays a move.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/", get(list_items))
        .route("/items/{item_id}", get(read_item))
        .route("/play/new_game", post(new_game))
        .route("/play/{game_id}/{mv}", post(play_move))
        .with_state(state)
}

#[instrument(skip(state))]
async fn list_items(State(state): State<AppState>) -> Result<Json<RecordListing>, ServerError> {
    let items = state.records.list().await?;
    Ok(Json(RecordListing { items }))
}

#[instrument(skip(state))]
async fn read_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.records.read(&item_id).await.map(Json)
}

#[instrument(skip(state))]
async fn new_game(State(state): State<AppState>) -> Result<Json<NewGame>, ServerError> {
    Ok(Json(state.games.create()?))
}

#[instrument(skip(state))]
async fn play_move(
    State(state): State<AppState>,
    Path((game_id, mv)): Path<(String, String)>,
) -> Result<Json<MoveReply>, ServerError> {
    let mv: usize = mv
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("'{}' is not a move index", mv)))?;

    let (reply, finished) = state.games.play(&game_id, mv)?;
    // The move stands even if its record cannot be saved.
    if let Some(record) = finished {
        match state.records.write(&record).await {
            Ok(id) => info!(%game_id, record = %id, "Finished game recorded"),
            Err(e) => error!(%game_id, error = %e, "Failed to save finished game"),
        }
    }
    Ok(Json(reply))
}
