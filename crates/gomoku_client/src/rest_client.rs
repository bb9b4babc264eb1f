//! REST client for the record store and the game authority.

use crate::config::{ConfigError, ViewerConfig};
use gomoku_engine::{
    GameRecord, MoveReply, NewGame, RecordId, RecordListing, RecordStore, RemoteAuthority,
    RemoteError,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

/// HTTP client implementing both [`RecordStore`] and [`RemoteAuthority`].
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestClient {
    /// Creates a client for `config.server_url()` with the configured timeout.
    #[instrument(skip(config), fields(server_url = %config.server_url()))]
    pub fn new(config: &ViewerConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        info!("REST client ready");
        Ok(Self {
            base_url: config.server_url().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, %url, "Request failed");
            RemoteError::Transport(e.to_string())
        })?;
        Self::decode(response, &url).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");
        let response = self.client.post(&url).send().await.map_err(|e| {
            error!(error = %e, %url, "Request failed");
            RemoteError::Transport(e.to_string())
        })?;
        Self::decode(response, &url).await
    }

    /// Maps the status to a [`RemoteError`] kind and parses a success body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> Result<T, RemoteError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status));
            warn!(%status, %url, %detail, "Server refused request");
            return Err(match status {
                StatusCode::NOT_FOUND => RemoteError::NotFound(detail),
                s if s.is_client_error() => RemoteError::Rejected(detail),
                _ => RemoteError::Transport(detail),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, %url, body = %body, "Invalid JSON response");
            RemoteError::Transport(format!("Invalid JSON response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for RestClient {
    #[instrument(skip(self))]
    async fn list_records(&self) -> Result<Vec<RecordId>, RemoteError> {
        let listing: RecordListing = self.get_json("/items/").await?;
        debug!(count = listing.items.len(), "Listed records");
        Ok(listing.items)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn fetch_record(&self, id: &RecordId) -> Result<GameRecord, RemoteError> {
        self.get_json(&format!("/items/{}", id)).await
    }
}

#[async_trait::async_trait]
impl RemoteAuthority for RestClient {
    #[instrument(skip(self))]
    async fn create_game(&self) -> Result<NewGame, RemoteError> {
        let created: NewGame = self.post_json("/play/new_game").await?;
        info!(game_id = %created.game_id, "Game created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn submit_move(&self, game_id: &str, mv: usize) -> Result<MoveReply, RemoteError> {
        self.post_json(&format!("/play/{}/{}", game_id, mv)).await
    }
}
