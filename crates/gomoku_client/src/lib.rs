//! HTTP collaborators for the gomoku turn engine.
//!
//! [`RestClient`] talks to the record store and game authority endpoints;
//! [`ViewerConfig`] carries the server URL, timeout and live board size.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod rest_client;

pub use config::{ConfigError, SERVER_URL_ENV, TIMEOUT_ENV, ViewerConfig};
pub use rest_client::RestClient;
