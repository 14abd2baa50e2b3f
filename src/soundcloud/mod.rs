//! # SoundCloud Integration Module
//!
//! Everything that talks to SoundCloud lives here.
//!
//! ```text
//! CLI layer
//!     ↓
//! SoundCloudClient (lazy auth, token refresh, playlist/track operations)
//!     ↓                     ↘
//! Connection (bound token)   CredentialStore (persisted OAuth blob)
//!     ↓
//! SoundCloud API (reqwest::blocking)
//! ```
//!
//! ## Submodules
//!
//! - [`connection`] - the vendor connection: one HTTP client bound to one
//!   access token
//! - [`client`] - [`SoundCloudClient`], which owns the connection lifecycle:
//!   it loads credentials on first use, refreshes expired tokens, verifies
//!   them against `GET /me` and retries exactly once when SoundCloud refuses
//!   a token the local clock still considered valid
//! - [`playlists`] - reorder, rename and read playlists
//! - [`tracks`] - track lookup and downloads
//!
//! ## Capability interface
//!
//! [`SoundCloudApi`] exposes raw JSON calls. Both [`Connection`] and
//! [`SoundCloudClient`] implement it, so any endpoint without a dedicated
//! wrapper can still be reached through an authenticated client:
//!
//! ```ignore
//! use scplcli::soundcloud::SoundCloudApi;
//!
//! let likes = client.get("/me/likes/tracks", &[("limit", "10")])?;
//! ```

pub mod client;
pub mod connection;
pub mod playlists;
pub mod tracks;

pub use client::{AuthState, SoundCloudClient};
pub use connection::Connection;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Raw, authenticated access to SoundCloud API endpoints.
///
/// Paths are relative to the configured API base URL; absolute `http(s)://`
/// URLs are used verbatim.
pub trait SoundCloudApi {
    fn get(&mut self, path: &str, query: &[(&str, &str)]) -> Result<Value>;

    fn put(&mut self, path: &str, body: &Value) -> Result<Value>;

    fn post(&mut self, path: &str, body: &Value) -> Result<Value>;

    fn delete(&mut self, path: &str) -> Result<Value>;
}

/// Decodes a JSON payload returned by SoundCloud into a typed value.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Remote {
        status: None,
        message: format!("unexpected response shape: {e}"),
    })
}
