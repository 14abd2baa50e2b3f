//! Error taxonomy shared by the credential store, the authenticated client
//! and the CLI.
//!
//! Storage-specific errors (`rusqlite`) and transport errors (`reqwest`)
//! are flattened into the variants below so callers never have to match on
//! a backend's own error type.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No credential record (or no such field in it) for a logical token name.
    #[error("{}", not_found_message(.name, .field))]
    NotFound { name: String, field: Option<String> },

    /// The stored credential blob could not be decoded.
    #[error("malformed credential record `{name}`: {source}")]
    Deserialization {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Connectivity or integrity failure at the storage boundary.
    #[error("credential store error: {0}")]
    Store(String),

    /// The OAuth endpoint rejected a token refresh.
    #[error("token refresh rejected (status {}): {body}", status_text(.status))]
    Auth { status: Option<u16>, body: String },

    /// Any other failure talking to the SoundCloud API.
    #[error("SoundCloud API error (status {}): {message}", status_text(.status))]
    Remote {
        status: Option<u16>,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn not_found(name: &str) -> Self {
        Error::NotFound {
            name: name.to_string(),
            field: None,
        }
    }

    pub(crate) fn missing_field(name: &str, field: &str) -> Self {
        Error::NotFound {
            name: name.to_string(),
            field: Some(field.to_string()),
        }
    }

    /// True when the remote side answered 401, i.e. the token was refused.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Remote {
                status: Some(401),
                ..
            } | Error::Auth {
                status: Some(401),
                ..
            }
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Remote {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn not_found_message(name: &str, field: &Option<String>) -> String {
    match field {
        Some(field) => format!("field `{field}` missing from credential record `{name}`"),
        None => format!("no credential record named `{name}`"),
    }
}

fn status_text(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}
