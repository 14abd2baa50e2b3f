//! Configuration management for scplcli.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Environment variables always win over
//! the file because `dotenv` never overrides variables that are already set.

use std::{env, fs, path::PathBuf};

use secrecy::SecretString;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.soundcloud.com";
pub const DEFAULT_AUTH_URL: &str = "https://secure.soundcloud.com";
pub const DEFAULT_TOKEN_NAME: &str = "sc_token.json";

/// Loads environment variables from `scplcli/.env` in the local data directory.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error; the variables may just as well be exported by the shell.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/scplcli/.env`
/// - macOS: `~/Library/Application Support/scplcli/.env`
/// - Windows: `%LOCALAPPDATA%/scplcli/.env`
pub fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no .env file, using process environment");
            Ok(())
        }
        Err(e) => Err(Error::Config(format!(
            "cannot read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Runtime settings for the authenticated client.
///
/// Built once at startup and handed to [`crate::soundcloud::SoundCloudClient`];
/// nothing in the crate reads the environment after that.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Base URL of the resource API, without trailing slash.
    pub api_url: String,
    /// Base URL of the OAuth host, without trailing slash.
    pub auth_url: String,
    /// Logical token name the credential record is stored under.
    pub token_name: String,
    pub database: PathBuf,
}

impl Settings {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_name: DEFAULT_TOKEN_NAME.to_string(),
            database: data_dir().join("creds.sqlite"),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = trim_base(url.into());
        self
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = trim_base(url.into());
        self
    }

    pub fn with_token_name(mut self, name: impl Into<String>) -> Self {
        self.token_name = name.into();
        self
    }

    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = path.into();
        self
    }

    /// Reads the settings from the process environment.
    ///
    /// `SOUNDCLOUD_CLIENT_ID` and `SOUNDCLOUD_CLIENT_SECRET` are required;
    /// everything else falls back to the SoundCloud production hosts and the
    /// local data directory.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::new(
            required("SOUNDCLOUD_CLIENT_ID")?,
            required("SOUNDCLOUD_CLIENT_SECRET")?,
        );

        if let Some(url) = optional("SOUNDCLOUD_API_URL") {
            settings = settings.with_api_url(url);
        }
        if let Some(url) = optional("SOUNDCLOUD_AUTH_URL") {
            settings = settings.with_auth_url(url);
        }
        if let Some(name) = optional("SCPLCLI_TOKEN_NAME") {
            settings = settings.with_token_name(name);
        }
        if let Some(path) = optional("SCPLCLI_DATABASE") {
            settings = settings.with_database(path);
        }

        Ok(settings)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth/token", self.auth_url)
    }
}

/// Returns `<data_local_dir>/scplcli`, falling back to `./scplcli`.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("scplcli");
    path
}

fn required(key: &str) -> Result<String> {
    optional(key).ok_or_else(|| Error::Config(format!("{key} must be set")))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
