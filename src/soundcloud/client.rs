use chrono::{DateTime, Duration, Utc};
use reqwest::{
    Method,
    blocking::Client,
    header::{ACCEPT, CONTENT_TYPE},
};
use secrecy::ExposeSecret;
use serde_json::Value;

use super::{Connection, SoundCloudApi};
use crate::{
    config::Settings,
    error::{Error, Result},
    store::{CredentialStore, SqliteCredentialStore},
    types::{Credential, User},
};

/// Where the client currently stands in its authentication lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing loaded from the store yet.
    Uninitialized,
    /// A connection with a believed-valid token is cached.
    Authenticated,
    /// The cached token expired or was refused; the next use refreshes it.
    Expired,
}

#[derive(Debug)]
struct ClientHandle {
    expiry_time: Option<DateTime<Utc>>,
    connection: Connection,
}

impl ClientHandle {
    /// A token expiring exactly at `now` already counts as expired.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_time.is_none_or(|expiry| now >= expiry)
    }
}

#[derive(Debug)]
enum ClientState {
    Uninitialized,
    Authenticated(ClientHandle),
    Expired,
}

/// Lazily authenticated SoundCloud client.
///
/// Credentials are read from the [`CredentialStore`] the first time the
/// client is used. Before every operation the cached token is checked
/// against its expiry and against SoundCloud itself (`GET /me`), so tokens
/// revoked server-side are caught even while they look valid locally.
///
/// All operations take `&mut self`; a client is meant to be owned by a
/// single caller.
pub struct SoundCloudClient<S = SqliteCredentialStore> {
    settings: Settings,
    store: S,
    http: Client,
    state: ClientState,
}

impl<S: CredentialStore> SoundCloudClient<S> {
    pub fn new(settings: Settings, store: S) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            settings,
            store,
            http,
            state: ClientState::Uninitialized,
        })
    }

    pub fn state(&self) -> AuthState {
        match self.state {
            ClientState::Uninitialized => AuthState::Uninitialized,
            ClientState::Authenticated(_) => AuthState::Authenticated,
            ClientState::Expired => AuthState::Expired,
        }
    }

    /// Returns a connection whose token SoundCloud has just accepted.
    ///
    /// Store failures and rejected refreshes surface immediately. Only a
    /// failed verification call triggers the single forced refresh; if the
    /// token is refused again the error is returned as is.
    pub fn get_client(&mut self) -> Result<&Connection> {
        self.ensure_fresh()?;

        if let Err(err) = self.verify() {
            tracing::warn!(error = %err, "access token refused, forcing a refresh");
            self.state = ClientState::Expired;
            self.refresh_token()?;

            if let Err(err) = self.verify() {
                tracing::error!(error = %err, "refreshed access token refused as well");
                self.state = ClientState::Expired;
                return Err(err);
            }
        }

        self.connection()
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// The token endpoint's payload is persisted as the new credential record
    /// with an absolute `expiry` added. Returns the new access token.
    pub fn refresh_token(&mut self) -> Result<String> {
        let name = self.settings.token_name.clone();
        let refresh_token = self.store.read_field(&name, "refresh_token")?;
        tracing::debug!(name = %name, "refreshing SoundCloud access token");

        let requested_at = Utc::now();
        let response = self
            .http
            .post(self.settings.token_endpoint())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json; charset=utf-8")
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.expose_secret()),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .map_err(|e| Error::Auth {
                status: e.status().map(|s| s.as_u16()),
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| Error::Auth {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let has_token = payload
            .get("access_token")
            .and_then(Value::as_str)
            .is_some_and(|token| !token.is_empty());
        if !status.is_success() || !has_token {
            tracing::error!(status = status.as_u16(), body = %body, "token refresh rejected");
            return Err(Error::Auth {
                status: Some(status.as_u16()),
                body,
            });
        }

        let mut record: Credential = serde_json::from_value(payload).map_err(|e| Error::Auth {
            status: Some(status.as_u16()),
            body: format!("unexpected token payload: {e}"),
        })?;
        let expires_in = record.expires_in.unwrap_or(0);
        let expiry = Duration::try_seconds(expires_in)
            .and_then(|ttl| requested_at.checked_add_signed(ttl))
            .ok_or_else(|| Error::Auth {
                status: Some(status.as_u16()),
                body: format!("expires_in out of range: {expires_in}"),
            })?;
        record.expiry = Some(expiry);
        if record.refresh_token.is_none() {
            record.refresh_token = Some(refresh_token);
        }

        self.store.write_record(&name, &record)?;

        let access_token = record.access_token.unwrap_or_default();
        self.state = ClientState::Authenticated(self.handle(&access_token, Some(expiry)));
        tracing::debug!(name = %name, expiry = %expiry, "SoundCloud token refreshed");
        Ok(access_token)
    }

    /// Loads the stored credential on first use and refreshes when the
    /// cached token is missing, untrusted or past its expiry.
    fn ensure_fresh(&mut self) -> Result<()> {
        if let ClientState::Uninitialized = self.state {
            let credential = self.store.read_record(&self.settings.token_name)?;
            self.state = match (&credential.access_token, credential.expiry) {
                (Some(token), Some(expiry)) => {
                    tracing::debug!(expiry = %expiry, "loaded stored SoundCloud credentials");
                    ClientState::Authenticated(self.handle(token, Some(expiry)))
                }
                (Some(_), None) => {
                    tracing::warn!("stored access token has no expiry, not trusting it");
                    ClientState::Expired
                }
                _ => ClientState::Expired,
            };
        }

        let expired = match &self.state {
            ClientState::Authenticated(handle) => handle.is_expired(Utc::now()),
            _ => true,
        };
        if expired {
            tracing::debug!("access token expired, refreshing it");
            self.state = ClientState::Expired;
            self.refresh_token()?;
        }

        Ok(())
    }

    fn verify(&self) -> Result<User> {
        let user = self.connection()?.me()?;
        tracing::debug!(user = %user.username, "SoundCloud token verified");
        Ok(user)
    }

    fn connection(&self) -> Result<&Connection> {
        match &self.state {
            ClientState::Authenticated(handle) => Ok(&handle.connection),
            _ => Err(Error::Auth {
                status: None,
                body: "no authenticated SoundCloud connection".to_string(),
            }),
        }
    }

    fn handle(&self, access_token: &str, expiry_time: Option<DateTime<Utc>>) -> ClientHandle {
        ClientHandle {
            expiry_time,
            connection: Connection::new(
                self.http.clone(),
                self.settings.api_url.clone(),
                access_token,
            ),
        }
    }

    /// Runs `call` on a verified connection. A 401 drops the cached handle so
    /// the next use starts with a refresh.
    pub(crate) fn with_connection<T>(
        &mut self,
        call: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let result = call(self.get_client()?);
        if let Err(err) = &result {
            if err.is_unauthorized() {
                tracing::warn!(error = %err, "SoundCloud refused the token mid-session");
                self.state = ClientState::Expired;
            }
        }
        result
    }
}

impl<S: CredentialStore> SoundCloudApi for SoundCloudClient<S> {
    fn get(&mut self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.with_connection(|conn| conn.request(Method::GET, path, query, None))
    }

    fn put(&mut self, path: &str, body: &Value) -> Result<Value> {
        self.with_connection(|conn| conn.request(Method::PUT, path, &[], Some(body)))
    }

    fn post(&mut self, path: &str, body: &Value) -> Result<Value> {
        self.with_connection(|conn| conn.request(Method::POST, path, &[], Some(body)))
    }

    fn delete(&mut self, path: &str) -> Result<Value> {
        self.with_connection(|conn| conn.request(Method::DELETE, path, &[], None))
    }
}
