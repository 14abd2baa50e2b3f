#![allow(dead_code)]

use chrono::{Duration, Utc};
use mockito::{Matcher, Mock, ServerGuard};
use rusqlite::{Connection, params};
use scplcli::{config::Settings, soundcloud::SoundCloudClient, store::SqliteCredentialStore};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const TOKEN_NAME: &str = "sc_token.json";
pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";

pub struct Fixture {
    pub server: ServerGuard,
    pub store: SqliteCredentialStore,
    _dir: TempDir,
}

impl Fixture {
    /// Mock server plus a store holding `record` under [`TOKEN_NAME`].
    pub fn new(record: Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteCredentialStore::new(dir.path().join("creds.sqlite"));
        store.init_schema().unwrap();

        let conn = Connection::open(store.path()).unwrap();
        conn.execute(
            "INSERT INTO creds (filename, content) VALUES (?1, ?2)",
            params![TOKEN_NAME, record.to_string()],
        )
        .unwrap();

        Self {
            server: mockito::Server::new(),
            store,
            _dir: dir,
        }
    }

    pub fn settings(&self) -> Settings {
        Settings::new(CLIENT_ID, CLIENT_SECRET)
            .with_api_url(self.server.url())
            .with_auth_url(self.server.url())
            .with_database(self.store.path())
            .with_token_name(TOKEN_NAME)
    }

    pub fn client(&self) -> SoundCloudClient {
        SoundCloudClient::new(self.settings(), self.store.clone()).unwrap()
    }

    // The helpers below return unregistered mocks; call `.create()` after
    // setting expectations.

    /// `GET /me` answering 200 for `token`.
    pub fn me_ok(&mut self, token: &str) -> Mock {
        self.server
            .mock("GET", "/me")
            .match_header("authorization", format!("OAuth {token}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1,"username":"crate-digger"}"#)
    }

    /// `GET /me` answering 401 for `token`.
    pub fn me_refused(&mut self, token: &str) -> Mock {
        self.server
            .mock("GET", "/me")
            .match_header("authorization", format!("OAuth {token}").as_str())
            .with_status(401)
            .with_body(r#"{"code":401,"message":"invalid token"}"#)
    }

    /// Successful refresh handing out `access_token`.
    pub fn token_ok(&mut self, access_token: &str, expires_in: i64) -> Mock {
        self.server
            .mock("POST", "/oauth/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_header("accept", Matcher::Regex("application/json".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("client_id".into(), CLIENT_ID.into()),
                Matcher::UrlEncoded("client_secret".into(), CLIENT_SECRET.into()),
                Matcher::UrlEncoded("refresh_token".into(), "refresh-1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": access_token,
                    "refresh_token": "refresh-2",
                    "expires_in": expires_in,
                    "scope": "*",
                    "token_type": "bearer"
                })
                .to_string(),
            )
    }

    /// Refresh rejected with `status`.
    pub fn token_rejected(&mut self, status: usize) -> Mock {
        self.server
            .mock("POST", "/oauth/token")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"invalid_grant"}"#)
    }
}

pub fn record(access_token: &str, expires_in_secs: i64) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": "refresh-1",
        "expires_in": 3600,
        "expiry": (Utc::now() + Duration::seconds(expires_in_secs)).to_rfc3339(),
        "scope": "*"
    })
}

pub fn valid_record(access_token: &str) -> Value {
    record(access_token, 3600)
}

pub fn expired_record(access_token: &str) -> Value {
    record(access_token, -60)
}
