use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use rusqlite::{Connection, params};
use serde::Serialize;
use serde_json::Value;

use super::CredentialStore;
use crate::{
    error::{Error, Result},
    types::Credential,
};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS creds (
    filename TEXT NOT NULL UNIQUE,
    content  TEXT NOT NULL
)";

/// Credential store backed by a single SQLite file with a `creds` table.
///
/// Each call opens its own connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    path: PathBuf,
}

impl SqliteCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the `creds` table if it does not exist yet.
    pub fn init_schema(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Inserts a brand-new record. Fails if `name` is already taken.
    pub fn provision(&self, name: &str, record: &Credential) -> Result<()> {
        let content = encode(name, record)?;
        let conn = self.connect()?;
        match conn.execute(
            "INSERT INTO creds (filename, content) VALUES (?1, ?2)",
            params![name, content],
        ) {
            Ok(_) => {
                tracing::debug!(name, "credential record provisioned");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::Store(format!(
                    "credential record `{name}` already exists"
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lists every logical token name, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT filename FROM creds ORDER BY filename")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .map_err(|e| Error::Store(format!("open {}: {e}", self.path.display())))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Raw blob for `name`; exactly one row must match.
    fn content(&self, name: &str) -> Result<String> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT content FROM creds WHERE filename = ?1")?;
        let mut rows = stmt
            .query_map(params![name], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        match rows.len() {
            0 => Err(Error::not_found(name)),
            1 => Ok(rows.remove(0)),
            n => Err(Error::Store(format!(
                "{n} credential rows share the name `{name}`"
            ))),
        }
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn read_field(&self, name: &str, field: &str) -> Result<String> {
        let content = self.content(name)?;
        let blob: Value = serde_json::from_str(&content).map_err(|source| {
            Error::Deserialization {
                name: name.to_string(),
                source,
            }
        })?;

        match blob.get(field) {
            None | Some(Value::Null) => Err(Error::missing_field(name, field)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
        }
    }

    fn read_record(&self, name: &str) -> Result<Credential> {
        let content = self.content(name)?;
        serde_json::from_str(&content).map_err(|source| Error::Deserialization {
            name: name.to_string(),
            source,
        })
    }

    fn write_record(&self, name: &str, record: &Credential) -> Result<()> {
        let content = encode(name, record)?;
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE creds SET content = ?1 WHERE filename = ?2",
            params![content, name],
        )?;

        if updated != 1 {
            // dropping `tx` rolls the update back
            return Err(Error::Store(format!(
                "expected to update one credential row for `{name}`, matched {updated}"
            )));
        }

        tx.commit()?;
        tracing::debug!(name, "credential record updated");
        Ok(())
    }
}

fn encode<T: Serialize>(name: &str, record: &T) -> Result<String> {
    serde_json::to_string(record)
        .map_err(|e| Error::Store(format!("cannot encode credential record `{name}`: {e}")))
}
