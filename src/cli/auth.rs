use std::{fs, path::Path};

use chrono::Utc;
use tabled::Table;

use crate::{
    error, info,
    soundcloud::SoundCloudClient,
    store::{CredentialStore, SqliteCredentialStore},
    success,
    types::{Credential, CredentialTableRow},
    warning,
};

/// Lists every stored credential with its expiry. Tokens are masked.
pub fn auth_status(store: &SqliteCredentialStore) {
    let names = match store.names() {
        Ok(names) => names,
        Err(e) => error!("Cannot read credential store. Err: {}", e),
    };

    if names.is_empty() {
        warning!(
            "No credentials stored in {}. Run scplcli creds import.",
            store.path().display()
        );
        return;
    }

    let now = Utc::now();
    let rows: Vec<CredentialTableRow> = names
        .into_iter()
        .map(|name| match store.read_record(&name) {
            Ok(cred) => CredentialTableRow {
                access_token: mask(cred.access_token.as_deref()),
                expiry: cred
                    .expiry
                    .map(|e| e.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string()),
                status: if cred.usable_access_token(now).is_some() {
                    "valid".to_string()
                } else {
                    "needs refresh".to_string()
                },
                name,
            },
            Err(e) => CredentialTableRow {
                name,
                access_token: "-".to_string(),
                expiry: "-".to_string(),
                status: e.to_string(),
            },
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn auth_refresh<S: CredentialStore>(client: &mut SoundCloudClient<S>) {
    match client.refresh_token() {
        Ok(token) => success!("Token refreshed ({}).", mask(Some(&token))),
        Err(e) => error!("Token refresh failed. Err: {}", e),
    }
}

pub fn auth_verify<S: CredentialStore>(client: &mut SoundCloudClient<S>) {
    let user = match client.get_client().and_then(|conn| conn.me()) {
        Ok(user) => user,
        Err(e) => error!("Cannot authenticate with SoundCloud. Err: {}", e),
    };
    success!("Authenticated as {} ({}).", user.username, user.id);
}

/// Provisions a credential record from a JSON file holding at least a
/// `refresh_token`.
pub fn import_credentials(store: &SqliteCredentialStore, name: &str, file: &Path) {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => error!("Cannot read {}. Err: {}", file.display(), e),
    };

    let credential: Credential = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => error!("{} is not a valid credential file. Err: {}", file.display(), e),
    };

    if credential.refresh_token.is_none() {
        error!("{} has no refresh_token; it could never be refreshed.", file.display());
    }

    if let Err(e) = store.init_schema() {
        error!("Cannot prepare credential store. Err: {}", e);
    }

    info!("Import {} as {}", file.display(), name);
    match store.provision(name, &credential) {
        Ok(()) => success!("Credential {} stored in {}.", name, store.path().display()),
        Err(e) => error!("Cannot store credential {}. Err: {}", name, e),
    }
}

fn mask(token: Option<&str>) -> String {
    match token {
        Some(t) if t.len() > 8 => format!("{}…", t.chars().take(4).collect::<String>()),
        Some(_) => "****".to_string(),
        None => "-".to_string(),
    }
}
