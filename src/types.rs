use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// Stored OAuth credential blob.
///
/// Unknown vendor fields (`scope`, `token_type`, ...) are kept in `extra` so
/// a read-modify-write never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    /// Returns the access token only when it can be trusted at `now`: both
    /// token and expiry must be present and the expiry strictly in the future.
    pub fn usable_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.access_token, self.expiry) {
            (Some(token), Some(expiry)) if now < expiry => Some(token.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub permalink_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Duration in milliseconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub downloadable: Option<bool>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub original_format: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub track_count: Option<u32>,
    #[serde(default)]
    pub sharing: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackRef {
    pub id: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlaylistChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<TrackRef>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePlaylistRequest {
    pub playlist: PlaylistChanges,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub position: usize,
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub duration: String,
}

#[derive(Tabled)]
pub struct CredentialTableRow {
    pub name: String,
    pub access_token: String,
    pub expiry: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn vendor_fields_survive_round_trip() {
        let raw = r#"{
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3599,
            "expiry": "2025-03-01T10:00:00.123456+00:00",
            "scope": "*",
            "token_type": "bearer"
        }"#;
        let cred: Credential = serde_json::from_str(raw).unwrap();
        assert_eq!(cred.extra.get("scope"), Some(&Value::from("*")));

        let back = serde_json::to_value(&cred).unwrap();
        assert_eq!(back["token_type"], "bearer");
        assert_eq!(back["expires_in"], 3599);
    }

    #[test]
    fn token_without_expiry_is_not_trusted() {
        let now = Utc::now();
        let mut cred = Credential {
            access_token: Some("a".into()),
            ..Default::default()
        };
        assert_eq!(cred.usable_access_token(now), None);

        cred.expiry = Some(now);
        assert_eq!(cred.usable_access_token(now), None);

        cred.expiry = Some(now + Duration::seconds(1));
        assert_eq!(cred.usable_access_token(now), Some("a"));
    }

    #[test]
    fn playlist_update_body_only_carries_set_fields() {
        let body = UpdatePlaylistRequest {
            playlist: PlaylistChanges {
                tracks: Some(vec![TrackRef { id: 3 }, TrackRef { id: 1 }]),
                ..Default::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "playlist": { "tracks": [{ "id": 3 }, { "id": 1 }] } })
        );
    }
}
