mod common;

use common::{Fixture, valid_record};
use mockito::Matcher;
use scplcli::{
    Error,
    soundcloud::{AuthState, SoundCloudApi},
};
use serde_json::json;

const PLAYLIST: &str = r#"{
    "id": 7,
    "title": "Night Drive",
    "track_count": 3,
    "sharing": "private",
    "tracks": [
        {"id": 1, "title": "One", "duration": 61000, "user": {"id": 9, "username": "dj"}},
        {"id": 2, "title": "Two"},
        {"id": 3, "title": "Three"}
    ]
}"#;

fn authenticated() -> (Fixture, mockito::Mock) {
    let mut fx = Fixture::new(valid_record("good"));
    let me = fx.me_ok("good").create();
    (fx, me)
}

#[test]
fn test_update_playlist_sends_tracks_in_given_order() {
    let (mut fx, _me) = authenticated();
    let put = fx
        .server
        .mock("PUT", "/playlists/7")
        .match_header("authorization", "OAuth good")
        .match_body(Matcher::Json(json!({
            "playlist": { "tracks": [{ "id": 3 }, { "id": 1 }, { "id": 2 }] }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PLAYLIST)
        .expect(1)
        .create();

    let playlist = fx.client().update_playlist(7, &[3, 1, 2]).unwrap();
    assert_eq!(playlist.id, 7);
    put.assert();
}

#[test]
fn test_update_playlist_keeps_duplicates() {
    let (mut fx, _me) = authenticated();
    let put = fx
        .server
        .mock("PUT", "/playlists/7")
        .match_body(Matcher::Json(json!({
            "playlist": { "tracks": [{ "id": 5 }, { "id": 5 }, { "id": 1 }] }
        })))
        .with_status(200)
        .with_body(PLAYLIST)
        .expect(1)
        .create();

    fx.client().update_playlist(7, &[5, 5, 1]).unwrap();
    put.assert();
}

#[test]
fn test_update_playlist_title() {
    let (mut fx, _me) = authenticated();
    let put = fx
        .server
        .mock("PUT", "/playlists/7")
        .match_body(Matcher::Json(json!({ "playlist": { "title": "Morning Drive" } })))
        .with_status(200)
        .with_body(r#"{"id": 7, "title": "Morning Drive"}"#)
        .expect(1)
        .create();

    let playlist = fx.client().update_playlist_title(7, "Morning Drive").unwrap();
    assert_eq!(playlist.title, "Morning Drive");
    put.assert();
}

#[test]
fn test_get_playlist_decodes_tracks() {
    let (mut fx, _me) = authenticated();
    let _get = fx
        .server
        .mock("GET", "/playlists/7")
        .with_status(200)
        .with_body(PLAYLIST)
        .create();

    let playlist = fx.client().get_playlist(7).unwrap();
    assert_eq!(playlist.title, "Night Drive");
    assert_eq!(playlist.tracks.len(), 3);
    assert_eq!(
        playlist.tracks[0].user.as_ref().map(|u| u.username.as_str()),
        Some("dj")
    );
}

#[test]
fn test_list_track_ids_preserves_playlist_order() {
    let (mut fx, _me) = authenticated();
    let get = fx
        .server
        .mock("GET", "/playlists/7")
        .match_query(Matcher::UrlEncoded("representation".into(), "id".into()))
        .with_status(200)
        .with_body(r#"{"id": 7, "tracks": [{"id": 30}, {"id": 10}, {"id": 20}]}"#)
        .expect(1)
        .create();

    assert_eq!(fx.client().list_track_ids(7).unwrap(), vec![30, 10, 20]);
    get.assert();
}

#[test]
fn test_remote_failure_is_remote_error() {
    let (mut fx, _me) = authenticated();
    let _get = fx
        .server
        .mock("GET", "/playlists/404")
        .with_status(404)
        .with_body(r#"{"error":"not found"}"#)
        .create();

    let mut client = fx.client();
    match client.get_playlist(404) {
        Err(Error::Remote { status, message }) => {
            assert_eq!(status, Some(404));
            assert!(message.contains("not found"));
        }
        other => panic!("expected Remote error, got {other:?}"),
    }
    assert_eq!(client.state(), AuthState::Authenticated);
}

#[test]
fn test_unauthorized_call_forces_refresh_on_next_use() {
    let (mut fx, _me) = authenticated();
    let _me_fresh = fx.me_ok("fresh").create();
    let refresh = fx.token_ok("fresh", 3600).expect(1).create();
    let refused = fx
        .server
        .mock("GET", "/playlists/7")
        .match_header("authorization", "OAuth good")
        .with_status(401)
        .create();
    let accepted = fx
        .server
        .mock("GET", "/playlists/7")
        .match_header("authorization", "OAuth fresh")
        .with_status(200)
        .with_body(PLAYLIST)
        .expect(1)
        .create();

    let mut client = fx.client();
    let err = client.get_playlist(7).unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(client.state(), AuthState::Expired);

    assert_eq!(client.get_playlist(7).unwrap().id, 7);

    refused.assert();
    refresh.assert();
    accepted.assert();
}

#[test]
fn test_unwrapped_endpoints_are_forwarded() {
    let (mut fx, _me) = authenticated();
    let likes = fx
        .server
        .mock("GET", "/me/likes/tracks")
        .match_header("authorization", "OAuth good")
        .match_query(Matcher::UrlEncoded("limit".into(), "2".into()))
        .with_status(200)
        .with_body(r#"[{"id": 1}, {"id": 2}]"#)
        .expect(1)
        .create();
    let delete = fx
        .server
        .mock("DELETE", "/playlists/7")
        .with_status(204)
        .expect(1)
        .create();

    let mut client = fx.client();
    let value = client.get("/me/likes/tracks", &[("limit", "2")]).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(2));
    assert!(client.delete("/playlists/7").unwrap().is_null());

    likes.assert();
    delete.assert();
}

#[test]
fn test_download_track_writes_file() {
    let (mut fx, _me) = authenticated();
    let download_url = format!("{}/tracks/9/download", fx.server.url());
    let _meta = fx
        .server
        .mock("GET", "/tracks/9")
        .with_status(200)
        .with_body(
            json!({
                "id": 9,
                "title": "Demo: take 2",
                "downloadable": true,
                "download_url": download_url,
                "original_format": "wav"
            })
            .to_string(),
        )
        .create();
    let file = fx
        .server
        .mock("GET", "/tracks/9/download")
        .match_header("authorization", "OAuth good")
        .with_status(200)
        .with_body(b"RIFF....WAVE")
        .expect(1)
        .create();

    let out = tempfile::tempdir().unwrap();
    let path = fx.client().download_track(9, out.path()).unwrap();

    assert_eq!(path, out.path().join("Demo_ take 2.wav"));
    assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....WAVE");
    file.assert();
}

#[test]
fn test_download_refuses_non_downloadable_track() {
    let (mut fx, _me) = authenticated();
    let _meta = fx
        .server
        .mock("GET", "/tracks/9")
        .with_status(200)
        .with_body(r#"{"id": 9, "title": "Demo", "downloadable": false}"#)
        .create();
    let file = fx
        .server
        .mock("GET", "/tracks/9/download")
        .expect(0)
        .create();

    let out = tempfile::tempdir().unwrap();
    let err = fx.client().download_track(9, out.path()).unwrap_err();
    assert!(matches!(err, Error::Remote { status: None, .. }));
    file.assert();
}
