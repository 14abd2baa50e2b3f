use super::{SoundCloudApi, SoundCloudClient, decode};
use crate::{
    error::{Error, Result},
    store::CredentialStore,
    types::{Playlist, PlaylistChanges, TrackRef, UpdatePlaylistRequest},
};

impl<S: CredentialStore> SoundCloudClient<S> {
    /// Replaces the playlist's tracks with `track_ids`, in exactly that order.
    ///
    /// Duplicates are sent as given and nothing checks that the tracks exist;
    /// SoundCloud is the judge of that. Returns the playlist as SoundCloud
    /// reports it after the update.
    pub fn update_playlist(&mut self, playlist_id: u64, track_ids: &[u64]) -> Result<Playlist> {
        let changes = PlaylistChanges {
            tracks: Some(track_ids.iter().map(|&id| TrackRef { id }).collect()),
            ..Default::default()
        };
        let playlist = self.put_playlist(playlist_id, changes)?;
        tracing::info!(playlist_id, tracks = track_ids.len(), "playlist tracks replaced");
        Ok(playlist)
    }

    pub fn update_playlist_title(&mut self, playlist_id: u64, title: &str) -> Result<Playlist> {
        let changes = PlaylistChanges {
            title: Some(title.to_string()),
            ..Default::default()
        };
        let playlist = self.put_playlist(playlist_id, changes)?;
        tracing::info!(playlist_id, title, "playlist renamed");
        Ok(playlist)
    }

    pub fn get_playlist(&mut self, playlist_id: u64) -> Result<Playlist> {
        let value = self.get(&format!("/playlists/{playlist_id}"), &[])?;
        decode(value)
    }

    /// Track ids of a playlist in playlist order.
    pub fn list_track_ids(&mut self, playlist_id: u64) -> Result<Vec<u64>> {
        let value = self.get(
            &format!("/playlists/{playlist_id}"),
            &[("representation", "id")],
        )?;
        let playlist: Playlist = decode(value)?;
        let ids: Vec<u64> = playlist.tracks.iter().map(|track| track.id).collect();
        tracing::debug!(playlist_id, ?ids, "fetched playlist track ids");
        Ok(ids)
    }

    fn put_playlist(&mut self, playlist_id: u64, changes: PlaylistChanges) -> Result<Playlist> {
        let body = serde_json::to_value(UpdatePlaylistRequest { playlist: changes })
            .map_err(|e| Error::Remote {
                status: None,
                message: format!("cannot encode playlist update: {e}"),
            })?;
        let value = self.put(&format!("/playlists/{playlist_id}"), &body)?;
        decode(value)
    }
}

/// Moves the track at `from` to position `to`, shifting the tracks between.
///
/// Both positions are zero-based; out-of-range positions leave the list as is
/// and return `false`.
pub fn move_track(track_ids: &mut Vec<u64>, from: usize, to: usize) -> bool {
    if from >= track_ids.len() || to >= track_ids.len() {
        return false;
    }
    let id = track_ids.remove(from);
    track_ids.insert(to, id);
    true
}
