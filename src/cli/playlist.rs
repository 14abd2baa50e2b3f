use tabled::Table;

use crate::{
    error, info,
    soundcloud::{SoundCloudClient, playlists::move_track},
    store::CredentialStore,
    success,
    types::TrackTableRow,
    warning,
};

pub fn show_playlist<S: CredentialStore>(client: &mut SoundCloudClient<S>, playlist_id: u64) {
    let playlist = match client.get_playlist(playlist_id) {
        Ok(p) => p,
        Err(e) => error!("Failed to fetch playlist {}. Err: {}", playlist_id, e),
    };

    info!(
        "{} ({} tracks)",
        playlist.title,
        playlist.track_count.unwrap_or(playlist.tracks.len() as u32)
    );

    if playlist.tracks.is_empty() {
        warning!("Playlist {} has no tracks.", playlist_id);
        return;
    }

    let rows: Vec<TrackTableRow> = playlist
        .tracks
        .into_iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            id: t.id,
            title: t.title.unwrap_or_default(),
            artist: t.user.map(|u| u.username).unwrap_or_default(),
            duration: super::format_duration(t.duration),
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub fn playlist_tracks<S: CredentialStore>(client: &mut SoundCloudClient<S>, playlist_id: u64) {
    match client.list_track_ids(playlist_id) {
        Ok(ids) => println!(
            "{}",
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",")
        ),
        Err(e) => error!("Failed to fetch tracks of playlist {}. Err: {}", playlist_id, e),
    }
}

pub fn reorder_playlist<S: CredentialStore>(
    client: &mut SoundCloudClient<S>,
    playlist_id: u64,
    track_ids: &[u64],
) {
    info!(
        "Replace track order of playlist {} with {} tracks",
        playlist_id,
        track_ids.len()
    );

    match client.update_playlist(playlist_id, track_ids) {
        Ok(p) => success!("Playlist {} updated.", p.title),
        Err(e) => error!("Failed to update playlist {}. Err: {}", playlist_id, e),
    }
}

/// Moves the track at 1-based position `from` to position `to`.
pub fn move_playlist_track<S: CredentialStore>(
    client: &mut SoundCloudClient<S>,
    playlist_id: u64,
    from: usize,
    to: usize,
) {
    let mut ids = match client.list_track_ids(playlist_id) {
        Ok(ids) => ids,
        Err(e) => error!("Failed to fetch tracks of playlist {}. Err: {}", playlist_id, e),
    };

    if from == 0 || to == 0 || !move_track(&mut ids, from - 1, to - 1) {
        error!(
            "Positions must be between 1 and {} (got {} -> {}).",
            ids.len(),
            from,
            to
        );
    }

    reorder_playlist(client, playlist_id, &ids);
}

pub fn rename_playlist<S: CredentialStore>(
    client: &mut SoundCloudClient<S>,
    playlist_id: u64,
    title: &str,
) {
    match client.update_playlist_title(playlist_id, title) {
        Ok(p) => success!("Playlist {} renamed to {}.", playlist_id, p.title),
        Err(e) => error!("Failed to rename playlist {}. Err: {}", playlist_id, e),
    }
}
