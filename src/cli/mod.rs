//! # CLI Module
//!
//! User-facing command implementations. Every function here prints its own
//! output with the crate's console macros and terminates the process through
//! [`crate::error!`] when an operation fails, so `main` only has to dispatch.
//!
//! ## Command Categories
//!
//! ### Playlists
//! - [`show_playlist`] - title and track table of a playlist
//! - [`playlist_tracks`] - bare track ids in playlist order
//! - [`reorder_playlist`] - replace the track order with an explicit list
//! - [`move_playlist_track`] - move one track to another position
//! - [`rename_playlist`] - change a playlist title
//!
//! ### Tracks
//! - [`download_track`] - save a downloadable track locally
//!
//! ### Authentication
//! - [`auth_status`] - stored credentials and their expiry
//! - [`auth_refresh`] - force a token refresh
//! - [`auth_verify`] - check the token against SoundCloud
//! - [`import_credentials`] - provision a credential record from a JSON file
//!
//! ## Usage Patterns
//!
//! ```bash
//! scplcli creds import --file sc_token.json   # one-time provisioning
//! scplcli playlist show 123456
//! scplcli playlist reorder 123456 3,1,2
//! scplcli playlist move 123456 --from 5 --to 1
//! scplcli track download 987654 --output ~/Music
//! ```

mod auth;
mod playlist;
mod track;

pub use auth::auth_refresh;
pub use auth::auth_status;
pub use auth::auth_verify;
pub use auth::import_credentials;
pub use playlist::move_playlist_track;
pub use playlist::playlist_tracks;
pub use playlist::rename_playlist;
pub use playlist::reorder_playlist;
pub use playlist::show_playlist;
pub use track::download_track;

/// Formats a millisecond duration as `m:ss`.
pub(crate) fn format_duration(millis: Option<u64>) -> String {
    match millis {
        Some(ms) => {
            let secs = ms / 1000;
            format!("{}:{:02}", secs / 60, secs % 60)
        }
        None => "-".to_string(),
    }
}
