use std::path::Path;

use crate::{error, info, soundcloud::SoundCloudClient, store::CredentialStore, success};

pub fn download_track<S: CredentialStore>(
    client: &mut SoundCloudClient<S>,
    track_id: u64,
    output: &Path,
) {
    info!("Download track {} to {}", track_id, output.display());

    match client.download_track(track_id, output) {
        Ok(path) => success!("Saved {}", path.display()),
        Err(e) => error!("Failed to download track {}. Err: {}", track_id, e),
    }
}
