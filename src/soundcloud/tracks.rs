use std::{
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};

use super::{SoundCloudApi, SoundCloudClient, decode};
use crate::{
    error::{Error, Result},
    store::CredentialStore,
    types::Track,
};

impl<S: CredentialStore> SoundCloudClient<S> {
    pub fn get_track(&mut self, track_id: u64) -> Result<Track> {
        let value = self.get(&format!("/tracks/{track_id}"), &[])?;
        decode(value)
    }

    /// Downloads the original file of a downloadable track into `dir`.
    ///
    /// The file is named after the track title. Returns the path written.
    pub fn download_track(&mut self, track_id: u64, dir: &Path) -> Result<PathBuf> {
        let track = self.get_track(track_id)?;
        if !track.downloadable.unwrap_or(false) {
            return Err(Error::Remote {
                status: None,
                message: format!("track {track_id} is not downloadable"),
            });
        }

        let source = track
            .download_url
            .clone()
            .unwrap_or_else(|| format!("/tracks/{track_id}/download"));
        let target = dir.join(file_name_for(&track));

        let mut response = self.with_connection(|conn| conn.open(&source))?;
        fs::create_dir_all(dir)?;

        let pb = match response.content_length() {
            Some(len) => ProgressBar::new(len).with_style(
                ProgressStyle::with_template("{bar:40.blue} {bytes}/{total_bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            ),
            None => ProgressBar::new_spinner(),
        };
        pb.set_message(target.display().to_string());

        let written = save(&mut response, &target, &pb);
        pb.finish_and_clear();

        let bytes = written?;
        tracing::info!(track_id, bytes, path = %target.display(), "track downloaded");
        Ok(target)
    }
}

/// Streams `reader` into `target`. A partly written file is removed again.
fn save(reader: &mut impl Read, target: &Path, pb: &ProgressBar) -> io::Result<u64> {
    let mut writer = pb.wrap_write(BufWriter::new(File::create(target)?));
    let written = io::copy(reader, &mut writer).and_then(|bytes| {
        writer.flush()?;
        Ok(bytes)
    });
    drop(writer);

    if let Err(err) = &written {
        tracing::warn!(
            error = %err,
            path = %target.display(),
            "download failed, removing partial file"
        );
        if let Err(e) = fs::remove_file(target) {
            tracing::warn!(error = %e, path = %target.display(), "cannot remove partial file");
        }
    }
    written
}

/// `<title>.<format>`, with characters that are unsafe in file names replaced.
pub fn file_name_for(track: &Track) -> String {
    let stem = track
        .title
        .as_deref()
        .map(sanitize_file_name)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| track.id.to_string());
    let ext = track
        .original_format
        .as_deref()
        .filter(|f| !f.is_empty() && *f != "raw")
        .unwrap_or("mp3");
    format!("{stem}.{ext}")
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .trim_matches('.')
        .to_string()
}
