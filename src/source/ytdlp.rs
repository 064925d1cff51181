use std::path::Path;
use std::process::Command;

use error_stack::{IntoReport, Report, ResultExt};
use serde::Deserialize;

use crate::source::{
    playlist_url, video_url, AudioDownloader, PlaylistSource, RawEntry, SourceError, SourceResult,
};

/// Shell-out implementation backed by the `yt-dlp` binary, which handles both
/// the playlist listing and the audio extraction.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistDump {
    #[serde(default)]
    entries: Vec<RawEntry>,
}

impl YtDlp {
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
        }
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses the output of `yt-dlp --flat-playlist --dump-single-json`.
pub fn parse_playlist_dump(raw: &[u8]) -> SourceResult<Vec<RawEntry>> {
    let dump: PlaylistDump = serde_json::from_slice(raw)
        .into_report()
        .attach_printable("yt-dlp returned unparsable playlist JSON")
        .change_context(SourceError)?;
    Ok(dump.entries)
}

impl PlaylistSource for YtDlp {
    fn playlist_entries(&self, playlist_id: &str) -> SourceResult<Vec<RawEntry>> {
        let output = Command::new(&self.binary)
            .args(["--flat-playlist", "--dump-single-json", "--quiet"])
            .arg(playlist_url(playlist_id))
            .output()
            .into_report()
            .attach_printable(format!("Failed to run {}", self.binary))
            .change_context(SourceError)?;
        if !output.status.success() {
            return Err(Report::new(SourceError).attach_printable(format!(
                "{} exited with {} while listing playlist {}",
                self.binary, output.status, playlist_id
            )));
        }
        parse_playlist_dump(&output.stdout)
    }
}

impl AudioDownloader for YtDlp {
    fn download_audio(&self, video_id: &str, dir: &Path) -> SourceResult<()> {
        // <video_id>.%(ext)s so the finished file is <video_id>.mp3, which is
        // how the selector finds it again.
        let output_template = dir.join(format!("{}.%(ext)s", video_id));
        let status = Command::new(&self.binary)
            .args(["--format", "bestaudio", "--extract-audio"])
            .args(["--audio-format", "mp3", "--audio-quality", "192K"])
            .args(["--quiet", "--no-warnings", "--output"])
            .arg(&output_template)
            .arg(video_url(video_id))
            .status()
            .into_report()
            .attach_printable(format!("Failed to run {}", self.binary))
            .change_context(SourceError)?;
        if !status.success() {
            return Err(Report::new(SourceError).attach_printable(format!(
                "{} exited with {} while downloading {}",
                self.binary,
                status,
                video_url(video_id)
            )));
        }
        Ok(())
    }
}
