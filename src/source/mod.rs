use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod ytdlp;

#[derive(Debug)]
pub struct SourceError;

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Music source error")
    }
}

impl std::error::Error for SourceError {}

pub type SourceResult<T> = error_stack::Result<T, SourceError>;

/// One playlist entry as the external service reports it. Fields are optional
/// on purpose: the cache refresher decides what is usable.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RawEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub duration: Option<f64>,
}

/// Lists the current tracks of a remote playlist.
pub trait PlaylistSource {
    fn playlist_entries(&self, playlist_id: &str) -> SourceResult<Vec<RawEntry>>;
}

/// Fetches one track's audio into a directory as `<video_id>.mp3`.
pub trait AudioDownloader {
    fn download_audio(&self, video_id: &str, dir: &Path) -> SourceResult<()>;
}

pub fn video_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://music.youtube.com/playlist?list={}", playlist_id)
}
