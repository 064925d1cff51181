use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use error_stack::{IntoReport, Report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dance::DanceStyle;

pub mod probe;
pub mod refresh;

pub const TRACKS_FILE: &str = "tracks.json";

#[derive(Debug)]
pub enum CacheError {
    InvalidStyles,
    PlaylistCountMismatch { playlists: usize, dances: usize },
    EmptyPlaylist(DanceStyle),
    Refresh(DanceStyle),
    Metadata,
    Storage,
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::InvalidStyles => f.write_str("At least one dance style is required"),
            CacheError::PlaylistCountMismatch { playlists, dances } => write!(
                f,
                "Expected {} playlist ids but got {}",
                dances, playlists
            ),
            CacheError::EmptyPlaylist(style) => {
                write!(f, "No usable tracks in the playlist for {}", style)
            }
            CacheError::Refresh(style) => write!(f, "Refreshing the {} cache failed", style),
            CacheError::Metadata => f.write_str("Track metadata error"),
            CacheError::Storage => f.write_str("Cache storage error"),
        }
    }
}

impl std::error::Error for CacheError {}

pub type CacheResult<T> = error_stack::Result<T, CacheError>;

/// One cached song: enough to find the audio file again (`videoId`) and to
/// filter by length without touching the file itself.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Track {
    pub title: String,
    pub index: usize,
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub duration: f64,
}

impl Track {
    /// Lenient conversion from a raw metadata entry. Entries missing the id
    /// or a numeric duration yield `None` instead of an error, so one
    /// hand-edited line never poisons the whole list.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let video_id = object.get("videoId")?.as_str()?.to_string();
        let duration = object.get("duration")?.as_f64()?;
        Some(Track {
            title: object
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            index: object
                .get("index")
                .and_then(Value::as_u64)
                .unwrap_or_default() as usize,
            video_id,
            duration,
        })
    }
}

/// The cache directory of one style, directly under the storage root.
pub fn style_dir(root: &Path, style: DanceStyle) -> PathBuf {
    root.join(style.to_string())
}

/// Rewrites a style's metadata wholesale. The list is never patched in place.
pub fn write_track_list(dir: &Path, tracks: &[Track]) -> CacheResult<()> {
    let serialized = serde_json::to_string_pretty(tracks)
        .into_report()
        .change_context(CacheError::Storage)?;
    fs::write(dir.join(TRACKS_FILE), serialized)
        .into_report()
        .attach_printable(format!("Failed to write {} in {}", TRACKS_FILE, dir.display()))
        .change_context(CacheError::Storage)?;
    Ok(())
}

/// Reads a style's metadata as raw JSON values. The file must hold a list of
/// objects; what each object must contain is the reader's business.
pub fn read_track_list(dir: &Path) -> CacheResult<Vec<Value>> {
    let json_path = dir.join(TRACKS_FILE);
    if !json_path.is_file() {
        return Err(Report::new(CacheError::Metadata)
            .attach_printable(format!("File not found: {}", json_path.display())));
    }
    let content = fs::read_to_string(&json_path)
        .into_report()
        .attach_printable(format!("Failed to read {}", json_path.display()))
        .change_context(CacheError::Metadata)?;
    let parsed: Value = serde_json::from_str(&content)
        .into_report()
        .attach_printable(format!("Invalid JSON in {}", json_path.display()))
        .change_context(CacheError::Metadata)?;
    let tracks = parsed
        .as_array()
        .ok_or(CacheError::Metadata)
        .into_report()
        .attach_printable("Expected a list of track objects")?;
    if !tracks.iter().all(Value::is_object) {
        return Err(Report::new(CacheError::Metadata)
            .attach_printable("Expected every list entry to be a track object"));
    }
    Ok(tracks.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn track_conversion_skips_malformed_entries() {
        assert!(Track::from_value(&json!({"videoId": "a", "duration": 100})).is_some());
        assert!(Track::from_value(&json!({"videoId": "a", "duration": "1:40"})).is_none());
        assert!(Track::from_value(&json!({"duration": 100})).is_none());
        assert!(Track::from_value(&json!("not an object")).is_none());
    }

    #[test]
    fn track_conversion_tolerates_missing_optional_fields() {
        let track = Track::from_value(&json!({"videoId": "a", "duration": 100})).unwrap();
        assert_eq!(track.title, "");
        assert_eq!(track.index, 0);
        assert_eq!(track.video_id, "a");
    }

    #[test]
    fn metadata_written_on_refresh_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let tracks = vec![Track {
            title: "Blue Danube".to_string(),
            index: 3,
            video_id: "abc".to_string(),
            duration: 101.0,
        }];
        write_track_list(dir.path(), &tracks).unwrap();

        let values = read_track_list(dir.path()).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(Track::from_value(&values[0]).unwrap(), tracks[0]);
    }

    #[test]
    fn missing_metadata_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_track_list(dir.path()).is_err());
    }

    #[test]
    fn non_list_metadata_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TRACKS_FILE), r#"{"videoId": "a"}"#).unwrap();
        assert!(read_track_list(dir.path()).is_err());
    }
}
