use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use error_stack::{IntoReport, Report, ResultExt};
use walkdir::WalkDir;

use crate::cache::{style_dir, CacheError, CacheResult};
use crate::dance::DanceStyle;

/// Ensures every requested style has its cache directory and reports whether
/// at least one audio file is already there. Only the extension is checked,
/// never the file content.
pub fn check_for_songs(
    root: &Path,
    dances: &[DanceStyle],
) -> CacheResult<BTreeMap<DanceStyle, bool>> {
    if dances.is_empty() {
        return Err(Report::new(CacheError::InvalidStyles));
    }

    let mut songs_present = BTreeMap::new();
    for style in dances {
        let dir = style_dir(root, *style);
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .into_report()
                .attach_printable(format!("Failed to create directory {}", dir.display()))
                .change_context(CacheError::Storage)?;
            songs_present.insert(*style, false);
        } else {
            songs_present.insert(*style, has_audio(&dir));
        }
    }
    Ok(songs_present)
}

/// True when the directory holds at least one `.mp3` at its top level.
pub fn has_audio(dir: &Path) -> bool {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map_or(false, |extension| extension == "mp3")
        })
}
