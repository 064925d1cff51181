use comfy_table::Table;
use walkdir::WalkDir;

use crate::cache::{style_dir, TRACKS_FILE};
use crate::config::PracticeConfig;
use crate::dance::DanceStyle;

/// One row per dance style: where its cache lives, how many audio files are
/// in it, and whether the metadata list is there.
pub fn cache_status_table(config: &PracticeConfig) -> Table {
    let root = config.root_path();
    let mut table = Table::new();
    table.set_header(vec!["dance", "playlist", "songs", "metadata"]);

    for style in DanceStyle::all() {
        let dir = style_dir(&root, style);
        let configured = if config.playlists.contains_key(&style) {
            "configured"
        } else {
            "-"
        };
        let songs = if dir.is_dir() {
            count_audio_files(&dir).to_string()
        } else {
            "no directory".to_string()
        };
        let metadata = if dir.join(TRACKS_FILE).is_file() {
            "yes"
        } else {
            "no"
        };
        table.add_row(vec![
            style.to_string(),
            configured.to_string(),
            songs,
            metadata.to_string(),
        ]);
    }
    table
}

fn count_audio_files(dir: &std::path::Path) -> usize {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map_or(false, |extension| extension == "mp3")
        })
        .count()
}
