use std::fs;
use std::path::Path;

use colored::Colorize;
use error_stack::{IntoReport, Report, ResultExt};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cache::{style_dir, write_track_list, CacheError, CacheResult, Track};
use crate::dance::DanceStyle;
use crate::source::{AudioDownloader, PlaylistSource, RawEntry};

/// Deletes every file in each style's directory, leaving the directories in
/// place. Failures on single files are logged and skipped, the sweep goes on.
pub fn clear_directories(root: &Path, dances: &[DanceStyle]) -> CacheResult<()> {
    if dances.is_empty() {
        return Err(Report::new(CacheError::InvalidStyles));
    }

    for style in dances {
        let dir = style_dir(root, *style);
        if !dir.exists() {
            println!(
                "{}",
                format!("Directory {} does not exist, skipping", dir.display()).yellow()
            );
            continue;
        }
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(error) => {
                println!(
                    "{}",
                    format!("Error accessing directory {}: {}", dir.display(), error).red()
                );
                continue;
            }
        };
        for entry in entries.filter_map(Result::ok) {
            let file_path = entry.path();
            if file_path.is_file() {
                if let Err(error) = fs::remove_file(&file_path) {
                    println!(
                        "{}",
                        format!("Failed to delete {}: {}", file_path.display(), error).red()
                    );
                }
            }
        }
    }
    Ok(())
}

/// Turns raw playlist entries into cached tracks. The index is the entry's
/// position in the source playlist, so it survives dropped entries.
pub fn normalize_entries(entries: &[RawEntry]) -> Vec<Track> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let video_id = entry.id.clone()?;
            let duration = entry.duration?;
            Some(Track {
                title: entry.title.clone().unwrap_or_default(),
                index,
                video_id,
                duration,
            })
        })
        .collect()
}

/// Full delete-and-repopulate cycle for the given styles. The playlist-id and
/// style lists are parallel; a length mismatch aborts before anything is
/// deleted. One style failing its fetch or download never stops the others.
pub fn refresh_downloads<S, D>(
    root: &Path,
    playlist_ids: &[String],
    dances: &[DanceStyle],
    source: &S,
    downloader: &D,
) -> CacheResult<()>
where
    S: PlaylistSource,
    D: AudioDownloader,
{
    if dances.is_empty() {
        return Err(Report::new(CacheError::InvalidStyles));
    }
    if playlist_ids.len() != dances.len() {
        return Err(Report::new(CacheError::PlaylistCountMismatch {
            playlists: playlist_ids.len(),
            dances: dances.len(),
        }));
    }

    clear_directories(root, dances)?;

    for (playlist_id, style) in playlist_ids.iter().zip(dances) {
        match refresh_style(root, playlist_id, *style, source, downloader) {
            Ok(cached) => println!(
                "{}",
                format!("{}: {} tracks cached", style, cached).green()
            ),
            Err(report) => println!(
                "{}",
                format!(
                    "Error processing playlist {} for {}: {}",
                    playlist_id, style, report
                )
                .red()
            ),
        }
    }
    Ok(())
}

fn refresh_style<S, D>(
    root: &Path,
    playlist_id: &str,
    style: DanceStyle,
    source: &S,
    downloader: &D,
) -> CacheResult<usize>
where
    S: PlaylistSource,
    D: AudioDownloader,
{
    let entries = source
        .playlist_entries(playlist_id)
        .change_context(CacheError::Refresh(style))?;
    let tracks = normalize_entries(&entries);
    if tracks.is_empty() {
        return Err(Report::new(CacheError::EmptyPlaylist(style))
            .attach_printable(format!("playlist {}", playlist_id)));
    }

    let dir = style_dir(root, style);
    fs::create_dir_all(&dir)
        .into_report()
        .attach_printable(format!("Failed to create directory {}", dir.display()))
        .change_context(CacheError::Refresh(style))?;
    write_track_list(&dir, &tracks).change_context(CacheError::Refresh(style))?;

    download_tracks(&tracks, &dir, style, downloader)?;
    Ok(tracks.len())
}

fn download_tracks<D>(
    tracks: &[Track],
    dir: &Path,
    style: DanceStyle,
    downloader: &D,
) -> CacheResult<()>
where
    D: AudioDownloader,
{
    let pb = ProgressBar::new(tracks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{wide_bar:.white/blue}] {pos}/{len}")
            .into_report()
            .change_context(CacheError::Refresh(style))?
            .progress_chars("█  "),
    );
    pb.set_message(format!("Downloading {} tracks for {}", tracks.len(), style));

    for track in tracks {
        if let Err(report) = downloader.download_audio(&track.video_id, dir) {
            pb.println(format!(
                "{}",
                format!("Failed to download {}: {}", track.video_id, report).yellow()
            ));
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(())
}
