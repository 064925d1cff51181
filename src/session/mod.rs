use std::fmt;
use std::thread;
use std::time::Duration;

use colored::Colorize;
use error_stack::{Report, ResultExt};
use rand::thread_rng;

use crate::cache::probe::check_for_songs;
use crate::cache::refresh::refresh_downloads;
use crate::cache::{read_track_list, style_dir};
use crate::config::PracticeConfig;
use crate::dance::DanceStyle;
use crate::playlist::{extract_playlist_ids, resolve_playlists};
use crate::player::Player;
use crate::selector::{select_song, DurationBand};
use crate::source::{AudioDownloader, PlaylistSource};

#[derive(Debug)]
pub struct SessionError;

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session error")
    }
}

impl std::error::Error for SessionError {}

pub type SessionResult<T> = error_stack::Result<T, SessionError>;

/// One planned run: the dances in play order (a style may repeat for
/// single-style practice), the song-length band, and the pause policy.
#[derive(Debug, Clone)]
pub struct RoundPlan {
    pub dances: Vec<DanceStyle>,
    pub band: DurationBand,
    pub pause_secs: u64,
    pub force_download: bool,
}

/// Drives a whole round: resolve playlists, probe the cache, refresh the
/// requested set as one batch when needed, then select/play/pause per dance.
pub struct Session<'a, S, D, P> {
    config: &'a PracticeConfig,
    source: &'a S,
    downloader: &'a D,
    player: &'a P,
}

impl<'a, S, D, P> Session<'a, S, D, P>
where
    S: PlaylistSource,
    D: AudioDownloader,
    P: Player,
{
    pub fn new(config: &'a PracticeConfig, source: &'a S, downloader: &'a D, player: &'a P) -> Self {
        Self {
            config,
            source,
            downloader,
            player,
        }
    }

    pub fn run(&self, plan: &RoundPlan) -> SessionResult<()> {
        if plan.dances.is_empty() {
            return Err(Report::new(SessionError).attach_printable("The round has no dances"));
        }

        // Configuration problems surface here, before any directory or
        // network is touched.
        let styles = distinct_styles(&plan.dances);
        let refs = resolve_playlists(self.config, &styles).change_context(SessionError)?;
        let playlist_ids = extract_playlist_ids(&refs).change_context(SessionError)?;

        let root = self.config.root_path();
        let songs_present = check_for_songs(&root, &styles).change_context(SessionError)?;

        // Staleness is decided over the whole requested set up front, never
        // per style inside the play loop.
        if plan.force_download || songs_present.values().any(|present| !present) {
            refresh_downloads(&root, &playlist_ids, &styles, self.source, self.downloader)
                .change_context(SessionError)?;
        }

        let mut rng = thread_rng();
        let round_len = plan.dances.len();
        let bounds = plan.band.bounds(self.config.normal_band);
        for style in &plan.dances {
            let dir = style_dir(&root, *style);
            let tracks = read_track_list(&dir).change_context(SessionError)?;
            let song = select_song(&tracks, bounds, &mut rng)
                .attach_printable(format!("picking a {} song for {}", plan.band, style))
                .change_context(SessionError)?;
            println!("{}", format!("Playing {}: {}", style, song).cyan());
            self.player
                .play(&dir.join(format!("{}.mp3", song)))
                .change_context(SessionError)?;

            if should_pause(round_len, *style, &self.config.pause_exempt) {
                println!("Taking a {} second break", plan.pause_secs);
                thread::sleep(Duration::from_secs(plan.pause_secs));
            }
        }
        Ok(())
    }
}

/// A break follows a dance only in final-sized rounds (3 to 5 dances), and
/// never after a style that closes a round.
pub fn should_pause(round_len: usize, style: DanceStyle, exempt: &[DanceStyle]) -> bool {
    (3..=5).contains(&round_len) && !exempt.contains(&style)
}

fn distinct_styles(dances: &[DanceStyle]) -> Vec<DanceStyle> {
    let mut styles: Vec<DanceStyle> = Vec::new();
    for style in dances {
        if !styles.contains(style) {
            styles.push(*style);
        }
    }
    styles
}
