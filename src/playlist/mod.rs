use std::fmt;

use error_stack::{IntoReport, Report, ResultExt};
use url::Url;

use crate::config::PracticeConfig;
use crate::dance::{DanceStyle, Level, Section};
use crate::Suggestion;

#[derive(Debug)]
pub enum PlaylistError {
    MissingPlaylist(DanceStyle),
    InvalidReference(String),
}

impl fmt::Display for PlaylistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaylistError::MissingPlaylist(style) => {
                write!(f, "No playlist url configured for {}", style)
            }
            PlaylistError::InvalidReference(url) => {
                write!(f, "Invalid playlist url: {}", url)
            }
        }
    }
}

impl std::error::Error for PlaylistError {}

pub type PlaylistResult<T> = error_stack::Result<T, PlaylistError>;

/// What a run covers: a whole final for a class, or one style on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundScope {
    Final { level: Level, section: Section },
    Single(DanceStyle),
}

impl RoundScope {
    /// The dances of the scope in competition order.
    pub fn dances(&self) -> Vec<DanceStyle> {
        match self {
            RoundScope::Final { level, section } => level.styles(*section),
            RoundScope::Single(style) => vec![*style],
        }
    }
}

/// One resolved playlist reference: the style it feeds and its configured url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub style: DanceStyle,
    pub url: String,
}

/// Looks up the configured playlist url for every requested style, in order.
/// Any unconfigured style aborts the whole resolution, naming the style.
pub fn resolve_playlists(
    config: &PracticeConfig,
    styles: &[DanceStyle],
) -> PlaylistResult<Vec<PlaylistRef>> {
    styles
        .iter()
        .map(|style| match config.playlists.get(style) {
            Some(url) => Ok(PlaylistRef {
                style: *style,
                url: url.clone(),
            }),
            None => Err(Report::new(PlaylistError::MissingPlaylist(*style)).attach(
                Suggestion(format!(
                    "set {} in the environment or add the playlist via `ballroom-dj setup`",
                    style.env_var()
                )),
            )),
        })
        .collect()
}

/// Pulls the playlist id out of the `list=` query parameter. A reference
/// without it is broken configuration, never silently skipped.
pub fn extract_playlist_id(reference: &str) -> PlaylistResult<String> {
    let url = Url::parse(reference)
        .into_report()
        .change_context(PlaylistError::InvalidReference(reference.to_string()))?;
    url.query_pairs()
        .find_map(|(key, value)| {
            if key == "list" && !value.is_empty() {
                Some(value.into_owned())
            } else {
                None
            }
        })
        .ok_or(PlaylistError::InvalidReference(reference.to_string()))
        .into_report()
        .attach_printable("the url has no list= query parameter")
}

/// `extract_playlist_id` over a whole resolved batch, failing on the first
/// broken reference.
pub fn extract_playlist_ids(refs: &[PlaylistRef]) -> PlaylistResult<Vec<String>> {
    refs.iter()
        .map(|reference| extract_playlist_id(&reference.url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(styles: &[(DanceStyle, &str)]) -> PracticeConfig {
        let mut config = PracticeConfig::new();
        config.root_dir = "/tmp/ballroom".to_string();
        for (style, url) in styles {
            config.playlists.insert(*style, url.to_string());
        }
        config
    }

    #[test]
    fn final_scope_expands_to_the_class_table() {
        let scope = RoundScope::Final {
            level: Level::D,
            section: Section::Latin,
        };
        assert_eq!(
            scope.dances(),
            vec![DanceStyle::Chacha, DanceStyle::Rumba, DanceStyle::Jive]
        );
    }

    #[test]
    fn single_scope_is_a_singleton() {
        assert_eq!(
            RoundScope::Single(DanceStyle::Tango).dances(),
            vec![DanceStyle::Tango]
        );
    }

    #[test]
    fn resolution_keeps_the_requested_order() {
        let config = config_with(&[
            (DanceStyle::Tango, "https://music.example?list=t"),
            (DanceStyle::SlowWaltz, "https://music.example?list=w"),
        ]);
        let refs =
            resolve_playlists(&config, &[DanceStyle::SlowWaltz, DanceStyle::Tango]).unwrap();
        assert_eq!(refs[0].style, DanceStyle::SlowWaltz);
        assert_eq!(refs[0].url, "https://music.example?list=w");
        assert_eq!(refs[1].style, DanceStyle::Tango);
    }

    #[test]
    fn an_unconfigured_style_fails_the_whole_resolution() {
        let config = config_with(&[(DanceStyle::Tango, "https://music.example?list=t")]);
        let result = resolve_playlists(&config, &[DanceStyle::Tango, DanceStyle::Quickstep]);
        let report = result.unwrap_err();
        assert!(matches!(
            report.current_context(),
            PlaylistError::MissingPlaylist(DanceStyle::Quickstep)
        ));
    }

    #[test]
    fn playlist_id_survives_surrounding_query_parameters() {
        let id = extract_playlist_id(
            "https://music.youtube.com/playlist?si=xyz&list=PLabc123&feature=share",
        )
        .unwrap();
        assert_eq!(id, "PLabc123");
    }

    #[test]
    fn a_reference_without_list_is_fatal() {
        let result = extract_playlist_id("https://music.youtube.com/watch?v=abc");
        assert!(matches!(
            result.unwrap_err().current_context(),
            PlaylistError::InvalidReference(_)
        ));
    }

    #[test]
    fn an_unparsable_reference_is_fatal() {
        assert!(extract_playlist_id("not a url at all").is_err());
    }

    #[test]
    fn batch_extraction_fails_on_the_first_broken_reference() {
        let refs = vec![
            PlaylistRef {
                style: DanceStyle::SlowWaltz,
                url: "https://music.example/playlist?list=good".to_string(),
            },
            PlaylistRef {
                style: DanceStyle::Tango,
                url: "https://music.example/playlist".to_string(),
            },
        ];
        assert!(extract_playlist_ids(&refs).is_err());
        assert_eq!(
            extract_playlist_ids(&refs[..1]).unwrap(),
            vec!["good".to_string()]
        );
    }
}
