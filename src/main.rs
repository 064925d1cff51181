use std::fmt;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use colored::Colorize;
use error_stack::fmt::{Charset, ColorMode};
use error_stack::{IntoReport, Report, ResultExt};

use crate::config::PracticeConfig;
use crate::dance::{DanceStyle, Level, Section};
use crate::dialoguer::Dialoguer;
use crate::player::Mpv;
use crate::playlist::{extract_playlist_id, RoundScope};
use crate::selector::DurationBand;
use crate::session::{RoundPlan, Session};
use crate::source::ytdlp::YtDlp;
use crate::status::cache_status_table;

mod cache;
mod config;
mod dance;
mod dialoguer;
mod player;
mod playlist;
mod selector;
mod session;
mod source;
mod status;

#[derive(Debug)]
pub struct BallroomError;
impl fmt::Display for BallroomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ballroom dj error")
    }
}
impl std::error::Error for BallroomError {}

pub type BallroomResult<T> = error_stack::Result<T, BallroomError>;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Ballroom round player")]
struct Cli {
    #[command(subcommand)]
    command: BallroomCommands,
}

/// A simple program to play ballroom finals from cached playlists
#[derive(Subcommand, Debug, PartialEq, Clone)]
enum BallroomCommands {
    /// Play a championship final round
    Final {
        /// Class of the final (d, c, b for b and up)
        #[clap(long, short, default_value = "b")]
        klasse: String,
        /// Section to dance (standard or latin)
        #[clap(long, short, default_value = "standard")]
        section: String,
        /// Length of songs (long for 1:55-2:10, normal for the configured band)
        #[clap(long, short, default_value = "normal")]
        length: String,
        /// Pause time between titles in seconds
        #[clap(long, short, default_value_t = 30)]
        pause: u64,
        /// Download all songs from the playlists first
        #[clap(long, short, action)]
        download: bool,
    },
    /// Practice a single dance style
    Dance {
        /// Dance style to practice
        style: String,
        /// Length of songs (long, normal, or any)
        #[clap(long, short, default_value = "any")]
        length: String,
        /// Number of songs to play
        #[clap(long, short, default_value_t = 10)]
        number: usize,
        /// Pause time between titles in seconds
        #[clap(long, short, default_value_t = 30)]
        pause: u64,
        /// Download all songs from the playlist first
        #[clap(long, short, action)]
        download: bool,
    },
    /// Store the storage root and the playlist url per dance style
    Setup,
    /// Reads the current config file
    Config,
    /// Show the state of the local song caches
    Status,
}

impl BallroomCommands {
    pub fn execute(&self) -> BallroomResult<()> {
        return match self {
            BallroomCommands::Final {
                klasse,
                section,
                length,
                pause,
                download,
            } => {
                let level = parse_level(klasse)?;
                let section = parse_section(section)?;
                let band = parse_band(length)?;
                let config = PracticeConfig::read_config_file().change_context(BallroomError)?;
                let plan = RoundPlan {
                    dances: RoundScope::Final { level, section }.dances(),
                    band,
                    pause_secs: *pause,
                    force_download: *download,
                };
                let ytdlp = YtDlp::new();
                Session::new(&config, &ytdlp, &ytdlp, &Mpv)
                    .run(&plan)
                    .change_context(BallroomError)
            }
            BallroomCommands::Dance {
                style,
                length,
                number,
                pause,
                download,
            } => {
                let style = parse_style(style)?;
                let band = parse_band(length)?;
                let config = PracticeConfig::read_config_file().change_context(BallroomError)?;
                let plan = RoundPlan {
                    dances: RoundScope::Single(style).dances().repeat(*number),
                    band,
                    pause_secs: *pause,
                    force_download: *download,
                };
                let ytdlp = YtDlp::new();
                Session::new(&config, &ytdlp, &ytdlp, &Mpv)
                    .run(&plan)
                    .change_context(BallroomError)
            }
            BallroomCommands::Setup => {
                let config_path =
                    PracticeConfig::get_config_file_path().change_context(BallroomError)?;
                let mut config = if config_path.is_file() {
                    let update = Dialoguer::select_yes_or_no(format!(
                        "A config file already exists at {}. Update it?",
                        config_path.display()
                    ))
                    .change_context(BallroomError)?;
                    if !update {
                        return Ok(());
                    }
                    PracticeConfig::load_file_config().change_context(BallroomError)?
                } else {
                    PracticeConfig::new()
                };

                let default_root = if config.root_dir.is_empty() {
                    "~/ballroom".to_string()
                } else {
                    config.root_dir.clone()
                };
                config.root_dir = Dialoguer::input_with_default(
                    "Storage root for the song caches".to_string(),
                    default_root,
                )
                .change_context(BallroomError)?;

                for style in DanceStyle::all() {
                    let prompt_text = format!("Playlist url for {} (empty to skip)", style);
                    let current = config.playlists.get(&style).cloned().unwrap_or_default();
                    let url = if current.is_empty() {
                        Dialoguer::input_allow_empty(prompt_text)
                    } else {
                        Dialoguer::input_with_default(prompt_text, current)
                    }
                    .change_context(BallroomError)?;

                    if url.is_empty() {
                        config.playlists.remove(&style);
                    } else {
                        extract_playlist_id(&url).change_context(BallroomError)?;
                        config.playlists.insert(style, url);
                    }
                }

                config.save_config_file().change_context(BallroomError)?;
                println!(
                    "{}",
                    format!("Configuration stored at {}", config_path.display()).green()
                );
                println!(
                    "Run `{}` to check the caches",
                    BallroomCommands::Status.cli_command().cyan()
                );
                Ok(())
            }
            BallroomCommands::Config => {
                let config = PracticeConfig::read_config_file().change_context(BallroomError)?;
                println!("Current config:\n{:#?}", config);
                Ok(())
            }
            BallroomCommands::Status => {
                let config = PracticeConfig::read_config_file().change_context(BallroomError)?;
                println!("{}", cache_status_table(&config));
                Ok(())
            }
        };
    }

    pub fn cli_command(&self) -> String {
        match self {
            BallroomCommands::Final { .. } => {
                format!("ballroom-dj final")
            }
            BallroomCommands::Dance { .. } => {
                format!("ballroom-dj dance")
            }
            BallroomCommands::Setup => {
                format!("ballroom-dj setup")
            }
            BallroomCommands::Config => {
                format!("ballroom-dj config")
            }
            BallroomCommands::Status => {
                format!("ballroom-dj status")
            }
        }
    }
}

fn parse_level(value: &str) -> BallroomResult<Level> {
    Level::from_str(value)
        .into_report()
        .attach_printable(format!("Invalid class: {}. Must be d, c, or b.", value))
        .change_context(BallroomError)
}

fn parse_section(value: &str) -> BallroomResult<Section> {
    Section::from_str(value)
        .into_report()
        .attach_printable(format!(
            "Invalid section: {}. Must be standard or latin.",
            value
        ))
        .change_context(BallroomError)
}

fn parse_band(value: &str) -> BallroomResult<DurationBand> {
    DurationBand::from_str(value)
        .into_report()
        .attach_printable(format!(
            "Invalid song length: {}. Must be long, normal, or any.",
            value
        ))
        .change_context(BallroomError)
}

fn parse_style(value: &str) -> BallroomResult<DanceStyle> {
    DanceStyle::from_str(value)
        .into_report()
        .attach_printable(format!("Invalid dance style: {}", value))
        .change_context(BallroomError)
        .map_err(|report| {
            report.attach(Suggestion(format!(
                "valid styles: {}",
                DanceStyle::all()
                    .iter()
                    .map(|style| style.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        })
}

pub struct Suggestion(String);

impl Suggestion {
    pub fn set_report() {
        Report::set_charset(Charset::Utf8);
        Report::set_color_mode(ColorMode::Color);
        Report::install_debug_hook::<Self>(|Self(value), context| {
            context.push_body(format!("{}: {value}", "suggestion".yellow()))
        });
    }
}

fn run() -> BallroomResult<()> {
    let cli = Cli::parse();

    Suggestion::set_report();

    cli.command.execute()?;

    Ok(())
}

fn main() -> BallroomResult<()> {
    run()
}
