use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fmt, fs};

use dotenvy::dotenv;
use error_stack::{IntoReport, Report, ResultExt};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::dance::DanceStyle;
use crate::Suggestion;

#[derive(Debug)]
pub struct ConfigError;

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Config error")
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = error_stack::Result<T, ConfigError>;

fn default_normal_band() -> (u64, u64) {
    (80, 115)
}

fn default_pause_exempt() -> Vec<DanceStyle> {
    vec![DanceStyle::Quickstep, DanceStyle::Jive]
}

/// The local setup: the parent of the per-style cache directories, one
/// playlist url per style, and the tunables that differ between competition
/// circuits (`normal_band` bounds and which dances skip the trailing pause).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PracticeConfig {
    pub root_dir: String,
    #[serde(default)]
    pub playlists: BTreeMap<DanceStyle, String>,
    #[serde(default = "default_normal_band")]
    pub normal_band: (u64, u64),
    #[serde(default = "default_pause_exempt")]
    pub pause_exempt: Vec<DanceStyle>,
}

impl PracticeConfig {
    pub fn new() -> Self {
        Self {
            root_dir: "".to_string(),
            playlists: BTreeMap::new(),
            normal_band: default_normal_band(),
            pause_exempt: default_pause_exempt(),
        }
    }

    /// Reads the config file and applies the env overrides. Fails if the file
    /// is missing or the storage root is not set.
    pub fn read_config_file() -> ConfigResult<Self> {
        let config_path = Self::get_config_file_path()?;
        let mut config = Self::load_file_config()?;

        config.apply_env_overrides();

        if config.root_dir.is_empty() {
            return Err(Report::new(ConfigError).attach_printable(format!(
                "Storage root is not set. Please fill root_dir in the config file at {}",
                config_path.display()
            )));
        }
        Ok(config)
    }

    /// The stored file as-is, without env overrides. `setup` edits this view
    /// so that environment values never leak into the file.
    pub fn load_file_config() -> ConfigResult<Self> {
        let config_path = Self::get_config_file_path()?;
        if !config_path.is_file() {
            return Err(Report::new(ConfigError)
                .attach_printable(format!(
                    "Config file not found at: {}",
                    config_path.display()
                ))
                .attach(Suggestion(
                    "run `ballroom-dj setup` to create it".to_string(),
                )));
        }

        let config_content = fs::read_to_string(&config_path)
            .into_report()
            .attach_printable(format!(
                "Failed to read config file at {}",
                config_path.display()
            ))
            .change_context(ConfigError)?;
        serde_json::from_str(&config_content)
            .into_report()
            .attach_printable("Failed to parse the config file. Ensure it is valid JSON.")
            .change_context(ConfigError)
    }

    pub fn save_config_file(&self) -> ConfigResult<()> {
        let serialized = serde_json::to_string_pretty(self)
            .into_report()
            .attach_printable("Failed to serialize the configuration to JSON")
            .change_context(ConfigError)?;
        let config_path = Self::get_config_file_path()?;
        let folder_path = config_path
            .parent()
            .ok_or(ConfigError)
            .into_report()?
            .to_path_buf();
        if !folder_path.exists() {
            fs::create_dir_all(&folder_path)
                .into_report()
                .attach_printable(format!(
                    "Failed to create directory at {}",
                    folder_path.display()
                ))
                .change_context(ConfigError)?;
        }
        fs::write(&config_path, serialized)
            .into_report()
            .attach_printable(format!(
                "Failed to write config file at {}",
                config_path.display()
            ))
            .change_context(ConfigError)?;
        Ok(())
    }

    pub fn get_config_file_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or(ConfigError)
            .into_report()
            .attach_printable("Could not determine the home directory")?;
        Ok(home.join(".ballroom-dj").join("config.json"))
    }

    /// `.env` / environment values win over the stored config: one
    /// `<STYLE>_URL` per dance style plus `BALLROOM_ROOT` for the storage
    /// root. Overrides are never written back to the file.
    pub fn apply_env_overrides(&mut self) {
        dotenv().ok();
        for style in DanceStyle::iter() {
            if let Ok(url) = env::var(style.env_var()) {
                if !url.is_empty() {
                    self.playlists.insert(style, url);
                }
            }
        }
        if let Ok(root) = env::var("BALLROOM_ROOT") {
            if !root.is_empty() {
                self.root_dir = root;
            }
        }
    }

    /// Storage root with a leading `~/` expanded to the home directory.
    pub fn root_path(&self) -> PathBuf {
        if let Some(rest) = self.root_dir.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        Path::new(&self.root_dir).to_path_buf()
    }
}
