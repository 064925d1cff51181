use std::fmt;
use std::path::Path;
use std::process::Command;

use error_stack::{IntoReport, Report, ResultExt};

#[derive(Debug)]
pub struct PlayerError;

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Playback error")
    }
}

impl std::error::Error for PlayerError {}

pub type PlayerResult<T> = error_stack::Result<T, PlayerError>;

/// Plays one audio file, blocking until playback ends. A non-zero exit of the
/// player is an error; there is no retry.
pub trait Player {
    fn play(&self, path: &Path) -> PlayerResult<()>;
}

/// The real player: mpv as an external process.
#[derive(Debug, Clone, Default)]
pub struct Mpv;

impl Player for Mpv {
    fn play(&self, path: &Path) -> PlayerResult<()> {
        if !path.exists() {
            return Err(Report::new(PlayerError)
                .attach_printable(format!("File not found: {}", path.display())));
        }
        let status = Command::new("mpv")
            .args(["--no-terminal", "--quiet"])
            .arg(path)
            .status()
            .into_report()
            .attach_printable("Failed to run mpv")
            .change_context(PlayerError)?;
        if !status.success() {
            return Err(Report::new(PlayerError).attach_printable(format!(
                "mpv exited with {} while playing {}",
                status,
                path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_missing_file_fails_before_spawning_the_player() {
        let dir = tempfile::tempdir().unwrap();
        let result = Mpv.play(&dir.path().join("nope.mp3"));
        assert!(result.is_err());
    }
}
