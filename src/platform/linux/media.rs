use crate::core::control::media::{parse_playerctl_status, MediaAction, MediaActuator, MediaStatus};
use crate::error::{CntrlError, Result};
use crate::platform::command;

const PLAYERCTL: &str = "playerctl";
const STATUS_FORMAT: &str = "{{playerName}}||{{lowercase(status)}}||{{title}}||{{artist}}";

/// MPRIS players driven through `playerctl`.
#[derive(Debug, Default)]
pub struct PlayerctlMedia;

impl PlayerctlMedia {
    fn ensure_available() -> Result<()> {
        if command::is_available(PLAYERCTL) {
            Ok(())
        } else {
            Err(CntrlError::media("playerctl is not installed"))
        }
    }
}

pub fn playerctl_verb(action: MediaAction) -> &'static str {
    match action {
        MediaAction::PlayPause => "play-pause",
        MediaAction::Next => "next",
        MediaAction::Previous => "previous",
    }
}

impl MediaActuator for PlayerctlMedia {
    fn send(&self, action: MediaAction) -> Result<()> {
        Self::ensure_available()?;
        command::run_status(PLAYERCTL, &[playerctl_verb(action)])
            .map_err(|e| CntrlError::media(e.to_string()))
    }

    fn status(&self) -> Result<MediaStatus> {
        Self::ensure_available()?;
        let out = command::output(PLAYERCTL, &["metadata", "--format", STATUS_FORMAT])?;
        classify_playerctl(
            out.status.success(),
            &String::from_utf8_lossy(&out.stdout),
            &String::from_utf8_lossy(&out.stderr),
        )
    }
}

/// "No players found" is an idle desktop, not a failure.
pub fn classify_playerctl(success: bool, stdout: &str, stderr: &str) -> Result<MediaStatus> {
    if success {
        Ok(parse_playerctl_status(stdout))
    } else if stderr.contains("No players found") {
        Ok(MediaStatus::stopped())
    } else {
        Err(CntrlError::media(format!("playerctl: {}", stderr.trim())))
    }
}
