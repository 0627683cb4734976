//! Media transport control and now-playing status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CntrlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaAction {
    PlayPause,
    Next,
    Previous,
}

impl MediaAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaAction::PlayPause => "playpause",
            MediaAction::Next => "next",
            MediaAction::Previous => "previous",
        }
    }
}

impl fmt::Display for MediaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaAction {
    type Err = CntrlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "play" | "pause" | "playpause" | "play-pause" => Ok(MediaAction::PlayPause),
            "next" => Ok(MediaAction::Next),
            "prev" | "previous" => Ok(MediaAction::Previous),
            other => Err(CntrlError::unknown_action(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
    /// A session exists and reports metadata, play state unknown.
    Active,
    /// A session exists without metadata.
    Idle,
    Unknown,
}

impl PlaybackState {
    fn from_player(state: &str) -> Self {
        match state.trim().to_lowercase().as_str() {
            "playing" => PlaybackState::Playing,
            "paused" => PlaybackState::Paused,
            "stopped" => PlaybackState::Stopped,
            _ => PlaybackState::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaStatus {
    pub status: PlaybackState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

impl MediaStatus {
    pub fn stopped() -> Self {
        Self::bare(PlaybackState::Stopped)
    }

    pub fn unknown() -> Self {
        Self::bare(PlaybackState::Unknown)
    }

    fn bare(status: PlaybackState) -> Self {
        Self {
            status,
            source: None,
            title: None,
            artist: None,
        }
    }
}

pub trait MediaActuator: Send + Sync {
    /// Send a transport command to the foreground media session.
    fn send(&self, action: MediaAction) -> Result<()>;

    fn status(&self) -> Result<MediaStatus>;
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse the `source||state||title||artist` line emitted by the AppleScript
/// status probe. `None` means no player is running.
pub fn parse_delimited_status(output: &str) -> MediaStatus {
    let line = output.trim();
    if line.is_empty() || line == "None" {
        return MediaStatus::stopped();
    }

    let parts: Vec<&str> = line.split("||").collect();
    if parts.len() != 4 {
        log::debug!("Unexpected media status line: {:?}", line);
        return MediaStatus::unknown();
    }

    MediaStatus {
        status: PlaybackState::from_player(parts[1]),
        source: non_empty(parts[0]),
        title: non_empty(parts[2]),
        artist: non_empty(parts[3]),
    }
}

/// Parse `playerctl metadata --format '{{playerName}}||{{status}}||{{title}}||{{artist}}'`.
pub fn parse_playerctl_status(output: &str) -> MediaStatus {
    if output.trim().is_empty() {
        return MediaStatus::stopped();
    }
    parse_delimited_status(output)
}

#[derive(Debug, Deserialize)]
struct SessionMetadata {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
}

/// Parse the JSON emitted by the Windows media-session probe. `None`
/// (or nothing) means there is no active session; otherwise the session
/// is `active` when it carries a title or artist and `idle` when not.
pub fn parse_session_json(output: &str) -> Result<MediaStatus> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "None" {
        return Ok(MediaStatus::stopped());
    }

    let meta: SessionMetadata = serde_json::from_str(trimmed)
        .map_err(|e| CntrlError::media(format!("invalid session metadata: {}", e)))?;

    let title = meta.title.as_deref().and_then(non_empty);
    let artist = meta.artist.as_deref().and_then(non_empty);
    let status = if title.is_some() || artist.is_some() {
        PlaybackState::Active
    } else {
        PlaybackState::Idle
    };

    Ok(MediaStatus {
        status,
        source: meta.source.as_deref().and_then(non_empty),
        title,
        artist,
    })
}
