use crate::core::control::media::{parse_delimited_status, MediaAction, MediaActuator, MediaStatus};
use crate::error::{CntrlError, Result};
use crate::platform::command;

const STATUS_SCRIPT: &str = r#"
if application "Spotify" is running then
    tell application "Spotify"
        return "Spotify||" & (player state as string) & "||" & (name of current track) & "||" & (artist of current track)
    end tell
else if application "Music" is running then
    tell application "Music"
        if player state is stopped then return "Music||stopped||||"
        return "Music||" & (player state as string) & "||" & (name of current track) & "||" & (artist of current track)
    end tell
end if
return "None"
"#;

/// Media keys and now-playing through AppleScript.
#[derive(Debug, Default)]
pub struct AppleScriptMedia;

/// Virtual key code for the hardware media key.
pub fn media_key_code(action: MediaAction) -> u8 {
    match action {
        MediaAction::PlayPause => 100,
        MediaAction::Next => 101,
        MediaAction::Previous => 98,
    }
}

impl MediaActuator for AppleScriptMedia {
    fn send(&self, action: MediaAction) -> Result<()> {
        let script = format!(
            "tell application \"System Events\" to key code {}",
            media_key_code(action)
        );
        command::run_status("osascript", &["-e", &script])
            .map_err(|e| CntrlError::media(e.to_string()))
    }

    fn status(&self) -> Result<MediaStatus> {
        let output = command::run("osascript", &["-e", STATUS_SCRIPT])
            .map_err(|e| CntrlError::media(e.to_string()))?;
        Ok(parse_delimited_status(&output))
    }
}
