use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    keybd_event, KEYEVENTF_KEYUP, VK_MEDIA_NEXT_TRACK, VK_MEDIA_PLAY_PAUSE, VK_MEDIA_PREV_TRACK,
};

use crate::core::control::media::{parse_session_json, MediaAction, MediaActuator, MediaStatus};
use crate::error::{CntrlError, Result};
use crate::platform::command;

/// Reads the current Global System Media Transport Controls session and
/// prints `None` or a compact JSON object.
const SESSION_SCRIPT: &str = r#"
Add-Type -AssemblyName System.Runtime.WindowsRuntime
$asTask = ([System.WindowsRuntimeSystemExtensions].GetMethods() | Where-Object {
    $_.Name -eq 'AsTask' -and $_.GetParameters().Count -eq 1 -and
    $_.GetParameters()[0].ParameterType.Name -eq 'IAsyncOperation`1' })[0]
function Await($op, [Type]$type) {
    $task = $asTask.MakeGenericMethod($type).Invoke($null, @($op))
    $task.Wait(-1) | Out-Null
    $task.Result
}
$mgrType = [Windows.Media.Control.GlobalSystemMediaTransportControlsSessionManager, Windows.Media.Control, ContentType = WindowsRuntime]
$propsType = [Windows.Media.Control.GlobalSystemMediaTransportControlsSessionMediaProperties, Windows.Media.Control, ContentType = WindowsRuntime]
$manager = Await ($mgrType::RequestAsync()) $mgrType
$session = $manager.GetCurrentSession()
if ($null -eq $session) { 'None'; exit 0 }
$props = Await ($session.TryGetMediaPropertiesAsync()) $propsType
[pscustomobject]@{ source = $session.SourceAppUserModelId; title = $props.Title; artist = $props.Artist } | ConvertTo-Json -Compress
"#;

/// Media keys through synthesized key presses.
#[derive(Debug, Default)]
pub struct KeyboardMedia;

fn virtual_key(action: MediaAction) -> u8 {
    let vk = match action {
        MediaAction::PlayPause => VK_MEDIA_PLAY_PAUSE,
        MediaAction::Next => VK_MEDIA_NEXT_TRACK,
        MediaAction::Previous => VK_MEDIA_PREV_TRACK,
    };
    vk as u8
}

impl MediaActuator for KeyboardMedia {
    fn send(&self, action: MediaAction) -> Result<()> {
        let vk = virtual_key(action);
        // SAFETY: keybd_event takes plain values only
        unsafe {
            keybd_event(vk, 0, 0, 0);
            keybd_event(vk, 0, KEYEVENTF_KEYUP, 0);
        }
        Ok(())
    }

    fn status(&self) -> Result<MediaStatus> {
        let output = command::run_powershell(SESSION_SCRIPT)
            .map_err(|e| CntrlError::media(e.to_string()))?;
        parse_session_json(&output)
    }
}
