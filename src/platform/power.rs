use crate::core::control::power::{PowerAction, PowerActuator};
use crate::error::{CntrlError, Result};
use crate::platform::command;

/// A program and its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

const fn cmd(program: &'static str, args: &'static [&'static str]) -> CommandSpec {
    CommandSpec { program, args }
}

pub fn windows_power_command(action: PowerAction) -> CommandSpec {
    match action {
        PowerAction::Shutdown => cmd("shutdown", &["/s", "/t", "0"]),
        PowerAction::Restart => cmd("shutdown", &["/r", "/t", "0"]),
        PowerAction::Hibernate => cmd("shutdown", &["/h"]),
        PowerAction::Sleep => cmd(
            "rundll32.exe",
            &["powrprof.dll,SetSuspendState", "0,1,0"],
        ),
    }
}

/// macOS has no user-level hibernate, so it maps to sleep.
pub fn macos_power_command(action: PowerAction) -> CommandSpec {
    match action {
        PowerAction::Shutdown => cmd("osascript", &["-e", "tell app \"System Events\" to shut down"]),
        PowerAction::Restart => cmd("osascript", &["-e", "tell app \"System Events\" to restart"]),
        PowerAction::Hibernate | PowerAction::Sleep => cmd("pmset", &["sleepnow"]),
    }
}

pub fn linux_power_command(action: PowerAction) -> CommandSpec {
    match action {
        PowerAction::Shutdown => cmd("systemctl", &["poweroff"]),
        PowerAction::Restart => cmd("systemctl", &["reboot"]),
        PowerAction::Hibernate => cmd("systemctl", &["hibernate"]),
        PowerAction::Sleep => cmd("systemctl", &["suspend"]),
    }
}

/// Issues power transitions by running an OS command.
pub struct CommandPowerActuator {
    resolve: fn(PowerAction) -> CommandSpec,
}

impl CommandPowerActuator {
    pub fn new(resolve: fn(PowerAction) -> CommandSpec) -> Self {
        Self { resolve }
    }
}

impl PowerActuator for CommandPowerActuator {
    fn execute(&self, action: PowerAction) -> Result<()> {
        let CommandSpec { program, args } = (self.resolve)(action);
        command::run_status(program, args)
            .map_err(|e| CntrlError::power(format!("{} rejected: {}", action, e)))
    }
}
