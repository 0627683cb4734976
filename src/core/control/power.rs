use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CntrlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    Shutdown,
    Restart,
    Hibernate,
    Sleep,
}

impl PowerAction {
    pub const ALL: [PowerAction; 4] = [
        PowerAction::Shutdown,
        PowerAction::Restart,
        PowerAction::Hibernate,
        PowerAction::Sleep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::Shutdown => "shutdown",
            PowerAction::Restart => "restart",
            PowerAction::Hibernate => "hibernate",
            PowerAction::Sleep => "sleep",
        }
    }

    /// Label used when reporting the feature gate for this action.
    pub fn feature_name(&self) -> &'static str {
        match self {
            PowerAction::Shutdown => "Shutdown",
            PowerAction::Restart => "Restart",
            PowerAction::Hibernate => "Hibernate",
            PowerAction::Sleep => "Sleep",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerAction {
    type Err = CntrlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "shutdown" => Ok(PowerAction::Shutdown),
            "restart" | "reboot" => Ok(PowerAction::Restart),
            "hibernate" => Ok(PowerAction::Hibernate),
            "sleep" => Ok(PowerAction::Sleep),
            other => Err(CntrlError::unknown_action(other)),
        }
    }
}

/// Dispatches a power transition to the OS.
///
/// `Ok` means the OS accepted the request; the transition itself happens
/// afterwards and may never be observable by the caller.
pub trait PowerActuator: Send + Sync {
    fn execute(&self, action: PowerAction) -> Result<()>;
}
