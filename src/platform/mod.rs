// Platform-specific code module
//
// Shell-based probes compile everywhere so their parsers are testable on
// any host; Win32 code is gated behind cfg(windows).

pub mod command;
pub mod df;
pub mod gpu;
pub mod host;
pub mod linux;
pub mod macos;
pub mod power;
pub mod process;
#[cfg(windows)]
pub mod windows;

use std::sync::Arc;

use crate::core::control::{MediaActuator, PowerActuator};
use crate::core::telemetry::Probes;

/// Probes for the OS this binary was built for.
pub fn native_probes() -> Probes {
    #[cfg(windows)]
    {
        Probes {
            cpu: Arc::new(windows::RegistryCpuProbe),
            memory: Box::new(windows::GlobalMemoryProbe),
            gpu: gpu::native_backends(),
            disk: Box::new(windows::FixedDriveProbe),
            process: Box::new(process::SysinfoProcessProbe::new()),
            host: Box::new(host::SysinfoHost),
        }
    }
    #[cfg(target_os = "macos")]
    {
        Probes {
            cpu: Arc::new(macos::SysctlCpuProbe),
            memory: Box::new(macos::VmStatProbe),
            gpu: gpu::native_backends(),
            disk: Box::new(df::DfDiskProbe::new(df::FsTypeLookup::Diskutil)),
            process: Box::new(process::PsProcessProbe),
            host: Box::new(host::SysinfoHost),
        }
    }
    #[cfg(not(any(windows, target_os = "macos")))]
    {
        Probes {
            cpu: Arc::new(linux::ProcCpuProbe),
            memory: Box::new(linux::MeminfoProbe),
            gpu: gpu::native_backends(),
            disk: Box::new(df::DfDiskProbe::new(df::FsTypeLookup::ProcMounts)),
            process: Box::new(process::SysinfoProcessProbe::new()),
            host: Box::new(host::SysinfoHost),
        }
    }
}

pub fn native_power() -> Box<dyn PowerActuator> {
    #[cfg(windows)]
    let resolve = power::windows_power_command;
    #[cfg(target_os = "macos")]
    let resolve = power::macos_power_command;
    #[cfg(not(any(windows, target_os = "macos")))]
    let resolve = power::linux_power_command;

    Box::new(power::CommandPowerActuator::new(resolve))
}

pub fn native_media() -> Box<dyn MediaActuator> {
    #[cfg(windows)]
    {
        Box::new(windows::KeyboardMedia)
    }
    #[cfg(target_os = "macos")]
    {
        Box::new(macos::AppleScriptMedia)
    }
    #[cfg(not(any(windows, target_os = "macos")))]
    {
        Box::new(linux::PlayerctlMedia)
    }
}
