use sysinfo::System;

use crate::core::telemetry::HostProbe;

/// Hostname and uptime from sysinfo.
#[derive(Debug, Default)]
pub struct SysinfoHost;

impl HostProbe for SysinfoHost {
    fn hostname(&self) -> Option<String> {
        System::host_name().filter(|name| !name.trim().is_empty())
    }

    fn uptime(&self) -> u64 {
        System::uptime()
    }
}
