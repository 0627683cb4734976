use std::io;
use std::mem;

use windows_sys::Win32::System::SystemInformation::{GlobalMemoryStatusEx, MEMORYSTATUSEX};

use crate::core::telemetry::memory::MemoryProbe;
use crate::core::telemetry::{clamp_percent, MemoryStats};
use crate::error::Result;

/// Physical memory via `GlobalMemoryStatusEx`. The percentage is the
/// OS-reported memory load.
#[derive(Debug, Default)]
pub struct GlobalMemoryProbe;

impl MemoryProbe for GlobalMemoryProbe {
    fn measure(&self) -> Result<MemoryStats> {
        // SAFETY: MEMORYSTATUSEX is plain data; all-zero is a valid value
        let mut status: MEMORYSTATUSEX = unsafe { mem::zeroed() };
        status.dwLength = mem::size_of::<MEMORYSTATUSEX>() as u32;

        // SAFETY: dwLength is set and the pointer is valid for writes
        if unsafe { GlobalMemoryStatusEx(&mut status) } == 0 {
            return Err(io::Error::last_os_error().into());
        }

        let total = status.ullTotalPhys;
        let free = status.ullAvailPhys.min(total);
        Ok(MemoryStats {
            total,
            used: total - free,
            free,
            used_percent: clamp_percent(f64::from(status.dwMemoryLoad)),
        })
    }
}
