use std::io;
use std::thread;
use std::time::Duration;

use windows_sys::Win32::Foundation::FILETIME;
use windows_sys::Win32::System::Threading::GetSystemTimes;
use winreg::enums::HKEY_LOCAL_MACHINE;
use winreg::RegKey;

use crate::core::telemetry::cpu::{load_between, CpuCounters, CpuProbe};
use crate::error::Result;

const PROCESSOR_KEY: &str = r"HARDWARE\DESCRIPTION\System\CentralProcessor\0";
const SAMPLE_WINDOW: Duration = Duration::from_millis(100);

/// CPU identity from the registry, load from `GetSystemTimes`.
#[derive(Debug, Default)]
pub struct RegistryCpuProbe;

impl RegistryCpuProbe {
    fn processor_key() -> Option<RegKey> {
        RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey(PROCESSOR_KEY)
            .map_err(|e| log::debug!("Cannot open {}: {}", PROCESSOR_KEY, e))
            .ok()
    }

    fn counters() -> Result<CpuCounters> {
        let zero = FILETIME {
            dwLowDateTime: 0,
            dwHighDateTime: 0,
        };
        let (mut idle, mut kernel, mut user) = (zero, zero, zero);

        // SAFETY: all three pointers reference live, writable FILETIMEs
        let ok = unsafe { GetSystemTimes(&mut idle, &mut kernel, &mut user) };
        if ok == 0 {
            return Err(io::Error::last_os_error().into());
        }

        // kernel time already includes idle time
        Ok(CpuCounters {
            idle: filetime_ticks(&idle),
            total: filetime_ticks(&kernel) + filetime_ticks(&user),
        })
    }
}

fn filetime_ticks(ft: &FILETIME) -> u64 {
    (u64::from(ft.dwHighDateTime) << 32) | u64::from(ft.dwLowDateTime)
}

impl CpuProbe for RegistryCpuProbe {
    fn brand(&self) -> Option<String> {
        Self::processor_key()?
            .get_value::<String, _>("ProcessorNameString")
            .ok()
    }

    fn base_speed_ghz(&self) -> Option<f64> {
        let mhz: u32 = Self::processor_key()?.get_value("~MHz").ok()?;
        Some(f64::from(mhz) / 1000.0)
    }

    fn physical_cores(&self) -> Option<usize> {
        sysinfo::System::physical_core_count()
    }

    fn sample_load(&self) -> Result<f64> {
        let before = Self::counters()?;
        thread::sleep(SAMPLE_WINDOW);
        let after = Self::counters()?;
        Ok(load_between(before, after))
    }
}
