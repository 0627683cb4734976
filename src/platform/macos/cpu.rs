use crate::core::telemetry::clamp_percent;
use crate::core::telemetry::cpu::CpuProbe;
use crate::error::{CntrlError, Result};
use crate::platform::command;

const APPLE_SILICON: &str = "Apple Silicon";

/// CPU facts from `sysctl`, load from `top`.
#[derive(Debug, Default)]
pub struct SysctlCpuProbe;

impl CpuProbe for SysctlCpuProbe {
    fn brand(&self) -> Option<String> {
        ["machdep.cpu.brand_string", "machdep.cpu.brand"]
            .iter()
            .filter_map(|key| command::sysctl(key).ok())
            .find(|value| !value.is_empty())
    }

    fn base_speed_ghz(&self) -> Option<f64> {
        let hz: f64 = command::sysctl("hw.cpufrequency").ok()?.parse().ok()?;
        Some(hz / 1e9)
    }

    fn physical_cores(&self) -> Option<usize> {
        command::sysctl("hw.physicalcpu").ok()?.parse().ok()
    }

    fn fallback_identity(&self) -> (&'static str, &'static str) {
        (APPLE_SILICON, "Apple")
    }

    fn sample_load(&self) -> Result<f64> {
        let output = command::run("top", &["-l", "1", "-n", "0", "-s", "0"])?;
        let idle = parse_top_idle(&output)
            .ok_or_else(|| CntrlError::parse("no idle figure in top output"))?;
        Ok(clamp_percent(100.0 - idle))
    }
}

/// Idle percentage from the `CPU usage:` line of `top -l 1`.
pub fn parse_top_idle(output: &str) -> Option<f64> {
    let line = output.lines().find(|l| l.contains("CPU usage:"))?;
    let usage = line.split_once("CPU usage:")?.1;
    usage
        .split(',')
        .find(|part| part.contains("idle"))
        .and_then(|part| part.trim().split('%').next())
        .and_then(|value| value.trim().parse::<f64>().ok())
}
