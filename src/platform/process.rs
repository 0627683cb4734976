//! Process table readers.

use parking_lot::Mutex;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use crate::core::telemetry::process::ProcessProbe;
use crate::core::telemetry::ProcessSample;
use crate::error::{CntrlError, Result};
use crate::platform::command;

/// Process table via sysinfo. Used on Windows and Linux.
pub struct SysinfoProcessProbe {
    system: Mutex<System>,
}

impl SysinfoProcessProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProcessProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for SysinfoProcessProbe {
    fn snapshot(&self) -> Result<Vec<ProcessSample>> {
        let mut system = self.system.lock();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        Ok(system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessSample {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                memory: process.memory(),
                cpu_time: process.accumulated_cpu_time() as f64 / 1000.0,
            })
            .collect())
    }
}

/// Process table via `ps`. Used on macOS, where sysinfo cannot read
/// other users' processes without elevated rights.
#[derive(Debug, Default)]
pub struct PsProcessProbe;

impl ProcessProbe for PsProcessProbe {
    fn snapshot(&self) -> Result<Vec<ProcessSample>> {
        let output = command::run("ps", &["-A", "-o", "pid=,rss=,time=,comm="])
            .map_err(|e| CntrlError::metric_collection(format!("ps: {}", e)))?;
        Ok(parse_ps_output(&output))
    }
}

/// Parse `pid rss time comm` rows. RSS is in KB; lines that do not parse
/// are skipped. A header row, if present, is ignored.
pub fn parse_ps_output(output: &str) -> Vec<ProcessSample> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let pid = fields.next()?.parse::<u32>().ok()?;
            let rss_kb = fields.next()?.parse::<u64>().ok()?;
            let cpu_time = parse_cpu_time(fields.next()?).unwrap_or(0.0);
            let name = fields.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return None;
            }
            Some(ProcessSample {
                pid,
                name,
                memory: rss_kb.saturating_mul(1024),
                cpu_time,
            })
        })
        .collect()
}

/// Parse `ps` TIME values: `MM:SS`, `MM:SS.cc`, `HH:MM:SS` or
/// `D-HH:MM:SS`, in seconds.
pub fn parse_cpu_time(text: &str) -> Option<f64> {
    let (days, clock) = match text.split_once('-') {
        Some((d, rest)) => (d.parse::<f64>().ok()?, rest),
        None => (0.0, text),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (0.0, m.parse::<f64>().ok()?, s.parse::<f64>().ok()?),
        [h, m, s] => (
            h.parse::<f64>().ok()?,
            m.parse::<f64>().ok()?,
            s.parse::<f64>().ok()?,
        ),
        _ => return None,
    };

    Some(days * 86_400.0 + hours * 3_600.0 + minutes * 60.0 + seconds)
}
