use std::fs;
use std::thread;
use std::time::Duration;

use crate::core::telemetry::cpu::{load_between, CpuCounters, CpuProbe};
use crate::error::{CntrlError, Result};

const SAMPLE_WINDOW: Duration = Duration::from_millis(100);

/// CPU facts from procfs.
#[derive(Debug, Default)]
pub struct ProcCpuProbe;

impl ProcCpuProbe {
    fn cpuinfo() -> Option<String> {
        fs::read_to_string("/proc/cpuinfo").ok()
    }

    fn counters() -> Result<CpuCounters> {
        let stat = fs::read_to_string("/proc/stat")?;
        parse_proc_stat(&stat)
            .ok_or_else(|| CntrlError::parse("no aggregate cpu line in /proc/stat"))
    }
}

impl CpuProbe for ProcCpuProbe {
    fn brand(&self) -> Option<String> {
        cpuinfo_field(&Self::cpuinfo()?, "model name")
    }

    fn base_speed_ghz(&self) -> Option<f64> {
        let mhz: f64 = cpuinfo_field(&Self::cpuinfo()?, "cpu MHz")?.parse().ok()?;
        Some(mhz / 1000.0)
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

/// First value for `key` in `/proc/cpuinfo` text.
pub fn cpuinfo_field(cpuinfo: &str, key: &str) -> Option<String> {
    cpuinfo.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        if k.trim() == key {
            let v = v.trim();
            (!v.is_empty()).then(|| v.to_string())
        } else {
            None
        }
    })
}

/// Aggregate counters from the `cpu ` line of `/proc/stat`. Idle includes
/// iowait.
pub fn parse_proc_stat(stat: &str) -> Option<CpuCounters> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|v| v.parse().ok())
        .collect();
    if values.len() < 4 {
        return None;
    }

    // user nice system idle iowait irq softirq steal; guest time is already
    // folded into user and nice
    let idle = values[3] + values.get(4).copied().unwrap_or(0);
    let total = values.iter().take(8).sum();
    Some(CpuCounters { idle, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proc_stat() {
        let stat = "cpu  100 0 50 800 50 0 0 0 0 0\ncpu0 50 0 25 400 25 0 0 0 0 0\nintr 1\n";
        let counters = parse_proc_stat(stat).unwrap();
        assert_eq!(counters.idle, 850);
        assert_eq!(counters.total, 1000);
    }

    #[test]
    fn test_proc_stat_load() {
        let before = parse_proc_stat("cpu  100 0 50 800 50 0 0 0\n").unwrap();
        let after = parse_proc_stat("cpu  250 0 100 850 50 0 0 0\n").unwrap();
        // 250 ticks elapsed, 50 idle
        assert_eq!(load_between(before, after), 80.0);
    }

    #[test]
    fn test_cpuinfo_field() {
        let info = "processor\t: 0\nmodel name\t: AMD Ryzen 7 5800X 8-Core Processor\ncpu MHz\t\t: 3800.000\n";
        assert_eq!(
            cpuinfo_field(info, "model name").as_deref(),
            Some("AMD Ryzen 7 5800X 8-Core Processor")
        );
        assert_eq!(cpuinfo_field(info, "cpu MHz").as_deref(), Some("3800.000"));
        assert_eq!(cpuinfo_field(info, "flags"), None);
    }
}
