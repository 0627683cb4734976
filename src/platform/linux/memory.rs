use std::fs;

use crate::core::telemetry::memory::MemoryProbe;
use crate::core::telemetry::MemoryStats;
use crate::error::{CntrlError, Result};

/// Memory totals from `/proc/meminfo`.
#[derive(Debug, Default)]
pub struct MeminfoProbe;

impl MemoryProbe for MeminfoProbe {
    fn measure(&self) -> Result<MemoryStats> {
        let text = fs::read_to_string("/proc/meminfo")?;
        parse_meminfo(&text).ok_or_else(|| CntrlError::parse("MemTotal missing from /proc/meminfo"))
    }
}

/// Used memory is total minus `MemAvailable`, falling back to `MemFree`
/// on kernels that predate the available estimate.
pub fn parse_meminfo(text: &str) -> Option<MemoryStats> {
    let mut total = None;
    let mut available = None;
    let mut free = None;

    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let key = parts.next().unwrap_or_default();
        let kb = match parts.next().and_then(|v| v.parse::<u64>().ok()) {
            Some(v) => v,
            None => continue,
        };
        match key {
            "MemTotal:" => total = Some(kb * 1024),
            "MemAvailable:" => available = Some(kb * 1024),
            "MemFree:" => free = Some(kb * 1024),
            _ => {}
        }
    }

    let total = total?;
    let unused = available.or(free).unwrap_or(0);
    Some(MemoryStats::from_used(total, total.saturating_sub(unused)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meminfo() {
        let text = "MemTotal:       16000000 kB\nMemFree:         2000000 kB\nMemAvailable:    8000000 kB\nBuffers:          100000 kB\n";
        let mem = parse_meminfo(text).unwrap();
        assert_eq!(mem.total, 16_000_000 * 1024);
        assert_eq!(mem.used, 8_000_000 * 1024);
        assert_eq!(mem.free, 8_000_000 * 1024);
        assert_eq!(mem.used_percent, 50.0);
    }

    #[test]
    fn test_parse_meminfo_without_available() {
        let text = "MemTotal: 1000 kB\nMemFree: 250 kB\n";
        let mem = parse_meminfo(text).unwrap();
        assert_eq!(mem.used_percent, 75.0);
    }

    #[test]
    fn test_parse_meminfo_missing_total() {
        assert!(parse_meminfo("MemFree: 250 kB\n").is_none());
    }
}
