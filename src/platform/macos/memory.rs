use crate::core::telemetry::memory::MemoryProbe;
use crate::core::telemetry::MemoryStats;
use crate::error::{CntrlError, Result};
use crate::platform::command;

const FALLBACK_PAGE_SIZE: u64 = 4096;

/// Page counters from `vm_stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VmStat {
    pub page_size: u64,
    pub active: u64,
    pub wired: u64,
    pub compressed: u64,
    pub free: u64,
}

/// Memory from `sysctl hw.memsize` and `vm_stat`.
#[derive(Debug, Default)]
pub struct VmStatProbe;

impl MemoryProbe for VmStatProbe {
    fn measure(&self) -> Result<MemoryStats> {
        let total: u64 = command::sysctl("hw.memsize")?
            .parse()
            .map_err(|e| CntrlError::parse(format!("hw.memsize: {}", e)))?;
        let vm_stat = command::run("vm_stat", &[])?;
        Ok(memory_from_vm_stat(total, &parse_vm_stat(&vm_stat, system_page_size())))
    }
}

fn system_page_size() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf has no preconditions
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 {
            return size as u64;
        }
    }
    FALLBACK_PAGE_SIZE
}

/// Parse `vm_stat` output. The page size from its header wins over
/// `default_page_size`.
pub fn parse_vm_stat(output: &str, default_page_size: u64) -> VmStat {
    let mut stat = VmStat {
        page_size: default_page_size,
        ..Default::default()
    };

    for line in output.lines() {
        if let Some(rest) = line.split_once("page size of").map(|(_, r)| r) {
            if let Some(size) = rest.split_whitespace().next().and_then(|v| v.parse().ok()) {
                stat.page_size = size;
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Ok(pages) = value.trim().trim_end_matches('.').parse::<u64>() else {
            continue;
        };
        match key.trim() {
            "Pages active" => stat.active = pages,
            "Pages wired down" => stat.wired = pages,
            "Pages occupied by compressor" => stat.compressed = pages,
            "Pages free" => stat.free = pages,
            _ => {}
        }
    }

    stat
}

/// Used memory is active + wired + compressed pages. When that is
/// implausible (zero or above total) it falls back to total minus free.
pub fn memory_from_vm_stat(total: u64, stat: &VmStat) -> MemoryStats {
    let page = stat.page_size;
    let used = (stat.active + stat.wired + stat.compressed).saturating_mul(page);
    let used = if used == 0 || used > total {
        total.saturating_sub(stat.free.saturating_mul(page))
    } else {
        used
    };
    MemoryStats::from_used(total, used)
}
