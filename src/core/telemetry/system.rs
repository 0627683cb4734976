//! Composed views over all collectors.
//!
//! A failing collector degrades its own section to a zero value or an
//! empty list; it never fails the combined report.

use once_cell::sync::OnceCell;

use super::cpu::CpuCollector;
use super::disk::DiskCollector;
use super::gpu::GpuCollector;
use super::memory::MemoryCollector;
use super::process::ProcessAggregator;
use super::types::{DiskStats, GpuStats, MemoryStats, SystemInfo, SystemStats, SystemUsage};
use super::Probes;

/// Host identity facts that are not tied to one collector.
pub trait HostProbe: Send + Sync {
    fn hostname(&self) -> Option<String>;

    /// Seconds since boot.
    fn uptime(&self) -> u64;

    /// Platform identifier reported to consumers.
    fn platform(&self) -> &'static str {
        native_platform()
    }
}

/// Node-style platform names: `win32`, `darwin`, `linux`.
pub fn native_platform() -> &'static str {
    if cfg!(windows) {
        "win32"
    } else if cfg!(target_os = "macos") {
        "darwin"
    } else {
        "linux"
    }
}

pub struct Telemetry {
    pub cpu: CpuCollector,
    pub memory: MemoryCollector,
    pub gpu: GpuCollector,
    pub disks: DiskCollector,
    pub processes: ProcessAggregator,
    host: Box<dyn HostProbe>,
    hostname: OnceCell<String>,
}

impl Telemetry {
    pub fn new(probes: Probes) -> Self {
        Self {
            cpu: CpuCollector::new(probes.cpu),
            memory: MemoryCollector::new(probes.memory),
            gpu: GpuCollector::new(probes.gpu),
            disks: DiskCollector::new(probes.disk),
            processes: ProcessAggregator::new(probes.process),
            host: probes.host,
            hostname: OnceCell::new(),
        }
    }

    /// Build from already-constructed collectors, for callers that need
    /// custom clocks or limits.
    pub fn from_parts(
        cpu: CpuCollector,
        memory: MemoryCollector,
        gpu: GpuCollector,
        disks: DiskCollector,
        processes: ProcessAggregator,
        host: Box<dyn HostProbe>,
    ) -> Self {
        Self {
            cpu,
            memory,
            gpu,
            disks,
            processes,
            host,
            hostname: OnceCell::new(),
        }
    }

    /// The override when given, otherwise the OS hostname looked up once.
    pub fn hostname(&self, override_name: Option<&str>) -> String {
        if let Some(name) = override_name {
            return name.to_string();
        }
        self.hostname
            .get_or_init(|| self.host.hostname().unwrap_or_else(|| "unknown".to_string()))
            .clone()
    }

    pub fn platform(&self) -> &'static str {
        self.host.platform()
    }

    pub fn uptime(&self) -> u64 {
        self.host.uptime()
    }

    pub fn memory_or_zero(&self) -> MemoryStats {
        self.memory.stats().unwrap_or_else(|e| {
            log::warn!("Memory collection failed: {}", e);
            MemoryStats::default()
        })
    }

    pub fn disks_or_empty(&self) -> Vec<DiskStats> {
        self.disks.list().unwrap_or_else(|e| {
            log::warn!("Disk enumeration failed: {}", e);
            Vec::new()
        })
    }

    fn gpu_if(&self, gpu_enabled: bool) -> Option<GpuStats> {
        if gpu_enabled {
            self.gpu.stats()
        } else {
            None
        }
    }

    pub fn system_info(&self, hostname_override: Option<&str>, gpu_enabled: bool) -> SystemInfo {
        SystemInfo {
            hostname: self.hostname(hostname_override),
            platform: self.platform().to_string(),
            cpu: self.cpu.info(),
            gpu: self.gpu_if(gpu_enabled).map(|gpu| gpu.info()),
            memory: self.memory_or_zero().info(),
            disks: self.disks_or_empty().iter().map(DiskStats::info).collect(),
        }
    }

    pub fn system_usage(&self, gpu_enabled: bool) -> SystemUsage {
        SystemUsage {
            uptime: self.uptime(),
            cpu: self.cpu.info().usage(self.cpu.current_load()),
            memory: self.memory_or_zero().usage(),
            gpu: self.gpu_if(gpu_enabled).map(|gpu| gpu.usage()),
            disks: self.disks_or_empty().iter().map(DiskStats::usage).collect(),
        }
    }

    pub fn system_stats(&self, hostname_override: Option<&str>, gpu_enabled: bool) -> SystemStats {
        SystemStats {
            memory: self.memory_or_zero(),
            cpu: self.cpu.info().with_load(self.cpu.current_load()),
            gpu: self.gpu_if(gpu_enabled),
            disks: self.disks_or_empty(),
            uptime: self.uptime(),
            hostname: self.hostname(hostname_override),
            platform: self.platform().to_string(),
        }
    }
}
