//! Data structures reported by the telemetry collectors.
//!
//! Field names serialize in camelCase, which is the wire shape consumers
//! of the agent's JSON output expect.

use serde::{Deserialize, Serialize};

/// Static processor identity, resolved once per process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub manufacturer: String,
    pub brand: String,
    pub cores: usize,
    pub physical_cores: usize,
    /// Base clock in GHz, 0 when unknown.
    pub base_speed: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    pub current_load: f64,
    pub current_speed: f64,
    /// No backend reads die temperature yet; always 0.
    pub current_temp: f64,
}

/// Identity and load in one record, the older combined shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStats {
    pub manufacturer: String,
    pub brand: String,
    pub cores: usize,
    pub physical_cores: usize,
    pub speed: f64,
    pub current_load: f64,
}

impl CpuInfo {
    pub fn usage(&self, load: f64) -> CpuUsage {
        CpuUsage {
            current_load: load,
            current_speed: self.base_speed,
            current_temp: 0.0,
        }
    }

    pub fn with_load(self, load: f64) -> CpuStats {
        CpuStats {
            manufacturer: self.manufacturer,
            brand: self.brand,
            cores: self.cores,
            physical_cores: self.physical_cores,
            speed: self.base_speed,
            current_load: load,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub used: u64,
    pub free: u64,
    pub used_percent: f64,
}

impl MemoryStats {
    /// Build a snapshot from total and used bytes. `used` is capped at
    /// `total` and the percentage is clamped to [0, 100].
    pub fn from_used(total: u64, used: u64) -> Self {
        let used = used.min(total);
        Self {
            total,
            used,
            free: total - used,
            used_percent: percent_of(used, total),
        }
    }

    pub fn info(&self) -> MemoryInfo {
        MemoryInfo { total: self.total }
    }

    pub fn usage(&self) -> MemoryUsage {
        MemoryUsage {
            used: self.used,
            free: self.free,
            used_percent: self.used_percent,
        }
    }
}

/// GPU snapshot. Dynamic readings are absent when the backend cannot
/// report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuStats {
    pub vendor: String,
    pub model: String,
    /// Dedicated memory in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram: Option<u64>,
    /// Percent of VRAM in use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram_used: Option<f64>,
    /// Degrees Celsius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_gpu: Option<i64>,
    /// Percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_gpu: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    pub vendor: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpuUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilization_gpu: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_gpu: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vram_used: Option<f64>,
}

impl GpuStats {
    pub fn identity<V: Into<String>, M: Into<String>>(vendor: V, model: M) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            vram: None,
            vram_used: None,
            temperature_gpu: None,
            utilization_gpu: None,
        }
    }

    pub fn info(&self) -> GpuInfo {
        GpuInfo {
            vendor: self.vendor.clone(),
            model: self.model.clone(),
            vram: self.vram,
        }
    }

    pub fn usage(&self) -> GpuUsage {
        GpuUsage {
            utilization_gpu: self.utilization_gpu,
            temperature_gpu: self.temperature_gpu,
            vram_used: self.vram_used,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskStats {
    pub fs: String,
    #[serde(rename = "type")]
    pub fs_type: String,
    pub size: u64,
    pub used: u64,
    pub available: u64,
    pub used_percent: f64,
    pub mount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub fs: String,
    #[serde(rename = "type")]
    pub fs_type: String,
    pub size: u64,
    pub mount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsage {
    pub fs: String,
    pub used: u64,
    pub available: u64,
    pub used_percent: f64,
}

impl DiskStats {
    pub fn new(fs: String, fs_type: String, mount: String, size: u64, used: u64, available: u64) -> Self {
        Self {
            fs,
            fs_type,
            size,
            used,
            available,
            used_percent: percent_of(used, size),
            mount,
        }
    }

    pub fn info(&self) -> DiskInfo {
        DiskInfo {
            fs: self.fs.clone(),
            fs_type: self.fs_type.clone(),
            size: self.size,
            mount: self.mount.clone(),
        }
    }

    pub fn usage(&self) -> DiskUsage {
        DiskUsage {
            fs: self.fs.clone(),
            used: self.used,
            available: self.available,
            used_percent: self.used_percent,
        }
    }
}

/// One raw process as read from the OS, before grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    /// Resident memory in bytes.
    pub memory: u64,
    /// Accumulated CPU time in seconds.
    pub cpu_time: f64,
}

/// Processes sharing an executable name, summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessAggregate {
    pub name: String,
    pub count: usize,
    pub memory: u64,
    #[serde(rename = "memoryMB")]
    pub memory_mb: f64,
    /// Summed CPU seconds since each process started, not a rate.
    pub cpu_time: f64,
}

/// Static view of the host. `gpu` is null when no GPU was found or GPU
/// reporting is turned off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub hostname: String,
    pub platform: String,
    pub cpu: CpuInfo,
    pub gpu: Option<GpuInfo>,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemUsage {
    /// Seconds since boot.
    pub uptime: u64,
    pub cpu: CpuUsage,
    pub memory: MemoryUsage,
    pub gpu: Option<GpuUsage>,
    pub disks: Vec<DiskUsage>,
}

/// Combined snapshot kept for consumers of the older stats shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub memory: MemoryStats,
    pub cpu: CpuStats,
    pub gpu: Option<GpuStats>,
    pub disks: Vec<DiskStats>,
    pub uptime: u64,
    pub hostname: String,
    pub platform: String,
}

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    pub status: String,
    pub hostname: String,
    pub platform: String,
    pub version: String,
}

/// `part` as a percentage of `whole`, clamped to [0, 100]. A zero whole
/// yields 0.
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    clamp_percent(part as f64 / whole as f64 * 100.0)
}

/// Clamp to [0, 100], mapping NaN to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent_of(10, 0), 0.0);
        assert_eq!(percent_of(250, 500), 50.0);
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-3.0), 0.0);
        assert_eq!(clamp_percent(140.0), 100.0);
        assert_eq!(clamp_percent(f64::NAN), 0.0);
        assert_eq!(clamp_percent(42.5), 42.5);
    }

    #[test]
    fn test_memory_used_capped_at_total() {
        let mem = MemoryStats::from_used(1000, 1500);
        assert_eq!(mem.used, 1000);
        assert_eq!(mem.free, 0);
        assert_eq!(mem.used_percent, 100.0);
    }

    #[test]
    fn test_disk_json_shape() {
        let disk = DiskStats::new(
            "/dev/disk3s1".into(),
            "apfs".into(),
            "/".into(),
            500,
            250,
            250,
        );
        let json = serde_json::to_value(&disk).unwrap();
        assert_eq!(json["type"], "apfs");
        assert_eq!(json["usedPercent"], 50.0);
        assert_eq!(json["mount"], "/");

        let usage = serde_json::to_value(disk.usage()).unwrap();
        assert_eq!(usage["usedPercent"], 50.0);
        assert!(usage.get("mount").is_none());
        let info = serde_json::to_value(disk.info()).unwrap();
        assert_eq!(info["type"], "apfs");
        assert!(info.get("used").is_none());
    }

    #[test]
    fn test_gpu_projections_omit_missing_readings() {
        let mut gpu = GpuStats::identity("AMD", "Radeon RX 7800 XT");
        gpu.vram = Some(16384);

        let info = serde_json::to_value(gpu.info()).unwrap();
        assert_eq!(info["vram"], 16384);

        let usage = serde_json::to_value(gpu.usage()).unwrap();
        assert_eq!(usage, serde_json::json!({}));
    }

    #[test]
    fn test_cpu_views() {
        let info = CpuInfo {
            manufacturer: "AMD".into(),
            brand: "AMD Ryzen 9 7950X".into(),
            cores: 32,
            physical_cores: 16,
            base_speed: 4.5,
        };
        let usage = info.usage(37.5);
        assert_eq!(usage.current_load, 37.5);
        assert_eq!(usage.current_speed, 4.5);

        let stats = serde_json::to_value(info.with_load(37.5)).unwrap();
        assert_eq!(stats["speed"], 4.5);
        assert_eq!(stats["currentLoad"], 37.5);
        assert_eq!(stats["physicalCores"], 16);
    }

    #[test]
    fn test_process_json_shape() {
        let agg = ProcessAggregate {
            name: "chrome".into(),
            count: 3,
            memory: 600 * 1024 * 1024,
            memory_mb: 600.0,
            cpu_time: 15.0,
        };
        let json = serde_json::to_value(&agg).unwrap();
        assert_eq!(json["memoryMB"], 600.0);
        assert_eq!(json["cpuTime"], 15.0);
        assert_eq!(json["count"], 3);
    }
}
