#[cfg(feature = "nvml")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, Nvml};
#[cfg(feature = "nvml")]
use once_cell::sync::OnceCell;

use crate::core::telemetry::gpu::GpuBackend;
use crate::core::telemetry::GpuStats;
#[cfg(feature = "nvml")]
use crate::core::telemetry::gpu::vram_used_percent;
use crate::error::{CntrlError, Result};

#[cfg(feature = "nvml")]
const BYTES_PER_MB: u64 = 1024 * 1024;

/// NVIDIA GPU backend using NVML. Reports the first device.
///
/// The library is loaded on first use and kept for the life of the
/// process; a failed load is remembered so later calls skip it.
#[derive(Default)]
pub struct NvmlBackend {
    #[cfg(feature = "nvml")]
    nvml: OnceCell<Option<Nvml>>,
}

impl NvmlBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "nvml")]
    fn nvml(&self) -> Option<&Nvml> {
        self.nvml
            .get_or_init(|| match Nvml::init() {
                Ok(nvml) => Some(nvml),
                Err(e) => {
                    log::debug!("Failed to init NVML: {}", e);
                    None
                }
            })
            .as_ref()
    }
}

impl GpuBackend for NvmlBackend {
    fn name(&self) -> &'static str {
        "nvml"
    }

    fn is_available(&self) -> bool {
        #[cfg(feature = "nvml")]
        {
            self.nvml().is_some()
        }
        #[cfg(not(feature = "nvml"))]
        {
            false
        }
    }

    fn detect(&self) -> Result<Option<GpuStats>> {
        #[cfg(feature = "nvml")]
        {
            let nvml = self
                .nvml()
                .ok_or_else(|| CntrlError::gpu_not_available("NVML not loaded"))?;
            if nvml.device_count().unwrap_or(0) == 0 {
                return Ok(None);
            }

            let device = nvml.device_by_index(0).map_err(|e| {
                CntrlError::metric_collection(format!("Failed to get GPU device: {}", e))
            })?;

            let model = device
                .name()
                .unwrap_or_else(|_| "Unknown NVIDIA GPU".to_string());

            let memory = device.memory_info().ok();
            let total_mb = memory.as_ref().map(|m| m.total / BYTES_PER_MB);
            let used_mb = memory.as_ref().map(|m| m.used / BYTES_PER_MB);

            Ok(Some(GpuStats {
                vendor: "NVIDIA".to_string(),
                model,
                vram: total_mb,
                vram_used: match (used_mb, total_mb) {
                    (Some(used), Some(total)) => vram_used_percent(used, total),
                    _ => None,
                },
                temperature_gpu: device
                    .temperature(TemperatureSensor::Gpu)
                    .ok()
                    .map(i64::from),
                utilization_gpu: device.utilization_rates().ok().map(|u| i64::from(u.gpu)),
            }))
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(CntrlError::gpu_not_available("NVIDIA GPU support not enabled"))
        }
    }
}
