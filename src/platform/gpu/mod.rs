//! GPU-specific platform code.
//!
//! Provides GPU backends for different vendors and tools. The native chain
//! is tried in order and the first backend that reports a device wins.

pub mod adapters;
mod nvidia_smi;
mod nvml;
mod rocm_smi;
mod system_profiler;

pub use adapters::{find_vendor_adapter, AdapterEnumerator, AdapterVendor, VendorAdapterBackend, VideoAdapter};
pub use nvidia_smi::{parse_nvidia_smi, NvidiaSmiBackend};
pub use nvml::NvmlBackend;
pub use rocm_smi::{parse_rocm_csv, parse_rocm_product_name, AmdBackend};
pub use system_profiler::{parse_profiler_json, parse_profiler_text, SystemProfilerBackend};

use crate::core::telemetry::gpu::GpuBackend;

/// Backends for this OS, in priority order:
///
/// - Windows: NVML, nvidia-smi, AMD (rocm-smi then WMI), Intel (WMI)
/// - macOS: nvidia-smi, system_profiler
/// - Linux: NVML, nvidia-smi, rocm-smi
pub fn native_backends() -> Vec<Box<dyn GpuBackend>> {
    #[cfg(windows)]
    {
        vec![
            Box::new(NvmlBackend::new()),
            Box::new(NvidiaSmiBackend),
            Box::new(AmdBackend::new(Some(Box::new(adapters::WmiAdapterEnumerator)))),
            Box::new(VendorAdapterBackend::new(
                AdapterVendor::Intel,
                Box::new(adapters::WmiAdapterEnumerator),
            )),
        ]
    }
    #[cfg(target_os = "macos")]
    {
        vec![Box::new(NvidiaSmiBackend), Box::new(SystemProfilerBackend)]
    }
    #[cfg(not(any(windows, target_os = "macos")))]
    {
        vec![
            Box::new(NvmlBackend::new()),
            Box::new(NvidiaSmiBackend),
            Box::new(AmdBackend::new(None)),
        ]
    }
}
