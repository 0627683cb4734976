use std::sync::Arc;
use std::time::Duration;

use super::cache::{Clock, SamplerCache, SystemClock};
use super::types::GpuStats;
use crate::error::{CntrlError, Result};

pub const GPU_TTL: Duration = Duration::from_secs(2);

/// One way of discovering a GPU (vendor library, CLI tool, OS inventory).
///
/// Implementations are provided in the platform layer.
pub trait GpuBackend: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Cheap check that the backend can run at all here, e.g. that its
    /// tool is on PATH.
    fn is_available(&self) -> bool {
        true
    }

    /// `Ok(None)` means the backend ran and found no matching device.
    fn detect(&self) -> Result<Option<GpuStats>>;
}

/// Runs backends in priority order and caches the first hit.
pub struct GpuCollector {
    backends: Vec<Box<dyn GpuBackend>>,
    cache: SamplerCache<GpuStats>,
}

impl GpuCollector {
    pub fn new(backends: Vec<Box<dyn GpuBackend>>) -> Self {
        Self::with_clock(backends, Arc::new(SystemClock))
    }

    pub fn with_clock(backends: Vec<Box<dyn GpuBackend>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backends,
            cache: SamplerCache::with_clock(GPU_TTL, clock),
        }
    }

    /// The first GPU any backend reports, or `None`. A miss is not cached,
    /// so the next call probes again.
    pub fn stats(&self) -> Option<GpuStats> {
        match self.cache.get(|| self.probe_chain()) {
            Ok((stats, _)) => Some(stats),
            Err(e) => {
                log::debug!("{}", e);
                None
            }
        }
    }

    fn probe_chain(&self) -> Result<GpuStats> {
        for backend in &self.backends {
            if !backend.is_available() {
                log::trace!("GPU backend {} unavailable, skipping", backend.name());
                continue;
            }
            match backend.detect() {
                Ok(Some(stats)) => {
                    log::debug!("GPU detected via {}: {} {}", backend.name(), stats.vendor, stats.model);
                    return Ok(stats);
                }
                Ok(None) => log::trace!("GPU backend {} found no device", backend.name()),
                Err(e) => log::debug!("GPU backend {} failed: {}", backend.name(), e),
            }
        }
        Err(CntrlError::gpu_not_available("no backend reported a GPU"))
    }
}

/// Infer the vendor from a free-form adapter or chipset name.
pub fn vendor_from_model(model: &str) -> Option<&'static str> {
    let lower = model.to_lowercase();
    if lower.contains("apple") || ["m1", "m2", "m3", "m4"].iter().any(|chip| lower.contains(chip)) {
        Some("Apple")
    } else if lower.contains("nvidia") || lower.contains("geforce") || lower.contains("quadro") {
        Some("NVIDIA")
    } else if lower.contains("intel") {
        Some("Intel")
    } else if lower.contains("amd") || lower.contains("radeon") {
        Some("AMD")
    } else {
        None
    }
}

/// Parse strings like "8 GB" or "1536 MB" into megabytes.
pub fn parse_vram_mb(text: &str) -> Option<u64> {
    let upper = text.trim().to_uppercase();
    let (number, scale) = if let Some(idx) = upper.find("GB") {
        (&upper[..idx], 1024.0)
    } else if let Some(idx) = upper.find("MB") {
        (&upper[..idx], 1.0)
    } else {
        return None;
    };

    let value: f64 = number.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some((value * scale).round() as u64)
    } else {
        None
    }
}

/// Used-over-total VRAM as a percentage. A zero total yields 0.
pub fn vram_used_percent(used_mb: u64, total_mb: u64) -> Option<f64> {
    Some(super::types::percent_of(used_mb, total_mb))
}
