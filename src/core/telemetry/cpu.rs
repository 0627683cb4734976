//! CPU identity and load.
//!
//! Identity is read once and kept for the life of the process. Load comes
//! from the background sampler (see [`super::sampler`]) which publishes
//! into a watch channel owned by the collector.

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::watch;

use super::types::{clamp_percent, CpuInfo};
use crate::error::Result;

pub const UNKNOWN_BRAND: &str = "Unknown Processor";
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

/// OS-specific source of CPU facts.
pub trait CpuProbe: Send + Sync {
    /// Marketing name, `None` when the OS does not expose one.
    fn brand(&self) -> Option<String>;

    /// Base clock in GHz.
    fn base_speed_ghz(&self) -> Option<f64>;

    fn physical_cores(&self) -> Option<usize>;

    fn logical_cores(&self) -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Brand and manufacturer reported when `brand()` has nothing.
    fn fallback_identity(&self) -> (&'static str, &'static str) {
        (UNKNOWN_BRAND, UNKNOWN_MANUFACTURER)
    }

    /// Measure system-wide load in percent. May block for the length of
    /// the sampling window.
    fn sample_load(&self) -> Result<f64>;
}

/// Map a brand string to its manufacturer by substring.
pub fn classify_manufacturer(brand: &str) -> &'static str {
    let lower = brand.to_lowercase();
    if lower.contains("intel") {
        "Intel"
    } else if lower.contains("apple") {
        "Apple"
    } else if lower.contains("amd") {
        "AMD"
    } else {
        UNKNOWN_MANUFACTURER
    }
}

/// Cumulative idle/total counters read from the OS at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuCounters {
    pub idle: u64,
    pub total: u64,
}

/// Load between two counter readings. A zero total delta yields 0.
pub fn load_between(prev: CpuCounters, next: CpuCounters) -> f64 {
    let total = next.total.saturating_sub(prev.total);
    if total == 0 {
        return 0.0;
    }
    let idle = next.idle.saturating_sub(prev.idle);
    clamp_percent((1.0 - idle as f64 / total as f64) * 100.0)
}

pub struct CpuCollector {
    probe: Arc<dyn CpuProbe>,
    identity: OnceCell<CpuInfo>,
    load: Arc<watch::Sender<f64>>,
}

impl CpuCollector {
    pub fn new(probe: Arc<dyn CpuProbe>) -> Self {
        let (load, _) = watch::channel(0.0);
        Self {
            probe,
            identity: OnceCell::new(),
            load: Arc::new(load),
        }
    }

    /// CPU identity, computed on first use.
    pub fn info(&self) -> CpuInfo {
        self.identity.get_or_init(|| resolve_identity(self.probe.as_ref())).clone()
    }

    /// Most recent load published by the sampler, 0 before the first sample.
    pub fn current_load(&self) -> f64 {
        *self.load.borrow()
    }

    pub fn subscribe_load(&self) -> watch::Receiver<f64> {
        self.load.subscribe()
    }

    pub(crate) fn probe(&self) -> Arc<dyn CpuProbe> {
        Arc::clone(&self.probe)
    }

    pub(crate) fn load_publisher(&self) -> Arc<watch::Sender<f64>> {
        Arc::clone(&self.load)
    }
}

fn resolve_identity(probe: &dyn CpuProbe) -> CpuInfo {
    let cores = probe.logical_cores().max(1);
    let physical_cores = match probe.physical_cores() {
        Some(n) if n > 0 => n,
        _ => cores,
    };

    let (brand, manufacturer) = match probe.brand().map(|b| b.trim().to_string()) {
        Some(brand) if !brand.is_empty() => {
            let manufacturer = classify_manufacturer(&brand).to_string();
            (brand, manufacturer)
        }
        _ => {
            let (brand, manufacturer) = probe.fallback_identity();
            (brand.to_string(), manufacturer.to_string())
        }
    };

    let base_speed = probe
        .base_speed_ghz()
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(0.0);

    log::debug!(
        "CPU identity resolved: {} ({}), {} cores / {} physical, {:.2} GHz",
        brand,
        manufacturer,
        cores,
        physical_cores,
        base_speed
    );

    CpuInfo {
        manufacturer,
        brand,
        cores,
        physical_cores,
        base_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeCpu {
        brand: Option<&'static str>,
        physical: Option<usize>,
        brand_reads: AtomicUsize,
    }

    impl CpuProbe for FakeCpu {
        fn brand(&self) -> Option<String> {
            self.brand_reads.fetch_add(1, Ordering::SeqCst);
            self.brand.map(String::from)
        }
        fn base_speed_ghz(&self) -> Option<f64> {
            Some(3.2)
        }
        fn physical_cores(&self) -> Option<usize> {
            self.physical
        }
        fn logical_cores(&self) -> usize {
            16
        }
        fn sample_load(&self) -> Result<f64> {
            Ok(12.0)
        }
    }

    fn fake(brand: Option<&'static str>, physical: Option<usize>) -> Arc<FakeCpu> {
        Arc::new(FakeCpu {
            brand,
            physical,
            brand_reads: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_classify_manufacturer() {
        assert_eq!(classify_manufacturer("Intel(R) Core(TM) i7-9750H"), "Intel");
        assert_eq!(classify_manufacturer("Apple M2 Pro"), "Apple");
        assert_eq!(classify_manufacturer("AMD Ryzen 9 7950X"), "AMD");
        assert_eq!(classify_manufacturer("Qualcomm Snapdragon X"), "Unknown");
    }

    #[test]
    fn test_identity_resolved_once() {
        let probe = fake(Some("AMD Ryzen 7 5800X"), Some(8));
        let collector = CpuCollector::new(probe.clone());

        let first = collector.info();
        let second = collector.info();
        assert_eq!(first, second);
        assert_eq!(first.manufacturer, "AMD");
        assert_eq!(first.cores, 16);
        assert_eq!(first.physical_cores, 8);
        assert_eq!(probe.brand_reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_identity_fallbacks() {
        let collector = CpuCollector::new(fake(None, Some(0)));
        let info = collector.info();
        assert_eq!(info.brand, UNKNOWN_BRAND);
        assert_eq!(info.manufacturer, UNKNOWN_MANUFACTURER);
        // physical cores fall back to the logical count
        assert_eq!(info.physical_cores, 16);
    }

    #[test]
    fn test_load_between() {
        let prev = CpuCounters { idle: 100, total: 200 };
        let next = CpuCounters { idle: 150, total: 300 };
        assert_eq!(load_between(prev, next), 50.0);
    }

    #[test]
    fn test_load_between_zero_delta() {
        let c = CpuCounters { idle: 10, total: 10 };
        assert_eq!(load_between(c, c), 0.0);
    }

    #[test]
    fn test_load_between_clamps() {
        // counters that went backwards must not produce a negative load
        let prev = CpuCounters { idle: 500, total: 1000 };
        let next = CpuCounters { idle: 400, total: 1100 };
        assert_eq!(load_between(prev, next), 100.0);
    }

    #[test]
    fn test_load_is_zero_before_first_sample() {
        let collector = CpuCollector::new(fake(Some("Apple M1"), Some(8)));
        assert_eq!(collector.current_load(), 0.0);
    }
}
