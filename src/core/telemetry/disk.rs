use std::sync::Arc;
use std::time::Duration;

use super::cache::{Clock, SamplerCache, SystemClock};
use super::types::DiskStats;
use crate::error::Result;

pub const DEFAULT_DISK_TTL: Duration = Duration::from_secs(30);

pub trait DiskProbe: Send + Sync {
    /// Physical volumes currently mounted, in the OS's enumeration order.
    fn list(&self) -> Result<Vec<DiskStats>>;
}

pub struct DiskCollector {
    probe: Box<dyn DiskProbe>,
    cache: SamplerCache<Vec<DiskStats>>,
}

impl DiskCollector {
    pub fn new(probe: Box<dyn DiskProbe>) -> Self {
        Self::with_clock(probe, Arc::new(SystemClock))
    }

    pub fn with_clock(probe: Box<dyn DiskProbe>, clock: Arc<dyn Clock>) -> Self {
        Self {
            probe,
            cache: SamplerCache::with_clock(DEFAULT_DISK_TTL, clock),
        }
    }

    pub fn set_ttl(&self, ttl: Duration) {
        self.cache.set_ttl(ttl);
    }

    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    pub fn list(&self) -> Result<Vec<DiskStats>> {
        let (disks, cached) = self.cache.get(|| self.probe.list())?;
        if !cached {
            log::debug!("Enumerated {} disk volume(s)", disks.len());
        }
        Ok(disks)
    }
}

/// Whether a `df`-style (device, mount point) pair is a user-facing
/// physical volume.
///
/// Keeps block devices under `/dev/`, drops hidden mounts and the
/// system-managed volumes of a sealed macOS install (except the data
/// volume), and drops loop-mounted snap images.
pub fn is_physical_mount(device: &str, mount: &str) -> bool {
    if !device.starts_with("/dev/") || device.starts_with("/dev/loop") {
        return false;
    }
    if mount == "/System/Volumes/Data" {
        return true;
    }
    if mount.contains("/.") || mount.starts_with("/System/Volumes/") {
        return false;
    }
    !mount.starts_with("/snap/")
}
