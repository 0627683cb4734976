use std::sync::Arc;
use std::time::Duration;

use super::cache::{Clock, SamplerCache, SystemClock};
use super::types::MemoryStats;
use crate::error::Result;

pub const MEMORY_TTL: Duration = Duration::from_millis(500);

pub trait MemoryProbe: Send + Sync {
    fn measure(&self) -> Result<MemoryStats>;
}

/// Physical memory snapshot, cached for [`MEMORY_TTL`].
pub struct MemoryCollector {
    probe: Box<dyn MemoryProbe>,
    cache: SamplerCache<MemoryStats>,
}

impl MemoryCollector {
    pub fn new(probe: Box<dyn MemoryProbe>) -> Self {
        Self::with_clock(probe, Arc::new(SystemClock))
    }

    pub fn with_clock(probe: Box<dyn MemoryProbe>, clock: Arc<dyn Clock>) -> Self {
        Self {
            probe,
            cache: SamplerCache::with_clock(MEMORY_TTL, clock),
        }
    }

    pub fn stats(&self) -> Result<MemoryStats> {
        let (stats, cached) = self.cache.get(|| self.probe.measure())?;
        if !cached {
            log::trace!("Memory sampled: {} / {} bytes", stats.used, stats.total);
        }
        Ok(stats)
    }
}
