//! Hardware telemetry: collectors, caches and the background CPU sampler.
//!
//! OS-specific probes live in `crate::platform`; this module holds the
//! platform-neutral logic that composes them.

pub mod cache;
pub mod cpu;
pub mod disk;
pub mod gpu;
pub mod memory;
pub mod process;
pub mod sampler;
pub mod system;
pub mod types;

use std::sync::Arc;

pub use cache::{Clock, ManualClock, SamplerCache, SystemClock};
pub use cpu::{CpuCollector, CpuProbe};
pub use disk::{DiskCollector, DiskProbe};
pub use gpu::{GpuBackend, GpuCollector};
pub use memory::{MemoryCollector, MemoryProbe};
pub use process::{ProcessAggregator, ProcessProbe};
pub use sampler::{CpuLoadSampler, SamplerRuntime, DEFAULT_SAMPLE_INTERVAL};
pub use system::{HostProbe, Telemetry};
pub use types::*;

/// The set of OS probes a [`Telemetry`] instance is built from.
pub struct Probes {
    pub cpu: Arc<dyn CpuProbe>,
    pub memory: Box<dyn MemoryProbe>,
    pub gpu: Vec<Box<dyn GpuBackend>>,
    pub disk: Box<dyn DiskProbe>,
    pub process: Box<dyn ProcessProbe>,
    pub host: Box<dyn HostProbe>,
}
