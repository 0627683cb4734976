//! Linux probes: procfs, `df`, systemd and MPRIS.

mod cpu;
mod media;
mod memory;

pub use cpu::{cpuinfo_field, parse_proc_stat, ProcCpuProbe};
pub use media::PlayerctlMedia;
pub use memory::{parse_meminfo, MeminfoProbe};
