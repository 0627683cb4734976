//! macOS probes built on the stock command-line tools.

mod cpu;
mod media;
mod memory;

pub use cpu::{parse_top_idle, SysctlCpuProbe};
pub use media::{media_key_code, AppleScriptMedia};
pub use memory::{memory_from_vm_stat, parse_vm_stat, VmStat, VmStatProbe};
