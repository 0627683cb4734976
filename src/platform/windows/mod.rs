//! Windows probes: registry, Win32 APIs and WMI.

mod cpu;
mod disk;
mod media;
mod memory;

pub use cpu::RegistryCpuProbe;
pub use disk::{drive_letters, FixedDriveProbe};
pub use media::KeyboardMedia;
pub use memory::GlobalMemoryProbe;
