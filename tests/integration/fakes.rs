//! In-memory probes and actuators for driving an `Agent` without touching
//! the host.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cntrl::core::control::{MediaAction, MediaActuator, MediaStatus, PowerAction, PowerActuator};
use cntrl::core::telemetry::{
    CpuProbe, DiskProbe, DiskStats, GpuBackend, GpuStats, HostProbe, MemoryProbe, MemoryStats,
    ProcessProbe, ProcessSample, Probes, Telemetry,
};
use cntrl::{Agent, CntrlError, Config, Result};

pub struct FakeCpu {
    pub calls: Arc<AtomicUsize>,
}

impl CpuProbe for FakeCpu {
    fn brand(&self) -> Option<String> {
        Some("Intel(R) Core(TM) i7-9700K CPU @ 3.60GHz".to_string())
    }

    fn base_speed_ghz(&self) -> Option<f64> {
        Some(3.6)
    }

    fn physical_cores(&self) -> Option<usize> {
        Some(8)
    }

    fn logical_cores(&self) -> usize {
        8
    }

    fn sample_load(&self) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(25.0)
    }
}

pub struct FakeMemory {
    pub stats: Option<MemoryStats>,
    pub calls: Arc<AtomicUsize>,
}

impl MemoryProbe for FakeMemory {
    fn measure(&self) -> Result<MemoryStats> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stats
            .ok_or_else(|| CntrlError::metric_collection("vm_stat exited with status 1"))
    }
}

pub struct FakeGpu {
    pub stats: Option<GpuStats>,
    pub calls: Arc<AtomicUsize>,
}

impl GpuBackend for FakeGpu {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn detect(&self) -> Result<Option<GpuStats>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stats.clone())
    }
}

pub struct FakeDisks {
    pub disks: Option<Vec<DiskStats>>,
    pub calls: Arc<AtomicUsize>,
}

impl DiskProbe for FakeDisks {
    fn list(&self) -> Result<Vec<DiskStats>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.disks
            .clone()
            .ok_or_else(|| CntrlError::command_failed("df", "permission denied"))
    }
}

pub struct FakeProcesses {
    pub samples: Vec<ProcessSample>,
    pub calls: Arc<AtomicUsize>,
}

impl ProcessProbe for FakeProcesses {
    fn snapshot(&self) -> Result<Vec<ProcessSample>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.samples.clone())
    }
}

pub struct FakeHost;

impl HostProbe for FakeHost {
    fn hostname(&self) -> Option<String> {
        Some("ROG-GT502".to_string())
    }

    fn uptime(&self) -> u64 {
        3_600
    }

    fn platform(&self) -> &'static str {
        "linux"
    }
}

#[derive(Clone, Default)]
pub struct RecordingPower {
    pub issued: Arc<Mutex<Vec<PowerAction>>>,
}

impl PowerActuator for RecordingPower {
    fn execute(&self, action: PowerAction) -> Result<()> {
        self.issued.lock().unwrap().push(action);
        Ok(())
    }
}

#[derive(Clone)]
pub struct RecordingMedia {
    pub sent: Arc<Mutex<Vec<MediaAction>>>,
    pub status: MediaStatus,
    pub status_calls: Arc<AtomicUsize>,
}

impl MediaActuator for RecordingMedia {
    fn send(&self, action: MediaAction) -> Result<()> {
        self.sent.lock().unwrap().push(action);
        Ok(())
    }

    fn status(&self) -> Result<MediaStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.status.clone())
    }
}

/// What the fake host reports. `None` memory or disks make that probe fail.
pub struct FakeSystem {
    pub memory: Option<MemoryStats>,
    pub gpu: Option<GpuStats>,
    pub disks: Option<Vec<DiskStats>>,
    pub processes: Vec<ProcessSample>,
    pub media: MediaStatus,
}

impl Default for FakeSystem {
    fn default() -> Self {
        Self {
            memory: Some(MemoryStats::from_used(16 * GIB, 4 * GIB)),
            gpu: None,
            disks: Some(vec![DiskStats::new(
                "/dev/nvme0n1p2".to_string(),
                "ext4".to_string(),
                "/".to_string(),
                500,
                250,
                250,
            )]),
            processes: Vec::new(),
            media: MediaStatus::stopped(),
        }
    }
}

pub const GIB: u64 = 1024 * 1024 * 1024;

/// Call counters for every probe and actuator behind a test agent.
#[derive(Default)]
pub struct Calls {
    pub cpu: Arc<AtomicUsize>,
    pub memory: Arc<AtomicUsize>,
    pub gpu: Arc<AtomicUsize>,
    pub disks: Arc<AtomicUsize>,
    pub processes: Arc<AtomicUsize>,
    pub media_status: Arc<AtomicUsize>,
}

impl Calls {
    pub fn probes(&self) -> usize {
        [&self.cpu, &self.memory, &self.gpu, &self.disks, &self.processes]
            .iter()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

pub struct Harness {
    pub agent: Agent,
    pub calls: Calls,
    pub power: RecordingPower,
    pub media: RecordingMedia,
}

impl FakeSystem {
    pub fn build(self, config: Config) -> Harness {
        let calls = Calls::default();
        let power = RecordingPower::default();
        let media = RecordingMedia {
            sent: Arc::default(),
            status: self.media,
            status_calls: Arc::clone(&calls.media_status),
        };

        let telemetry = Telemetry::new(Probes {
            cpu: Arc::new(FakeCpu {
                calls: Arc::clone(&calls.cpu),
            }),
            memory: Box::new(FakeMemory {
                stats: self.memory,
                calls: Arc::clone(&calls.memory),
            }),
            gpu: vec![Box::new(FakeGpu {
                stats: self.gpu,
                calls: Arc::clone(&calls.gpu),
            })],
            disk: Box::new(FakeDisks {
                disks: self.disks,
                calls: Arc::clone(&calls.disks),
            }),
            process: Box::new(FakeProcesses {
                samples: self.processes,
                calls: Arc::clone(&calls.processes),
            }),
            host: Box::new(FakeHost),
        });

        let agent = Agent::new(
            config,
            telemetry,
            Box::new(power.clone()),
            Box::new(media.clone()),
        );

        Harness {
            agent,
            calls,
            power,
            media,
        }
    }
}

pub fn sample(pid: u32, name: &str, memory: u64, cpu_time: f64) -> ProcessSample {
    ProcessSample {
        pid,
        name: name.to_string(),
        memory,
        cpu_time,
    }
}
