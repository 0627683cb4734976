//! Background CPU load sampling.
//!
//! A single task samples load on a fixed period and publishes the value to
//! the collector's watch channel. Readers never block on a measurement.

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::cpu::{CpuCollector, CpuProbe};
use super::types::clamp_percent;

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

/// Handle to a running load sampler task.
pub struct CpuLoadSampler {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl CpuLoadSampler {
    /// Spawn the sampler on an existing runtime.
    pub fn spawn(handle: &Handle, cpu: &CpuCollector, period: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let task = handle.spawn(cpu_load_task(
            cpu.probe(),
            cpu.load_publisher(),
            period,
            shutdown_rx,
        ));
        Self { shutdown_tx, task }
    }

    /// Ask the task to stop after its current sample.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Stop and wait for the task to finish.
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            log::warn!("CPU sampler task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Owns a small Tokio runtime dedicated to background sampling, for
/// callers that are not async themselves.
pub struct SamplerRuntime {
    sampler: CpuLoadSampler,
    runtime: tokio::runtime::Runtime,
}

impl SamplerRuntime {
    pub fn start(cpu: &CpuCollector, period: Duration) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("cntrl-sampler")
            .build()?;

        let sampler = CpuLoadSampler::spawn(runtime.handle(), cpu, period);
        log::debug!("CPU sampler started with period {:?}", period);

        Ok(Self { sampler, runtime })
    }

    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    pub fn shutdown(self) {
        self.sampler.stop();
        self.runtime.shutdown_timeout(Duration::from_secs(1));
        log::debug!("CPU sampler stopped");
    }
}

async fn cpu_load_task(
    probe: Arc<dyn CpuProbe>,
    publisher: Arc<watch::Sender<f64>>,
    period: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let probe = Arc::clone(&probe);
                let load = match tokio::task::spawn_blocking(move || probe.sample_load()).await {
                    Ok(Ok(load)) => clamp_percent(load),
                    Ok(Err(e)) => {
                        log::debug!("CPU load sample failed: {}", e);
                        0.0
                    }
                    Err(e) => {
                        log::warn!("CPU load sampling panicked: {}", e);
                        0.0
                    }
                };
                publisher.send_replace(load);
            }
            _ = shutdown.recv() => {
                break;
            }
        }
    }
}
