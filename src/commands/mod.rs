// Command handlers module
pub mod completions;
pub mod config;
pub mod media;
pub mod monitor;
pub mod power;
pub mod processes;
pub mod stats;
pub mod status;
pub mod system;
pub mod usage;

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

use crate::core::telemetry::{SamplerRuntime, DEFAULT_SAMPLE_INTERVAL};
use crate::core::Agent;

const FIRST_SAMPLE_TIMEOUT: Duration = Duration::from_secs(3);

/// Pretty JSON on stdout, the default output of every read command.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Run `read` with the CPU sampler running, so a one-shot command does not
/// report the initial 0. Nothing is sampled when the feature is disabled.
pub fn with_cpu_load<T, F>(agent: &Agent, enabled: bool, read: F) -> Result<T>
where
    F: FnOnce(&Agent) -> crate::Result<T>,
{
    if !enabled {
        return Ok(read(agent)?);
    }
    let sampler = start_cpu_sampler(agent)?;
    let value = read(agent);
    sampler.shutdown();
    Ok(value?)
}

/// Start background CPU sampling and wait for its first reading.
pub fn start_cpu_sampler(agent: &Agent) -> Result<SamplerRuntime> {
    let cpu = &agent.telemetry().cpu;
    let mut first = cpu.subscribe_load();
    let sampler = SamplerRuntime::start(cpu, DEFAULT_SAMPLE_INTERVAL)
        .context("Failed to start CPU sampler")?;

    let ready = sampler
        .handle()
        .block_on(async { tokio::time::timeout(FIRST_SAMPLE_TIMEOUT, first.changed()).await });
    if !matches!(ready, Ok(Ok(()))) {
        log::debug!("No CPU sample within {:?}, reporting 0", FIRST_SAMPLE_TIMEOUT);
    }

    Ok(sampler)
}
