//! Streams usage snapshots until interrupted.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::ArgMatches;
use colored::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::start_cpu_sampler;
use crate::core::telemetry::SystemUsage;
use crate::core::Agent;
use crate::ui::system_formatters;

const DEFAULT_INTERVAL_MS: u64 = 2000;
const POLL_SLICE: Duration = Duration::from_millis(100);

#[derive(Serialize)]
struct MonitorLine<'a> {
    timestamp: DateTime<Local>,
    #[serde(flatten)]
    usage: &'a SystemUsage,
}

pub fn execute(matches: &ArgMatches, agent: &Agent, human: bool) -> Result<()> {
    let interval = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or(DEFAULT_INTERVAL_MS)
        .max(100);
    let interval = Duration::from_millis(interval);

    // Fail fast on a disabled feature before sampling anything.
    agent.system_usage()?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let sampler = start_cpu_sampler(agent)?;
    if human {
        println!("{}", "Press Ctrl+C to stop".dimmed());
    }

    let result = stream(agent, interval, human, &running);
    sampler.shutdown();
    result
}

fn stream(agent: &Agent, interval: Duration, human: bool, running: &AtomicBool) -> Result<()> {
    while running.load(Ordering::Relaxed) {
        let started = Instant::now();
        let usage = agent.system_usage()?;
        let timestamp = Local::now();

        if human {
            print!("{} ", format!("[{}]", timestamp.format("%H:%M:%S")).dimmed());
            system_formatters::print_usage(&usage);
        } else {
            let line = MonitorLine {
                timestamp,
                usage: &usage,
            };
            println!(
                "{}",
                serde_json::to_string(&line).context("Failed to serialize usage")?
            );
        }

        while running.load(Ordering::Relaxed) && started.elapsed() < interval {
            std::thread::sleep(POLL_SLICE.min(interval.saturating_sub(started.elapsed())));
        }
    }
    Ok(())
}
