//! Per-executable process aggregation.

use std::collections::HashMap;

use super::types::{ProcessAggregate, ProcessSample};
use crate::error::Result;

pub const DEFAULT_PROCESS_LIMIT: usize = 20;

pub trait ProcessProbe: Send + Sync {
    fn snapshot(&self) -> Result<Vec<ProcessSample>>;
}

pub struct ProcessAggregator {
    probe: Box<dyn ProcessProbe>,
    limit: usize,
}

impl ProcessAggregator {
    pub fn new(probe: Box<dyn ProcessProbe>) -> Self {
        Self {
            probe,
            limit: DEFAULT_PROCESS_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Top processes by summed memory. Not cached; every call re-reads the
    /// process table.
    pub fn list(&self) -> Result<Vec<ProcessAggregate>> {
        let samples = self.probe.snapshot()?;
        log::trace!("Aggregating {} process samples", samples.len());
        Ok(aggregate_processes(samples, self.limit))
    }
}

/// Group samples by executable name, sum their resources, and keep the
/// `limit` largest by memory. Ties are ordered by name. PID 0 is skipped.
pub fn aggregate_processes(samples: Vec<ProcessSample>, limit: usize) -> Vec<ProcessAggregate> {
    let mut groups: HashMap<String, ProcessAggregate> = HashMap::new();

    for sample in samples.into_iter().filter(|s| s.pid != 0) {
        let name = executable_name(&sample.name);
        if name.is_empty() {
            continue;
        }
        let entry = groups.entry(name.to_string()).or_insert_with(|| ProcessAggregate {
            name: name.to_string(),
            count: 0,
            memory: 0,
            memory_mb: 0.0,
            cpu_time: 0.0,
        });
        entry.count += 1;
        entry.memory = entry.memory.saturating_add(sample.memory);
        if sample.cpu_time.is_finite() && sample.cpu_time > 0.0 {
            entry.cpu_time += sample.cpu_time;
        }
    }

    let mut aggregates: Vec<ProcessAggregate> = groups
        .into_values()
        .map(|mut agg| {
            agg.memory_mb = agg.memory as f64 / (1024.0 * 1024.0);
            agg
        })
        .collect();

    aggregates.sort_by(|a, b| b.memory.cmp(&a.memory).then_with(|| a.name.cmp(&b.name)));
    aggregates.truncate(limit);
    aggregates
}

/// Strip any directory prefix from a process name or command path.
pub fn executable_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}
