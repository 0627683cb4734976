use anyhow::Result;
use clap::ArgMatches;

use super::{print_json, with_cpu_load};
use crate::core::Agent;
use crate::ui::system_formatters;

/// Live readings. A subcommand narrows them to one collector.
pub fn execute(matches: &ArgMatches, agent: &Agent, human: bool) -> Result<()> {
    let enabled = agent.config().features.enable_usage;
    match matches.subcommand() {
        Some(("cpu", _)) => {
            let cpu = with_cpu_load(agent, enabled, Agent::cpu_usage)?;
            if human {
                system_formatters::print_cpu_usage(&cpu);
                return Ok(());
            }
            print_json(&cpu)
        }
        Some(("memory", _)) => {
            let memory = agent.memory_usage()?;
            if human {
                system_formatters::print_memory_usage(&memory);
                return Ok(());
            }
            print_json(&memory)
        }
        Some(("gpu", _)) => {
            let gpu = agent.gpu_usage()?;
            if human {
                system_formatters::print_gpu_usage(gpu.as_ref());
                return Ok(());
            }
            print_json(&gpu)
        }
        Some(("disk", _)) => {
            let disks = agent.disk_usage()?;
            if human {
                system_formatters::print_disk_usage(&disks);
                return Ok(());
            }
            print_json(&disks)
        }
        _ => {
            let usage = with_cpu_load(agent, enabled, Agent::system_usage)?;
            if human {
                system_formatters::print_usage(&usage);
                return Ok(());
            }
            print_json(&usage)
        }
    }
}
