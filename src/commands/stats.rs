use anyhow::Result;
use clap::ArgMatches;

use super::{print_json, with_cpu_load};
use crate::core::Agent;
use crate::ui::system_formatters;

/// `stats` with no subcommand prints the combined snapshot; `memory`,
/// `cpu`, `gpu` and `disk` print one collector.
pub fn execute(matches: &ArgMatches, agent: &Agent, human: bool) -> Result<()> {
    let enabled = agent.config().features.enable_stats;
    match matches.subcommand() {
        Some(("memory", _)) => {
            let memory = agent.memory_stats()?;
            if human {
                system_formatters::print_memory(&memory);
                return Ok(());
            }
            print_json(&memory)
        }
        Some(("cpu", _)) => {
            let cpu = with_cpu_load(agent, enabled, Agent::cpu_stats)?;
            if human {
                system_formatters::print_cpu_stats(&cpu);
                return Ok(());
            }
            print_json(&cpu)
        }
        Some(("gpu", _)) => {
            let gpu = agent.gpu_stats()?;
            if human {
                system_formatters::print_gpu(gpu.as_ref());
                return Ok(());
            }
            print_json(&gpu)
        }
        Some(("disk", _)) => {
            let disks = agent.list_disks()?;
            if human {
                system_formatters::print_disks(&disks);
                return Ok(());
            }
            print_json(&disks)
        }
        _ => {
            let stats = with_cpu_load(agent, enabled, Agent::system_stats)?;
            if human {
                system_formatters::print_system_stats(&stats);
                return Ok(());
            }
            print_json(&stats)
        }
    }
}
