use anyhow::Result;
use clap::ArgMatches;

use super::print_json;
use crate::core::Agent;
use crate::ui::system_formatters;

/// Static host identity. A subcommand narrows it to one collector.
pub fn execute(matches: &ArgMatches, agent: &Agent, human: bool) -> Result<()> {
    match matches.subcommand() {
        Some(("cpu", _)) => {
            let cpu = agent.cpu_info()?;
            if human {
                system_formatters::print_cpu(&cpu);
                return Ok(());
            }
            print_json(&cpu)
        }
        Some(("memory", _)) => {
            let memory = agent.memory_info()?;
            if human {
                system_formatters::print_memory_info(&memory);
                return Ok(());
            }
            print_json(&memory)
        }
        Some(("gpu", _)) => {
            let gpu = agent.gpu_info()?;
            if human {
                system_formatters::print_gpu_info(gpu.as_ref());
                return Ok(());
            }
            print_json(&gpu)
        }
        Some(("disk", _)) => {
            let disks = agent.disk_info()?;
            if human {
                system_formatters::print_disk_info(&disks);
                return Ok(());
            }
            print_json(&disks)
        }
        _ => {
            let info = agent.system_info()?;
            if human {
                system_formatters::print_system_info(&info);
                return Ok(());
            }
            print_json(&info)
        }
    }
}
