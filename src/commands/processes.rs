use anyhow::Result;
use clap::ArgMatches;

use super::print_json;
use crate::core::Agent;
use crate::ui::system_formatters;

pub fn execute(matches: &ArgMatches, agent: &Agent, human: bool) -> Result<()> {
    let mut processes = agent.list_processes()?;
    if let Some(&top) = matches.get_one::<usize>("top") {
        processes.truncate(top);
    }

    if human {
        system_formatters::print_processes(&processes);
        Ok(())
    } else {
        print_json(&processes)
    }
}
