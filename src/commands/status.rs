use anyhow::Result;

use super::print_json;
use crate::core::Agent;
use crate::ui::system_formatters;

pub fn execute(agent: &Agent, human: bool) -> Result<()> {
    let status = agent.status();
    if human {
        system_formatters::print_status(&status);
        Ok(())
    } else {
        print_json(&status)
    }
}
