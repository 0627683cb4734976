use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;

use super::print_json;
use crate::core::control::PowerAction;
use crate::core::Agent;

pub fn execute(matches: &ArgMatches, agent: &Agent, human: bool) -> Result<()> {
    let action: PowerAction = matches
        .get_one::<String>("action")
        .context("Power action is required")?
        .parse()?;

    agent.issue_power(action)?;

    if human {
        println!("{} {}", "Requested".green().bold(), action);
        Ok(())
    } else {
        print_json(&serde_json::json!({ "status": "ok" }))
    }
}
