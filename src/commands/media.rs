use anyhow::{Context, Result};
use clap::ArgMatches;

use super::print_json;
use crate::core::Agent;
use crate::ui::system_formatters;

pub fn execute(matches: &ArgMatches, agent: &Agent, human: bool) -> Result<()> {
    match matches.subcommand() {
        Some(("control", sub_matches)) => {
            let action = sub_matches
                .get_one::<String>("action")
                .context("Media action is required")?;
            agent.control_media_str(action)?;

            if human {
                println!("Sent {}", action);
                Ok(())
            } else {
                print_json(&serde_json::json!({ "result": "success" }))
            }
        }
        Some(("status", _)) => {
            let status = agent.media_status()?;
            if human {
                system_formatters::print_media_status(&status);
                Ok(())
            } else {
                print_json(&status)
            }
        }
        _ => {
            println!("Use 'cntrl media --help' for more information.");
            Ok(())
        }
    }
}
