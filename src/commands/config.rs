use crate::core::Config;
use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::path::{Path, PathBuf};

pub fn execute(matches: &ArgMatches, config_file: Option<&Path>) -> Result<()> {
    let path = resolve_path(config_file)?;

    match matches.subcommand() {
        Some(("show", _)) => {
            let config = Config::load_from(&path)?;
            let yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;
            print!("{}", yaml);
            Ok(())
        }
        Some(("path", _)) => {
            println!("{}", path.display());
            Ok(())
        }
        Some(("init", _)) => {
            if Config::create_default(&path)? {
                println!("{} {}", "Created".green().bold(), path.display());
            } else {
                println!(
                    "{} {} (left unchanged)",
                    "Exists".yellow().bold(),
                    path.display()
                );
            }
            Ok(())
        }
        _ => {
            println!("Use 'cntrl config --help' for more information.");
            Ok(())
        }
    }
}

fn resolve_path(config_file: Option<&Path>) -> Result<PathBuf> {
    match config_file {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::config_path(),
    }
}
