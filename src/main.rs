use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::*;
use std::path::PathBuf;

use cntrl::commands;
use cntrl::core::config::Config;
use cntrl::core::Agent;
use cntrl::CntrlError;

const EXIT_FAILURE: i32 = 1;
const EXIT_FORBIDDEN: i32 = 3;

fn kind_subcommands(cmd: Command, noun: &str) -> Command {
    cmd.subcommand(Command::new("cpu").about(format!("CPU {}", noun)))
        .subcommand(Command::new("memory").about(format!("Memory {}", noun)))
        .subcommand(Command::new("gpu").about(format!("GPU {}", noun)))
        .subcommand(Command::new("disk").about(format!("Disk {}", noun)))
}

fn build_cli() -> Command {
    Command::new("cntrl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Desktop agent: system telemetry, power and media control")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file to use instead of the default location")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("human")
                .short('H')
                .long("human")
                .help("Human-readable output instead of JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("status").about("Agent health check"))
        .subcommand(kind_subcommands(
            Command::new("system").about("Static system information (CPU, memory, GPU, disks)"),
            "identity",
        ))
        .subcommand(kind_subcommands(
            Command::new("usage").about("Live system usage"),
            "usage",
        ))
        .subcommand(
            Command::new("stats")
                .about("Combined system stats (use 'cntrl stats --help' for subcommands)")
                .subcommand(Command::new("memory").about("Memory stats"))
                .subcommand(Command::new("cpu").about("CPU identity and current load"))
                .subcommand(Command::new("gpu").about("GPU stats"))
                .subcommand(Command::new("disk").about("Physical volumes")),
        )
        .subcommand(
            Command::new("processes")
                .about("Processes grouped by executable, largest memory first")
                .arg(
                    Arg::new("top")
                        .short('n')
                        .long("top")
                        .value_name("N")
                        .help("Show at most N entries")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("power")
                .about("Request a power transition")
                .arg(
                    Arg::new("action")
                        .help("shutdown, restart, sleep or hibernate")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("media")
                .about("Media playback (use 'cntrl media --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("control")
                        .about("Send a media key")
                        .arg(
                            Arg::new("action")
                                .help("play, pause, next or prev")
                                .required(true)
                                .index(1),
                        ),
                )
                .subcommand(Command::new("status").about("Current playback state and track")),
        )
        .subcommand(
            Command::new("monitor")
                .about("Stream usage snapshots until Ctrl+C")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Milliseconds between snapshots")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("2000"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the config file location"))
                .subcommand(
                    Command::new("init").about("Write a default config file if none exists"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("bash, zsh, fish, powershell or elvish")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(Shell)),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    cntrl::init_logging(level);

    if let Err(e) = run(&matches) {
        let forbidden = e
            .downcast_ref::<CntrlError>()
            .is_some_and(CntrlError::is_forbidden);

        if forbidden {
            eprintln!("{} {}", "Forbidden:".red().bold(), e);
            std::process::exit(EXIT_FORBIDDEN);
        }
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config_file = matches.get_one::<PathBuf>("config");
    let human = matches.get_flag("human");

    match matches.subcommand() {
        Some(("config", sub_matches)) => {
            return commands::config::execute(sub_matches, config_file.map(PathBuf::as_path));
        }
        Some(("completions", sub_matches)) => {
            return commands::completions::execute(sub_matches, &mut build_cli());
        }
        _ => {}
    }

    let config = match config_file {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let agent = Agent::native(config);

    match matches.subcommand() {
        Some(("status", _)) => commands::status::execute(&agent, human),
        Some(("system", sub_matches)) => commands::system::execute(sub_matches, &agent, human),
        Some(("usage", sub_matches)) => commands::usage::execute(sub_matches, &agent, human),
        Some(("stats", sub_matches)) => commands::stats::execute(sub_matches, &agent, human),
        Some(("processes", sub_matches)) => {
            commands::processes::execute(sub_matches, &agent, human)
        }
        Some(("power", sub_matches)) => commands::power::execute(sub_matches, &agent, human),
        Some(("media", sub_matches)) => commands::media::execute(sub_matches, &agent, human),
        Some(("monitor", sub_matches)) => commands::monitor::execute(sub_matches, &agent, human),
        _ => {
            println!("Welcome to cntrl!");
            println!("Use 'cntrl --help' for more information.");
            Ok(())
        }
    }
}
