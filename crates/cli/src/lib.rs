pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "samalook",
    about = "SamaLook catalog operator CLI",
    long_about = "Inspect configuration, check catalog storage readiness, seed demo products, and dump the catalog.",
    after_help = "Examples:\n  samalook doctor --json\n  samalook config\n  samalook seed\n  samalook list"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate config, catalog document readability, and storage writability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Load one demo product per category into an empty catalog")]
    Seed,
    #[command(about = "Print the catalog as pretty JSON")]
    List,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Seed => commands::seed::run(),
        Command::List => commands::list::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
