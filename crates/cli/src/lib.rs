pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use renoprop_core::config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "renoprop",
    about = "RenoProp proposal agent CLI",
    long_about = "Chat with the renovation proposal agent, publish drafted proposals, inspect configuration, and run readiness checks.",
    after_help = "Examples:\n  renoprop chat\n  renoprop publish --file draft.txt\n  renoprop doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive proposal conversation on stdin/stdout")]
    Chat,
    #[command(about = "Render proposal text to PDF and upload it, bypassing the drafting model")]
    Publish {
        #[arg(long, help = "Read proposal text from this file instead of stdin")]
        file: Option<PathBuf>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, credential readiness, and the PDF render pipeline")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub(crate) fn init_logging(config: &AppConfig) {
    use renoprop_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // try_init: commands run in-process during tests, so a second command
    // in the same process must not panic on the global subscriber.
    let result = match config.logging.format {
        Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().try_init()
        }
    };
    let _ = result;
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat => commands::chat::run(),
        Command::Publish { file } => commands::publish::run(file.as_deref()),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
