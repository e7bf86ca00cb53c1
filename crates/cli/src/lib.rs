pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "memebot",
    about = "Memebot operator CLI",
    long_about = "Apply migrations, inspect configuration, and talk to the responder chain from a terminal.",
    after_help = "Examples:\n  memebot migrate\n  memebot config\n  echo '/pika' | memebot console --ephemeral"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Dispatch stdin lines through the responder chain and print the replies")]
    Console {
        #[arg(long, default_value = "1", help = "Group id the messages appear to come from")]
        group: String,
        #[arg(long, default_value = "console", help = "Sender id attached to each message")]
        sender: String,
        #[arg(long, help = "Keep quotes in memory instead of the configured database")]
        ephemeral: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Console { group, sender, ephemeral } => {
            commands::console::run(commands::console::ConsoleOptions { group, sender, ephemeral })
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
