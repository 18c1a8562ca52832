mod commands;
mod output;

use clap::{Parser, Subcommand};
use color_eyre::Result;

#[derive(Parser, Debug)]
#[command(
    name = "relnotify",
    about = "Report release events from a build pipeline to a monitoring service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a release event
    Send(commands::send::SendArgs),
    /// Check the notifier configuration file
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    match cli.command {
        Command::Send(args) => commands::send::execute(args).await,
        Command::Check(args) => commands::check::execute(args),
    }
}
