mod config_cmd;
mod discover;
mod inputs;
mod process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config_cmd::ConfigCommands;
use crate::inputs::ProcessArgs;

#[derive(Debug, Parser)]
#[command(name = "caba")]
#[command(about = "Turn cab booking PDF receipts into a Cab-Usage spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract trips from every PDF in a directory and fill the template
    Process(ProcessArgs),
    /// Inspect or edit the saved settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = caba_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Process(args)) => process::run_process(&config, args).await?,
        Some(Commands::Config { command }) => config_cmd::run_config(&config, command)?,
        None => println!("caba: run `caba process` to convert receipts, or `caba --help`"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
