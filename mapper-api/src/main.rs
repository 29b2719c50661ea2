mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use mapper_core::logger::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");

    let cli = Cli::parse();
    let cfg = cli.load_config()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cli::serve_command(cfg).await,
        Commands::Sync => cli::sync_command(cfg).await,
        Commands::Map {
            game_version,
            input,
            output,
        } => cli::map_command(cfg, game_version, input, output).await,
    }
}
