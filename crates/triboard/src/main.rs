use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use triboard::Action;
use triboard_exi::BaseboardConfig;

/// Talk to a baseboard backup store the way game firmware does.
#[derive(Parser)]
#[command(name = "triboard", version, about)]
struct Cli {
    /// Directory holding the per-session backup stores.
    #[arg(long, default_value = ".")]
    user_dir: PathBuf,
    /// Session identifier, usually the game ID.
    #[arg(long)]
    session_id: String,
    #[command(subcommand)]
    action: Action,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = BaseboardConfig::builder()
        .user_dir(cli.user_dir)
        .session_id(cli.session_id)
        .build();
    triboard::run(&config, cli.action)
}
