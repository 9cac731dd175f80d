use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;
use vpn_profile_core::{ConfigManager, EventKind, StorePaths};

mod cli;
mod export_cmd;
mod profile_cmd;
mod run_cmd;
mod user_cmd;
mod user_profile_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let mut manager = ConfigManager::load(StorePaths::in_dir(&cli.dir));
    for kind in EventKind::ALL {
        manager.subscribe(kind, move || debug!(event = %kind, "store changed"));
    }

    match cli.command {
        Command::Profiles(cmd) => profile_cmd::run_profiles(cmd, &mut manager),
        Command::UserProfiles(cmd) => user_profile_cmd::run_user_profiles(cmd, &mut manager),
        Command::Users(cmd) => user_cmd::run_users(cmd, &mut manager),
        Command::Export(args) => export_cmd::run_export(args, &manager),
        Command::Run(args) => run_cmd::run_task(args, &manager),
    }
}

fn init_logging() -> Result<()> {
    let level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")
}
