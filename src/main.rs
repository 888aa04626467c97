mod cli;

use std::fs::{self, OpenOptions};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use uichrome::data::{Database, SqliteSlot};
use uichrome::{util, Config};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.uichrome/logs/uichrome.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let config = Config::load();
    let database = Database::open_default()?;
    let slot = SqliteSlot::new(database.connection());

    let state = cli::run(&cli.command, &config, &slot, Arc::new(config.probe())).await?;
    println!("{}", serde_json::to_string_pretty(state.as_ref())?);

    Ok(())
}
