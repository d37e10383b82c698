// mixtape - Terminal playlist manager
// Ordered playlist with prev/next navigation, a history log of every
// navigation attempt, and rodio playback behind the cursor

mod audio;
mod config;
mod ui;

use anyhow::Result;
use clap::Parser;
use config::Config;
use std::fs;
use std::path::PathBuf;
use ui::App;

#[derive(Parser, Debug)]
#[command(name = "mixtape", about = "Terminal playlist manager")]
struct Cli {
    /// Use this config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "mixtape=debug"
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config - falls back to defaults if missing
    let config = match cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // The TUI owns stdout, so logs go to a daily-rotated file
    fs::create_dir_all(&config.log_directory)?;
    let file_appender = tracing_appender::rolling::daily(&config.log_directory, "mixtape.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cli.log))
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let mut app = App::new(config).await?;
    app.run().await?;

    Ok(())
}
