//! Homework bot CLI
//!
//! Command-line interface for the Practicum review status notifier.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use homework_bot::config::{
    load_env_file, PRACTICUM_TOKEN_ENV, TELEGRAM_CHAT_ID_ENV, TELEGRAM_TOKEN_ENV,
};
use homework_bot::{load_config, Config, Credentials};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Relays Practicum homework review statuses to Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path (overrides config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = parse_log_level)]
    log_level: Level,

    /// Practicum OAuth token
    #[arg(long, env = PRACTICUM_TOKEN_ENV, hide_env_values = true)]
    practicum_token: Option<String>,

    /// Telegram bot token
    #[arg(long, env = TELEGRAM_TOKEN_ENV, hide_env_values = true)]
    telegram_token: Option<String>,

    /// Telegram chat to notify
    #[arg(long, env = TELEGRAM_CHAT_ID_ENV, hide_env_values = true)]
    telegram_chat_id: Option<String>,
}

fn parse_log_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid log level: {}. Use: trace, debug, info, warn, error",
            s
        )
    })
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Log to stdout and, when configured, to an append-only file
fn init_logging(level: Level, file: Option<&Path>) -> std::io::Result<()> {
    let file_layer = file
        .map(open_log_file)
        .transpose()?
        .map(|f| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(f))
        });

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Must run before parsing so clap's env bindings see the `.env` values
    let env_file = load_env_file(None);
    let args = Args::parse();

    let mut config = if let Some(config_path) = &args.config {
        load_config(config_path)?
    } else {
        Config::default()
    };

    if let Some(log_file) = args.log_file {
        config.logging.file = Some(log_file);
    }

    init_logging(args.log_level, config.logging.file.as_deref())?;

    tracing::debug!(
        "Parsed command line arguments: config={:?}, log_file={:?}, log_level={:?}",
        args.config,
        config.logging.file,
        args.log_level
    );
    if let Some(env_file) = &env_file {
        tracing::debug!("Loaded environment from {:?}", env_file);
    }

    let credentials = match Credentials::resolve(
        args.practicum_token,
        args.telegram_token,
        args.telegram_chat_id,
    ) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("{}. Shutting down.", e);
            return Err(e.into());
        }
    };

    tracing::info!("Starting homework bot");
    tracing::info!("Endpoint: {}", config.practicum.endpoint);
    tracing::info!(
        "Retry interval: {}s",
        config.polling.retry_interval_seconds
    );

    homework_bot::run(config, credentials).await?;

    Ok(())
}
