// Storefront - terminal shop client
//
// Without a subcommand this runs the terminal UI; session and catalog
// subcommands run headless against the same composition root.
//
// Architecture:
// - Storefront (app.rs): session, notifications, routing, forms
// - AuthClient (reqwest): POST /api/login and /api/register
// - FileStore: JSON file standing in for browser local storage
// - TUI (ratatui): renders the resolved view, toast and footer

use anyhow::{Context, Result};
use clap::Parser;
use storefront::app::Storefront;
use storefront::auth::AuthClient;
use storefront::catalog::Catalog;
use storefront::cli::{self, Cli, Commands};
use storefront::config::{Config, LogRotation};
use storefront::logging::{CaptureLayer, LogBuffer};
use storefront::notification::NotificationChannel;
use storefront::session::SessionStore;
use storefront::storage::FileStore;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the tracing subscriber
///
/// In TUI mode events go to `log_buffer` so they never garble the screen;
/// headless they go to stderr. File logging adds a JSON layer on top. The
/// returned guard must live until exit so buffered file logs flush.
///
/// Precedence: RUST_LOG env var > config file > default "info"
fn init_tracing(config: &Config, tui: bool, log_buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!("storefront={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let screen_layer = if tui {
        CaptureLayer::new(log_buffer.clone()).boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    let mut guard = None;
    let file_layer = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let dir = &config.logging.file_dir;
                let prefix = &config.logging.file_prefix;
                let appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
                    LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
                };
                let (non_blocking, file_guard) = tracing_appender::non_blocking(appender);
                guard = Some(file_guard);
                Some(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {}: {}",
                    config.logging.file_dir.display(),
                    e
                );
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(screen_layer)
        .with(file_layer)
        .init();

    guard
}

/// Wire storage, session, catalog and client into a mounted root
fn build_storefront(config: &Config) -> Result<Storefront> {
    let client = AuthClient::new(&config.api_url, config.request_timeout())?;
    let store = FileStore::open(&config.storage_path)?;
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::bundled()?,
    };
    let notifications = NotificationChannel::with_duration(config.notification_duration());

    Ok(Storefront::new(
        client,
        SessionStore::new(store),
        catalog,
        notifications,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config { show, reset, path }) = &cli.command {
        return cli::handle_config(*show, *reset, *path);
    }

    Config::ensure_config_exists();
    let config = Config::from_env();

    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, cli.command.is_none(), &log_buffer);

    tracing::debug!(
        api_url = %config.api_url,
        storage = %config.storage_path.display(),
        "Configuration loaded"
    );

    let mut app = build_storefront(&config).context("Failed to start storefront")?;

    match cli.command {
        Some(command) => {
            let mut stdout = std::io::stdout();
            cli::run_command(command, &mut app, &mut stdout).await?;
        }
        None => {
            tracing::info!("Starting TUI");
            storefront::tui::run_tui(app, log_buffer).await?;
        }
    }

    tracing::debug!("Shutdown complete");
    Ok(())
}
