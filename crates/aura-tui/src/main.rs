//! `aura-tui`: live terminal view of everything assigned to you.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `aura-core`'s [`ViewStream`](aura_core::ViewStream). Two tabs, Issues and
//! Pull Requests, each backed by its own [`UnifiedView`]. Switching tabs
//! drives the views' activation, so returning to a tab refreshes it.
//!
//! Logs are written to a file (default `<tmp>/aura-tui.log`) to avoid
//! corrupting the terminal UI. One data bridge task per view forwards
//! snapshots into the TUI action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use aura_api::{CommandRunner, ProcessRunner};
use aura_config::KeyringCredentialStore;
use aura_core::{CredentialStore, ItemKind, UnifiedView, default_adapters};

use crate::app::App;

/// Terminal view of your issues and pull requests across trackers.
#[derive(Parser, Debug)]
#[command(name = "aura-tui", version, about)]
struct Cli {
    /// Log file path (defaults to aura-tui.log in the temp directory)
    #[arg(long, env = "AURA_TUI_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "AURA_TIMEOUT")]
    timeout: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may be logged to stdout/stderr while the
/// terminal is in raw mode. The returned guard flushes on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("AURA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "aura_tui={log_level},aura_core={log_level},aura_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("aura-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("aura-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// One view per tab, sharing adapters and the credential store.
fn build_views(cli: &Cli) -> Vec<UnifiedView> {
    let config = aura_config::load_config_or_default();
    let mut transport = config.transport();
    if let Some(secs) = cli.timeout {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }

    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
    let adapters = default_adapters(&runner, &transport);
    let credentials: Arc<dyn CredentialStore> = Arc::new(KeyringCredentialStore::new());

    [ItemKind::Issues, ItemKind::PullRequests]
        .into_iter()
        .map(|kind| {
            UnifiedView::new(
                kind,
                adapters.iter().cloned(),
                Arc::clone(&credentials),
                config.sync_config(),
            )
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);
    info!(version = env!("CARGO_PKG_VERSION"), "starting aura-tui");

    let mut app = App::new(build_views(&cli));
    app.run().await?;

    Ok(())
}
