//! Command handlers and the shared wiring they run on.

pub mod auth;
pub mod config_cmd;
pub mod items;

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use aura_api::{CommandRunner, ProcessRunner, TransportConfig};
use aura_config::{Config, KeyringCredentialStore};
use aura_core::{
    CredentialStore, ProviderAdapter, ProviderKind, UnifiedView, ViewSnapshot, default_adapters,
};

use crate::cli::{GlobalOpts, OutputFormat, ProviderArg};
use crate::error::CliError;

/// Extra time granted on top of the HTTP timeout before giving up on a
/// view, covering `gh`/`az` subprocesses that have no timeout of their own.
const SETTLE_GRACE: Duration = Duration::from_secs(15);

/// Loaded config plus everything needed to build views from it.
pub struct Session {
    pub config: Config,
    pub transport: TransportConfig,
    pub credentials: Arc<dyn CredentialStore>,
    runner: Arc<dyn CommandRunner>,
}

impl Session {
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = aura_config::load_config()?;
        let mut transport = config.transport();
        if let Some(secs) = global.timeout {
            transport = transport.with_timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            config,
            transport,
            credentials: Arc::new(KeyringCredentialStore::new()),
            runner: Arc::new(ProcessRunner),
        })
    }

    /// Production adapters, restricted to `only` when non-empty.
    pub fn adapters(&self, only: &[ProviderArg]) -> Vec<Arc<dyn ProviderAdapter>> {
        default_adapters(&self.runner, &self.transport)
            .into_iter()
            .filter(|a| only.is_empty() || only.iter().any(|p| provider_kind(*p) == a.kind()))
            .collect()
    }

    /// How long to wait for a view to settle.
    pub fn deadline(&self) -> Duration {
        self.transport.timeout + SETTLE_GRACE
    }

    /// `--output`, then `defaults.output`, then table.
    pub fn output_format(&self, global: &GlobalOpts) -> OutputFormat {
        use clap::ValueEnum;

        global.output.unwrap_or_else(|| {
            OutputFormat::from_str(&self.config.defaults.output, true).unwrap_or(OutputFormat::Table)
        })
    }
}

/// Mount `view`, wait until every provider has checked auth and finished
/// fetching, then shut the view down.
pub async fn settle(
    view: &UnifiedView,
    deadline: Duration,
    spinner: &ProgressBar,
) -> Result<Arc<ViewSnapshot>, CliError> {
    let mut stream = view.subscribe();
    view.mount();

    let settled = tokio::time::timeout(deadline, stream.wait_until_settled()).await;
    spinner.finish_and_clear();
    view.shutdown().await;

    settled
        .map_err(|_| CliError::Timeout {
            seconds: deadline.as_secs(),
        })?
        .ok_or_else(|| CliError::Internal("view closed before settling".into()))
}

/// Stderr spinner, hidden for `--quiet` or when stderr is not a terminal.
pub fn spinner(global: &GlobalOpts, message: String) -> ProgressBar {
    use std::io::IsTerminal;

    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn provider_kind(arg: ProviderArg) -> ProviderKind {
    match arg {
        ProviderArg::Github => ProviderKind::GitHub,
        ProviderArg::Azure => ProviderKind::AzureDevOps,
        ProviderArg::Jira => ProviderKind::Jira,
        ProviderArg::Fogbugz => ProviderKind::FogBugz,
    }
}
