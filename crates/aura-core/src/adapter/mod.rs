// ── Provider adapters ──
//
// One adapter per tracker, each satisfying the same two-call contract so
// the orchestrator never branches on provider. Adapters never retry; retry
// policy belongs to the view and the user.

mod azure;
mod fogbugz;
mod github;
mod jira;

use std::sync::Arc;

use async_trait::async_trait;

use aura_api::{CommandRunner, TransportConfig};

use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::model::{AuthStatus, ItemKind, ProviderKind};

pub use azure::AzureDevOpsAdapter;
pub use fogbugz::FogBugzAdapter;
pub use github::GitHubAdapter;
pub use jira::JiraAdapter;

/// Provider-native item payload, before normalization.
#[derive(Debug, Clone)]
pub enum RawItem {
    /// Issue or pull request (same wire shape on GitHub).
    GitHub(aura_api::github::Issue),
    AzureWorkItem(aura_api::azure::WorkItem),
    AzurePullRequest(aura_api::azure::PullRequest),
    Jira(aura_api::jira::Issue),
    FogBugz(aura_api::fogbugz::Case),
}

impl RawItem {
    pub fn provider(&self) -> ProviderKind {
        match self {
            Self::GitHub(_) => ProviderKind::GitHub,
            Self::AzureWorkItem(_) | Self::AzurePullRequest(_) => ProviderKind::AzureDevOps,
            Self::Jira(_) => ProviderKind::Jira,
            Self::FogBugz(_) => ProviderKind::FogBugz,
        }
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Probe auth. Never fails: transport problems come back as `None` or
    /// as an invalid status.
    async fn check_auth(&self, config: Option<&ProviderConfig>) -> Option<AuthStatus>;

    /// The provider's complete current item set for `kind`. Views the
    /// provider does not feed yield an empty list.
    async fn fetch_items(
        &self,
        kind: ItemKind,
        config: Option<&ProviderConfig>,
    ) -> Result<Vec<RawItem>, FetchError>;
}

/// The production adapters, in registration order.
pub fn default_adapters(
    runner: &Arc<dyn CommandRunner>,
    transport: &TransportConfig,
) -> Vec<Arc<dyn ProviderAdapter>> {
    vec![
        Arc::new(GitHubAdapter::new(Arc::clone(runner), transport.clone())),
        Arc::new(AzureDevOpsAdapter::new(Arc::clone(runner))),
        Arc::new(JiraAdapter::new(transport.clone())),
        Arc::new(FogBugzAdapter::new(transport.clone())),
    ]
}
