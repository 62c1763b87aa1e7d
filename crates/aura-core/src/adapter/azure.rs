use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use aura_api::CommandRunner;
use aura_api::azure::AzCli;

use super::{ProviderAdapter, RawItem};
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::model::{AuthStatus, ItemKind, ProviderKind};

/// Azure DevOps through the `az` CLI and its configured defaults.
pub struct AzureDevOpsAdapter {
    az: AzCli,
}

impl AzureDevOpsAdapter {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            az: AzCli::new(runner),
        }
    }
}

#[async_trait]
impl ProviderAdapter for AzureDevOpsAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AzureDevOps
    }

    async fn check_auth(&self, _config: Option<&ProviderConfig>) -> Option<AuthStatus> {
        let auth = self.az.auth().await;
        debug!(
            available = auth.cli_available,
            logged_in = auth.logged_in,
            "az auth probe"
        );
        Some(AuthStatus::Cli {
            reachable: auth.cli_available,
            authenticated: auth.logged_in,
            identity: auth.user,
        })
    }

    async fn fetch_items(
        &self,
        kind: ItemKind,
        _config: Option<&ProviderConfig>,
    ) -> Result<Vec<RawItem>, FetchError> {
        let items = match kind {
            ItemKind::Issues => self
                .az
                .assigned_work_items()
                .await?
                .into_iter()
                .map(RawItem::AzureWorkItem)
                .collect(),
            ItemKind::PullRequests => self
                .az
                .active_pull_requests()
                .await?
                .into_iter()
                .map(RawItem::AzurePullRequest)
                .collect(),
        };
        Ok(items)
    }
}
