use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::debug;
use url::Url;

use aura_api::github::{GhCli, GitHubClient};
use aura_api::{CommandRunner, TransportConfig};

use super::{ProviderAdapter, RawItem};
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::model::{AuthStatus, ItemKind, ProviderKind};

/// GitHub through the `gh` CLI token and the REST API.
pub struct GitHubAdapter {
    gh: GhCli,
    transport: TransportConfig,
    base_url: Option<Url>,
}

impl GitHubAdapter {
    pub fn new(runner: Arc<dyn CommandRunner>, transport: TransportConfig) -> Self {
        Self {
            gh: GhCli::new(runner),
            transport,
            base_url: None,
        }
    }

    /// Point the REST client at a GitHub Enterprise (or test) endpoint.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    fn client(&self, token: &SecretString) -> Result<GitHubClient, aura_api::Error> {
        match &self.base_url {
            Some(url) => GitHubClient::new(url.clone(), token, &self.transport),
            None => GitHubClient::public(token, &self.transport),
        }
    }

    async fn username(&self, client: &GitHubClient) -> Result<String, aura_api::Error> {
        if let Some(name) = self.gh.username().await {
            return Ok(name);
        }
        debug!("gh auth status had no account line, asking the API");
        Ok(client.current_user().await?.login)
    }
}

#[async_trait]
impl ProviderAdapter for GitHubAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
    }

    async fn check_auth(&self, _config: Option<&ProviderConfig>) -> Option<AuthStatus> {
        let auth = self.gh.auth().await;
        debug!(
            available = auth.cli_available,
            authenticated = auth.authenticated,
            "gh auth probe"
        );
        Some(AuthStatus::Cli {
            reachable: auth.cli_available,
            authenticated: auth.authenticated,
            identity: auth.username,
        })
    }

    async fn fetch_items(
        &self,
        kind: ItemKind,
        _config: Option<&ProviderConfig>,
    ) -> Result<Vec<RawItem>, FetchError> {
        let token = self.gh.token().await?;
        let client = self.client(&token)?;

        let items = match kind {
            ItemKind::Issues => client.assigned_issues().await?,
            ItemKind::PullRequests => {
                let username = self.username(&client).await?;
                client.involved_pull_requests(&username).await?
            }
        };
        Ok(items.into_iter().map(RawItem::GitHub).collect())
    }
}
