use async_trait::async_trait;
use tracing::{debug, warn};

use aura_api::TransportConfig;
use aura_api::jira::JiraClient;

use super::{ProviderAdapter, RawItem};
use crate::config::{JiraConfig, ProviderConfig};
use crate::error::{CoreError, FetchError};
use crate::model::{AuthStatus, ItemKind, ProviderKind};

/// Jira REST v3 with email + API token.
pub struct JiraAdapter {
    transport: TransportConfig,
}

impl JiraAdapter {
    pub fn new(transport: TransportConfig) -> Self {
        Self { transport }
    }

    fn client(&self, config: &JiraConfig) -> Result<JiraClient, aura_api::Error> {
        JiraClient::new(
            config.instance_url.clone(),
            config.email.clone(),
            config.api_token.clone(),
            &self.transport,
        )
    }
}

fn jira_config(config: Option<&ProviderConfig>) -> Option<&JiraConfig> {
    match config? {
        ProviderConfig::Jira(c) => Some(c),
        ProviderConfig::FogBugz(_) => None,
    }
}

#[async_trait]
impl ProviderAdapter for JiraAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Jira
    }

    async fn check_auth(&self, config: Option<&ProviderConfig>) -> Option<AuthStatus> {
        let Some(config) = jira_config(config) else {
            return Some(AuthStatus::Credential {
                valid: false,
                identity: None,
            });
        };

        let result = match self.client(config) {
            Ok(client) => client.myself().await,
            Err(e) => Err(e),
        };
        match result {
            Ok(me) => Some(AuthStatus::Credential {
                valid: true,
                identity: me.display_name.or(me.email_address),
            }),
            Err(e) if e.is_auth() => {
                debug!(error = %e, "jira rejected credentials");
                Some(AuthStatus::Credential {
                    valid: false,
                    identity: None,
                })
            }
            Err(e) => {
                warn!(error = %e, "jira auth check failed");
                None
            }
        }
    }

    async fn fetch_items(
        &self,
        kind: ItemKind,
        config: Option<&ProviderConfig>,
    ) -> Result<Vec<RawItem>, FetchError> {
        if kind != ItemKind::Issues {
            return Ok(Vec::new());
        }
        let config = jira_config(config).ok_or(CoreError::NotConfigured {
            provider: ProviderKind::Jira,
        })?;

        let issues = self.client(config)?.assigned_issues().await?;
        Ok(issues.into_iter().map(RawItem::Jira).collect())
    }
}
