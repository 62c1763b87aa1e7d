use async_trait::async_trait;
use tracing::{debug, warn};

use aura_api::TransportConfig;
use aura_api::fogbugz::FogBugzClient;

use super::{ProviderAdapter, RawItem};
use crate::config::{FogBugzConfig, ProviderConfig};
use crate::error::{CoreError, FetchError};
use crate::model::{AuthStatus, ItemKind, ProviderKind};

/// FogBugz JSON API; every call logs on first.
pub struct FogBugzAdapter {
    transport: TransportConfig,
}

impl FogBugzAdapter {
    pub fn new(transport: TransportConfig) -> Self {
        Self { transport }
    }

    fn client(&self, config: &FogBugzConfig) -> Result<FogBugzClient, aura_api::Error> {
        FogBugzClient::new(
            config.instance_url.clone(),
            config.email.clone(),
            config.password.clone(),
            &self.transport,
        )
    }

    async fn identity(&self, config: &FogBugzConfig) -> Result<Option<String>, aura_api::Error> {
        let client = self.client(config)?;
        let token = client.logon().await?;
        let person = client.view_person(&token).await?;
        Ok(person.and_then(|p| p.full_name).or_else(|| Some(config.email.clone())))
    }
}

fn fogbugz_config(config: Option<&ProviderConfig>) -> Option<&FogBugzConfig> {
    match config? {
        ProviderConfig::FogBugz(c) => Some(c),
        ProviderConfig::Jira(_) => None,
    }
}

#[async_trait]
impl ProviderAdapter for FogBugzAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::FogBugz
    }

    async fn check_auth(&self, config: Option<&ProviderConfig>) -> Option<AuthStatus> {
        let Some(config) = fogbugz_config(config) else {
            return Some(AuthStatus::Credential {
                valid: false,
                identity: None,
            });
        };

        match self.identity(config).await {
            Ok(identity) => Some(AuthStatus::Credential {
                valid: true,
                identity,
            }),
            Err(e) if e.is_auth() => {
                debug!(error = %e, "fogbugz rejected credentials");
                Some(AuthStatus::Credential {
                    valid: false,
                    identity: None,
                })
            }
            Err(e) => {
                warn!(error = %e, "fogbugz auth check failed");
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
        let config = fogbugz_config(config).ok_or(CoreError::NotConfigured {
            provider: ProviderKind::FogBugz,
        })?;

        let client = self.client(config)?;
        let token = client.logon().await?;
        let cases = client.assigned_cases(&token).await?;
        Ok(cases.into_iter().map(RawItem::FogBugz).collect())
    }
}
