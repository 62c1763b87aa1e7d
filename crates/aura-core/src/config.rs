// ── Runtime provider configuration ──
//
// Credential bundles for the credential-based providers, plus sync tuning.
// The core never reads config files; a `CredentialStore` hands these in.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::CoreError;
use crate::model::ProviderKind;

/// Jira Cloud/Server connection: basic auth with an API token.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub instance_url: Url,
    pub email: String,
    pub api_token: SecretString,
}

/// FogBugz connection: email/password exchanged for a session token.
#[derive(Debug, Clone)]
pub struct FogBugzConfig {
    pub instance_url: Url,
    pub email: String,
    pub password: SecretString,
}

/// Provider-specific credential bundle. CLI-delegated providers have none.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Jira(JiraConfig),
    FogBugz(FogBugzConfig),
}

impl ProviderConfig {
    pub fn provider(&self) -> ProviderKind {
        match self {
            Self::Jira(_) => ProviderKind::Jira,
            Self::FogBugz(_) => ProviderKind::FogBugz,
        }
    }

    pub fn instance_url(&self) -> &Url {
        match self {
            Self::Jira(c) => &c.instance_url,
            Self::FogBugz(c) => &c.instance_url,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::Jira(c) => &c.email,
            Self::FogBugz(c) => &c.email,
        }
    }

    /// True when both bundles point at the same account with the same
    /// secret.
    pub fn same_account(&self, other: &Self) -> bool {
        let secret = |c: &Self| match c {
            Self::Jira(c) => c.api_token.expose_secret().to_owned(),
            Self::FogBugz(c) => c.password.expose_secret().to_owned(),
        };
        self.provider() == other.provider()
            && self.instance_url() == other.instance_url()
            && self.email() == other.email()
            && secret(self) == secret(other)
    }

    /// Reject blank required fields. Only credential-entry surfaces call
    /// this; the aggregation core accepts whatever the store returns.
    pub fn validate(&self) -> Result<(), CoreError> {
        let (secret, secret_name) = match self {
            Self::Jira(c) => (&c.api_token, "API token"),
            Self::FogBugz(c) => (&c.password, "password"),
        };
        let provider = self.provider().label();

        let url = self.instance_url();
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(CoreError::ValidationFailed {
                message: format!("{provider} instance URL must be an http(s) URL with a host"),
            });
        }
        if self.email().trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: format!("{provider} email is required"),
            });
        }
        if secret.expose_secret().trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: format!("{provider} {secret_name} is required"),
            });
        }
        Ok(())
    }
}

/// Sync tuning shared by every view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    /// Drop a provider's retained items after this many consecutive fetch
    /// failures. `None` keeps them until the next success.
    pub stale_after_failures: Option<u32>,
}
