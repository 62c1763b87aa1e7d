// ── Connectivity gate ──
//
// "Connected" is derived on every read from the last auth status and the
// config snapshot; it is never stored.

use crate::config::ProviderConfig;
use crate::model::{AuthMode, AuthStatus, ProviderKind};

/// Whether `provider` is eligible for fetching.
///
/// CLI-delegated providers need `authenticated`; credential-based providers
/// need a config for that provider and `valid`. A status of the other
/// variant never counts.
pub fn connected(
    provider: ProviderKind,
    status: Option<&AuthStatus>,
    config: Option<&ProviderConfig>,
) -> bool {
    match (provider.auth_mode(), status) {
        (AuthMode::CliDelegated, Some(AuthStatus::Cli { authenticated, .. })) => *authenticated,
        (AuthMode::Credential, Some(AuthStatus::Credential { valid, .. })) => {
            *valid && config.is_some_and(|c| c.provider() == provider)
        }
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::config::JiraConfig;

    fn jira_config() -> ProviderConfig {
        ProviderConfig::Jira(JiraConfig {
            instance_url: Url::parse("https://acme.atlassian.net").unwrap(),
            email: "ada@example.com".into(),
            api_token: SecretString::from("tok".to_string()),
        })
    }

    fn cli(authenticated: bool) -> AuthStatus {
        AuthStatus::Cli {
            reachable: true,
            authenticated,
            identity: None,
        }
    }

    fn credential(valid: bool) -> AuthStatus {
        AuthStatus::Credential {
            valid,
            identity: None,
        }
    }

    #[test]
    fn cli_providers_follow_authenticated() {
        assert!(connected(ProviderKind::GitHub, Some(&cli(true)), None));
        assert!(!connected(ProviderKind::AzureDevOps, Some(&cli(false)), None));
        assert!(!connected(ProviderKind::GitHub, None, None));
    }

    #[test]
    fn credential_providers_need_config_and_validity() {
        let config = jira_config();
        assert!(connected(ProviderKind::Jira, Some(&credential(true)), Some(&config)));
        assert!(!connected(ProviderKind::Jira, Some(&credential(true)), None));
        assert!(!connected(ProviderKind::Jira, Some(&credential(false)), Some(&config)));
        assert!(!connected(ProviderKind::FogBugz, Some(&credential(true)), Some(&config)));
    }

    #[test]
    fn mismatched_status_variant_is_disconnected() {
        let config = jira_config();
        assert!(!connected(ProviderKind::Jira, Some(&cli(true)), Some(&config)));
        assert!(!connected(ProviderKind::GitHub, Some(&credential(true)), None));
    }
}
