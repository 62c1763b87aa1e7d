use serde::Serialize;

/// Raw result of one provider auth check.
///
/// Never mutated in place: every check yields a fresh value (or `None` when
/// the check itself failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthStatus {
    /// CLI-delegated providers (`gh`, `az`).
    Cli {
        reachable: bool,
        authenticated: bool,
        identity: Option<String>,
    },
    /// Credential-based providers (Jira, FogBugz).
    Credential {
        valid: bool,
        identity: Option<String>,
    },
}

impl AuthStatus {
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Cli { identity, .. } | Self::Credential { identity, .. } => identity.as_deref(),
        }
    }
}
