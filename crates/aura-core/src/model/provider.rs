use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How a provider obtains its credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthMode {
    /// Auth is delegated to an installed CLI (`gh`, `az`).
    CliDelegated,
    /// Auth uses a stored credential bundle.
    Credential,
}

/// One external tracker.
///
/// `Display`/`FromStr` use the short tag that prefixes item ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
pub enum ProviderKind {
    #[serde(rename = "github")]
    #[strum(serialize = "github")]
    GitHub,
    #[serde(rename = "azure")]
    #[strum(serialize = "azure")]
    AzureDevOps,
    #[serde(rename = "jira")]
    #[strum(serialize = "jira")]
    Jira,
    #[serde(rename = "fogbugz")]
    #[strum(serialize = "fogbugz")]
    FogBugz,
}

impl ProviderKind {
    /// Registration order used for concatenation and banner ordering.
    pub const ALL: [Self; 4] = [Self::GitHub, Self::AzureDevOps, Self::Jira, Self::FogBugz];

    /// Id prefix for unified items.
    pub fn tag(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::AzureDevOps => "azure",
            Self::Jira => "jira",
            Self::FogBugz => "fogbugz",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::AzureDevOps => "Azure DevOps",
            Self::Jira => "Jira",
            Self::FogBugz => "FogBugz",
        }
    }

    pub fn auth_mode(self) -> AuthMode {
        match self {
            Self::GitHub | Self::AzureDevOps => AuthMode::CliDelegated,
            Self::Jira | Self::FogBugz => AuthMode::Credential,
        }
    }

    /// Whether this provider feeds the given view.
    pub fn supports(self, kind: ItemKind) -> bool {
        match kind {
            ItemKind::Issues => true,
            ItemKind::PullRequests => matches!(self, Self::GitHub | Self::AzureDevOps),
        }
    }
}

/// Which unified view a fetch serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ItemKind {
    #[strum(serialize = "issues")]
    Issues,
    #[strum(serialize = "pull requests")]
    PullRequests,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Issues => "Issues",
            Self::PullRequests => "Pull Requests",
        }
    }

    /// Providers feeding this view, in registration order.
    pub fn providers(self) -> impl Iterator<Item = ProviderKind> {
        ProviderKind::ALL.into_iter().filter(move |p| p.supports(self))
    }
}
