// ── Error banners ──
//
// Fetch failures surface per provider, but only while that provider is
// connected. An unconfigured or never-checked provider is not a failure.

use serde::Serialize;

use crate::model::ProviderKind;
use crate::store::ProviderSlice;
use crate::view::UnifiedView;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBanner {
    pub provider: ProviderKind,
    pub label: &'static str,
    /// Adapter diagnostic, verbatim.
    pub message: String,
}

impl ErrorBanner {
    /// Re-run this provider's fetch through the view.
    pub fn retry(&self, view: &UnifiedView) {
        view.retry(self.provider);
    }
}

/// One banner per connected provider in `Error`, in registration order.
pub fn collect_errors(slices: &[ProviderSlice]) -> Vec<ErrorBanner> {
    slices
        .iter()
        .filter(|s| s.connected())
        .filter_map(|s| {
            s.fetch.error().map(|message| ErrorBanner {
                provider: s.provider,
                label: s.provider.label(),
                message: message.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::AuthStatus;
    use crate::store::{AuthCheck, FetchState};

    fn slice(provider: ProviderKind, auth: AuthCheck, error: &str) -> ProviderSlice {
        let mut slice = ProviderSlice::new(provider);
        slice.auth = auth;
        slice.fetch = FetchState::Error(error.into());
        slice
    }

    fn authenticated() -> AuthCheck {
        AuthCheck::Completed(Some(AuthStatus::Cli {
            reachable: true,
            authenticated: true,
            identity: None,
        }))
    }

    #[test]
    fn pending_auth_never_produces_banner() {
        let slices = [slice(ProviderKind::GitHub, AuthCheck::Pending, "stale")];
        assert!(collect_errors(&slices).is_empty());
    }

    #[test]
    fn disconnected_errors_are_suppressed() {
        let slices = [
            slice(ProviderKind::Jira, AuthCheck::Completed(None), "unreachable"),
            slice(ProviderKind::AzureDevOps, authenticated(), "az failed"),
            slice(ProviderKind::GitHub, authenticated(), "rate limited"),
        ];
        let banners = collect_errors(&slices);
        let labels: Vec<_> = banners.iter().map(|b| (b.label, b.message.as_str())).collect();
        assert_eq!(
            labels,
            vec![("Azure DevOps", "az failed"), ("GitHub", "rate limited")]
        );
    }
}
