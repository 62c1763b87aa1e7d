// ── Derived presentation state ──
//
// Pure booleans recomputed from the slices on every change. No state of
// their own.

use serde::Serialize;

use crate::store::ProviderSlice;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ViewModel {
    /// Some provider's first auth check is still outstanding and nothing
    /// has been merged yet.
    pub initial_load: bool,
    /// A connected provider is fetching.
    pub any_loading: bool,
    /// Every check completed and none connected.
    pub no_providers_connected: bool,
    /// Settled, connected, no errors, and still nothing to show.
    pub empty_result: bool,
}

impl ViewModel {
    pub fn derive(slices: &[ProviderSlice], merged_len: usize, banner_count: usize) -> Self {
        let all_checked = slices.iter().all(ProviderSlice::auth_completed);
        let any_connected = slices.iter().any(ProviderSlice::connected);

        let initial_load = !all_checked && merged_len == 0;
        let any_loading = slices.iter().any(|s| s.connected() && s.is_loading());
        let no_providers_connected = all_checked && !any_connected;
        let empty_result = !any_loading
            && !initial_load
            && any_connected
            && merged_len == 0
            && banner_count == 0;

        Self {
            initial_load,
            any_loading,
            no_providers_connected,
            empty_result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthStatus, ProviderKind};
    use crate::store::{AuthCheck, FetchState};

    fn checked(provider: ProviderKind, authenticated: bool) -> ProviderSlice {
        let mut slice = ProviderSlice::new(provider);
        slice.auth = AuthCheck::Completed(Some(AuthStatus::Cli {
            reachable: true,
            authenticated,
            identity: None,
        }));
        slice
    }

    #[test]
    fn fresh_view_is_initial_load() {
        let slices = [
            ProviderSlice::new(ProviderKind::GitHub),
            ProviderSlice::new(ProviderKind::AzureDevOps),
        ];
        let model = ViewModel::derive(&slices, 0, 0);
        assert!(model.initial_load);
        assert!(!model.no_providers_connected);
        assert!(!model.empty_result);
    }

    #[test]
    fn nothing_connected_after_checks() {
        let slices = [
            checked(ProviderKind::GitHub, false),
            checked(ProviderKind::AzureDevOps, false),
        ];
        let model = ViewModel::derive(&slices, 0, 0);
        assert!(model.no_providers_connected);
        assert!(!model.initial_load);
        assert!(!model.empty_result);
    }

    #[test]
    fn loading_suppresses_empty_result() {
        let mut github = checked(ProviderKind::GitHub, true);
        github.fetch = FetchState::Loading;
        let model = ViewModel::derive(&[github.clone()], 0, 0);
        assert!(model.any_loading);
        assert!(!model.empty_result);

        github.fetch = FetchState::Success(std::sync::Arc::default());
        let model = ViewModel::derive(&[github], 0, 0);
        assert!(model.empty_result);
    }

    #[test]
    fn errors_suppress_empty_result() {
        let mut github = checked(ProviderKind::GitHub, true);
        github.fetch = FetchState::Error("rate limited".into());
        let model = ViewModel::derive(&[github], 0, 1);
        assert!(!model.empty_result);
        assert!(!model.no_providers_connected);
    }
}
