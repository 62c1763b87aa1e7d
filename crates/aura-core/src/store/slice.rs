use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth_gate;
use crate::config::ProviderConfig;
use crate::error::FetchError;
use crate::model::{AuthStatus, ProviderKind, UnifiedItem};

/// Immutable, shareable item snapshot.
pub type ItemList = Arc<Vec<Arc<UnifiedItem>>>;

/// Progress of a provider's auth check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthCheck {
    /// No check has completed yet.
    #[default]
    Pending,
    /// The latest completed check. `None` means the check itself failed.
    Completed(Option<AuthStatus>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    NotStarted,
    Loading,
    Success(ItemList),
    Error(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSlice {
    pub provider: ProviderKind,
    pub auth: AuthCheck,
    /// Read-only snapshot from the credential store.
    pub config: Option<Arc<ProviderConfig>>,
    pub fetch: FetchState,
    /// Last successful items, kept visible through `Loading` and `Error`.
    pub retained: Option<ItemList>,
    pub consecutive_failures: u32,
    pub last_success_at: Option<DateTime<Utc>>,
    /// Bumped per auth check; a completion from an older check is dropped.
    pub(crate) auth_generation: u64,
    /// The config was replaced by an auth check that has not completed.
    pub(crate) account_changed: bool,
    /// A fetch was requested while one was in flight; run it on completion.
    pub(crate) refetch_queued: bool,
}

impl ProviderSlice {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            auth: AuthCheck::Pending,
            config: None,
            fetch: FetchState::NotStarted,
            retained: None,
            consecutive_failures: 0,
            last_success_at: None,
            auth_generation: 0,
            account_changed: false,
            refetch_queued: false,
        }
    }

    pub fn status(&self) -> Option<&AuthStatus> {
        match &self.auth {
            AuthCheck::Completed(status) => status.as_ref(),
            AuthCheck::Pending => None,
        }
    }

    pub fn auth_completed(&self) -> bool {
        matches!(self.auth, AuthCheck::Completed(_))
    }

    pub fn connected(&self) -> bool {
        auth_gate::connected(self.provider, self.status(), self.config.as_deref())
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_loading()
    }

    /// Items this provider contributes to the merge, regardless of
    /// connectivity.
    pub fn visible_items(&self) -> Option<&ItemList> {
        self.retained.as_ref()
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Enter `Loading` if connected and idle. Returns the config snapshot
    /// to fetch with, or `None` when the request is a no-op.
    pub(crate) fn begin_fetch(&mut self) -> Option<Option<Arc<ProviderConfig>>> {
        if !self.connected() || self.is_loading() {
            return None;
        }
        self.fetch = FetchState::Loading;
        Some(self.config.clone())
    }

    pub(crate) fn finish_fetch(
        &mut self,
        result: Result<Vec<UnifiedItem>, FetchError>,
        stale_after_failures: Option<u32>,
    ) {
        match result {
            Ok(items) => {
                let items: ItemList = Arc::new(items.into_iter().map(Arc::new).collect());
                self.retained = Some(Arc::clone(&items));
                self.fetch = FetchState::Success(items);
                self.consecutive_failures = 0;
                self.last_success_at = Some(Utc::now());
            }
            Err(e) => {
                self.fetch = FetchState::Error(e.message);
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if stale_after_failures.is_some_and(|limit| self.consecutive_failures >= limit) {
                    self.retained = None;
                }
            }
        }
    }

    /// Start a new auth check and install the freshly loaded config.
    /// Returns the check's generation and the config to check with.
    pub(crate) fn begin_auth(
        &mut self,
        config: Option<ProviderConfig>,
    ) -> (u64, Option<Arc<ProviderConfig>>) {
        let changed = match (self.config.as_deref(), config.as_ref()) {
            (Some(old), Some(new)) => !old.same_account(new),
            (None, None) => false,
            _ => true,
        };
        self.auth_generation += 1;
        self.account_changed |= changed;
        self.config = config.map(Arc::new);
        (self.auth_generation, self.config.clone())
    }

    /// Record an auth result. Returns `None` if a newer check superseded
    /// this one, otherwise whether the provider should fetch: it just
    /// became connected, or it stayed connected under a different account
    /// or identity.
    pub(crate) fn complete_auth(&mut self, generation: u64, status: Option<AuthStatus>) -> Option<bool> {
        if generation != self.auth_generation {
            return None;
        }
        let was_connected = self.connected();
        let previous_identity = self.status().and_then(AuthStatus::identity).map(str::to_owned);
        let identity_changed = previous_identity
            .is_some_and(|prev| status.as_ref().and_then(AuthStatus::identity) != Some(prev.as_str()));
        let account_changed = std::mem::take(&mut self.account_changed);

        self.auth = AuthCheck::Completed(status);
        Some(self.connected() && (!was_connected || account_changed || identity_changed))
    }

    /// Fetch now if idle, otherwise queue one fetch behind the in-flight
    /// request so its stale result is replaced.
    pub(crate) fn begin_or_queue_fetch(&mut self) -> Option<Option<Arc<ProviderConfig>>> {
        if self.connected() && self.is_loading() {
            self.refetch_queued = true;
            return None;
        }
        self.begin_fetch()
    }

    /// Start the queued fetch, if any, once the previous one has finished.
    pub(crate) fn take_queued_fetch(&mut self) -> Option<Option<Arc<ProviderConfig>>> {
        if std::mem::take(&mut self.refetch_queued) {
            self.begin_fetch()
        } else {
            None
        }
    }
}
