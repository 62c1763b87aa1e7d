// ── Unified view orchestration ──
//
// One `UnifiedView` per visible list (Issues, Pull Requests). Decides when
// each provider checks auth and fetches, runs every provider operation as
// its own task, and republishes a merged snapshot after each slice change.

use std::future::Future;
use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::adapter::ProviderAdapter;
use crate::config::{ProviderConfig, SyncConfig};
use crate::convert;
use crate::credentials::CredentialStore;
use crate::model::{ItemKind, ProviderKind};
use crate::snapshot::ViewSnapshot;
use crate::store::ProviderSlice;
use crate::stream::ViewStream;

// ── Activation ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct Activation {
    active: bool,
    /// One-shot: set by the first activation, which coincides with mount.
    has_mounted_before: bool,
}

// ── UnifiedView ──────────────────────────────────────────────────

/// Aggregated, provider-agnostic view of one item kind.
///
/// Cheaply cloneable via `Arc<ViewInner>`. Every operation returns
/// immediately; work runs on spawned tokio tasks, so methods must be called
/// from within a runtime. Observe results through [`subscribe()`](Self::subscribe)
/// or [`snapshot()`](Self::snapshot).
#[derive(Clone)]
pub struct UnifiedView {
    inner: Arc<ViewInner>,
}

struct ProviderHandle {
    adapter: Arc<dyn ProviderAdapter>,
    slice: watch::Sender<ProviderSlice>,
}

struct ViewInner {
    kind: ItemKind,
    providers: IndexMap<ProviderKind, ProviderHandle>,
    snapshot: watch::Sender<Arc<ViewSnapshot>>,
    activation: watch::Sender<Activation>,
    credentials: Arc<dyn CredentialStore>,
    sync: SyncConfig,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl UnifiedView {
    /// Register the adapters that feed `kind`, in the order given. Adapters
    /// for providers that do not feed this view, and repeats of an already
    /// registered provider, are ignored.
    pub fn new(
        kind: ItemKind,
        adapters: impl IntoIterator<Item = Arc<dyn ProviderAdapter>>,
        credentials: Arc<dyn CredentialStore>,
        sync: SyncConfig,
    ) -> Self {
        let mut providers = IndexMap::new();
        for adapter in adapters {
            let provider = adapter.kind();
            if !provider.supports(kind) {
                continue;
            }
            providers.entry(provider).or_insert_with(|| ProviderHandle {
                adapter,
                slice: watch::Sender::new(ProviderSlice::new(provider)),
            });
        }

        let slices: Vec<ProviderSlice> = providers
            .keys()
            .map(|p| ProviderSlice::new(*p))
            .collect();
        let (snapshot, _) = watch::channel(Arc::new(ViewSnapshot::build(kind, &slices)));

        Self {
            inner: Arc::new(ViewInner {
                kind,
                providers,
                snapshot,
                activation: watch::Sender::new(Activation::default()),
                credentials,
                sync,
                cancel: CancellationToken::new(),
                tasks: TaskTracker::new(),
            }),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.inner.kind
    }

    /// Registered providers, in registration order.
    pub fn providers(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.inner.providers.keys().copied()
    }

    /// Current state of one provider's slice.
    pub fn slice(&self, provider: ProviderKind) -> Option<ProviderSlice> {
        self.inner
            .providers
            .get(&provider)
            .map(|h| h.slice.borrow().clone())
    }

    pub fn snapshot(&self) -> Arc<ViewSnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> ViewStream {
        ViewStream::new(self.inner.snapshot.subscribe())
    }

    // ── Triggers ─────────────────────────────────────────────────

    /// Load config and check auth for every provider; providers that come
    /// back connected fetch immediately.
    pub fn mount(&self) {
        debug!(view = %self.inner.kind, "mount");
        self.recheck_all();
    }

    /// Report whether this view is the visible one. Only a false→true
    /// transition after the first activation refreshes.
    pub fn set_active(&self, active: bool) {
        let mut refresh = false;
        self.inner.activation.send_if_modified(|a| {
            if a.active == active {
                return false;
            }
            a.active = active;
            if active {
                if a.has_mounted_before {
                    refresh = true;
                } else {
                    a.has_mounted_before = true;
                }
            }
            true
        });

        if refresh {
            debug!(view = %self.inner.kind, "re-activated, refreshing");
            self.refresh();
        }
    }

    /// Fetch every connected provider. Disconnected or already-loading
    /// providers are skipped.
    pub fn refresh(&self) {
        for provider in self.inner.providers.keys() {
            self.fetch(*provider);
        }
    }

    /// Fetch one provider.
    pub fn retry(&self, provider: ProviderKind) {
        self.fetch(provider);
    }

    /// Re-read stored config and re-run the auth check for one provider.
    /// A false→true connectivity flip triggers one fetch, as does a change
    /// of account or identity while connected.
    pub fn recheck_auth(&self, provider: ProviderKind) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        let Some(handle) = self.inner.providers.get(&provider) else {
            return;
        };
        let adapter = Arc::clone(&handle.adapter);
        let view = self.clone();

        self.spawn(async move {
            let loaded = view.inner.credentials.load(provider);
            let Some((generation, config)) = view.modify_slice(provider, |s| s.begin_auth(loaded))
            else {
                return;
            };

            let status = adapter.check_auth(config.as_deref()).await;
            debug!(provider = %provider, ?status, "auth check completed");

            let mut fetch_config = None;
            view.modify_slice(provider, |s| {
                if s.complete_auth(generation, status) == Some(true) {
                    fetch_config = s.begin_or_queue_fetch();
                }
            });
            if let Some(config) = fetch_config {
                view.spawn_fetch(provider, config);
            }
        });
    }

    pub fn recheck_all(&self) {
        for provider in self.inner.providers.keys() {
            self.recheck_auth(*provider);
        }
    }

    /// Call after a credential save/delete for `provider`.
    pub fn credentials_changed(&self, provider: ProviderKind) {
        self.recheck_auth(provider);
    }

    /// Cancel outstanding tasks and wait for them to stop. Further triggers
    /// are ignored.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        debug!(view = %self.inner.kind, "shut down");
    }

    // ── Internals ────────────────────────────────────────────────

    /// Check-and-set into `Loading`, then fetch on a new task.
    fn fetch(&self, provider: ProviderKind) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        let mut begun = None;
        if let Some(handle) = self.inner.providers.get(&provider) {
            handle.slice.send_if_modified(|s| {
                begun = s.begin_fetch();
                begun.is_some()
            });
        }

        match begun {
            Some(config) => {
                self.publish();
                self.spawn_fetch(provider, config);
            }
            None => debug!(provider = %provider, "fetch skipped (disconnected or in flight)"),
        }
    }

    /// The slice is already `Loading` when this runs.
    fn spawn_fetch(&self, provider: ProviderKind, config: Option<Arc<ProviderConfig>>) {
        let Some(handle) = self.inner.providers.get(&provider) else {
            return;
        };
        let adapter = Arc::clone(&handle.adapter);
        let view = self.clone();
        let kind = self.inner.kind;

        self.spawn(async move {
            debug!(provider = %provider, view = %kind, "fetch started");
            let result = adapter
                .fetch_items(kind, config.as_deref())
                .await
                .map(|raw| convert::normalize_batch(provider, raw));

            match &result {
                Ok(items) => debug!(provider = %provider, count = items.len(), "fetch succeeded"),
                Err(e) => warn!(provider = %provider, error = %e, "fetch failed"),
            }

            let stale_after = view.inner.sync.stale_after_failures;
            let queued = view
                .modify_slice(provider, |s| {
                    s.finish_fetch(result, stale_after);
                    s.take_queued_fetch()
                })
                .flatten();
            if let Some(config) = queued {
                debug!(provider = %provider, "running queued fetch");
                view.spawn_fetch(provider, config);
            }
        });
    }

    /// Apply a transition to one slice and republish the snapshot.
    fn modify_slice<R>(
        &self,
        provider: ProviderKind,
        f: impl FnOnce(&mut ProviderSlice) -> R,
    ) -> Option<R> {
        let handle = self.inner.providers.get(&provider)?;
        let mut out = None;
        handle.slice.send_modify(|s| out = Some(f(s)));
        self.publish();
        out
    }

    /// Rebuild the snapshot from every slice. Runs inside `send_modify` so
    /// concurrent publishers serialize and the last one sees every slice.
    fn publish(&self) {
        let inner = &self.inner;
        inner.snapshot.send_modify(|snap| {
            let slices: Vec<ProviderSlice> = inner
                .providers
                .values()
                .map(|h| h.slice.borrow().clone())
                .collect();
            *snap = Arc::new(ViewSnapshot::build(inner.kind, &slices));
        });
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.inner.cancel.clone();
        self.inner.tasks.spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = task => {}
            }
        });
    }
}
