// ── Reactive view subscription ──

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::snapshot::ViewSnapshot;

/// A subscription to a view's snapshots.
///
/// Offers point-in-time access plus change notification through
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct ViewStream {
    current: Arc<ViewSnapshot>,
    receiver: watch::Receiver<Arc<ViewSnapshot>>,
}

impl ViewStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<ViewSnapshot>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot seen most recently through this handle.
    pub fn current(&self) -> &Arc<ViewSnapshot> {
        &self.current
    }

    /// The latest published snapshot.
    pub fn latest(&self) -> Arc<ViewSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the view is dropped.
    pub async fn changed(&mut self) -> Option<Arc<ViewSnapshot>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Wait until every auth check has completed and no provider is
    /// fetching. Returns immediately if that already holds.
    pub async fn wait_until_settled(&mut self) -> Option<Arc<ViewSnapshot>> {
        let snap = {
            let guard = self.receiver.wait_for(|s| s.is_settled()).await.ok()?;
            Arc::clone(&guard)
        };
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    pub fn into_stream(self) -> ViewWatchStream {
        ViewWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding each new snapshot.
pub struct ViewWatchStream {
    inner: WatchStream<Arc<ViewSnapshot>>,
}

impl Stream for ViewWatchStream {
    type Item = Arc<ViewSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
