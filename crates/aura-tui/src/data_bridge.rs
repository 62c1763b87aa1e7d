//! Data bridge: connects a [`UnifiedView`] to TUI actions.
//!
//! Runs as a background task per view: subscribes to the view's
//! snapshots, mounts it, and forwards every change as an [`Action`]
//! through the TUI's action channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use aura_core::UnifiedView;

use crate::action::Action;
use crate::screen::ScreenId;

/// Mount `view` and forward its snapshots until cancelled, then shut the
/// view down so no provider task outlives the UI.
pub async fn spawn_data_bridge(
    view: UnifiedView,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let screen = ScreenId::from_kind(view.kind());

    // Subscribe before mounting so the first transitions are not missed
    let mut snapshots = view.subscribe();
    view.mount();

    let _ = action_tx.send(Action::SnapshotUpdated(
        screen,
        Arc::clone(snapshots.current()),
    ));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = snapshots.changed() => {
                let Some(snap) = changed else { break };
                debug!(
                    view = %screen,
                    items = snap.items.len(),
                    banners = snap.banners.len(),
                    "dispatching SnapshotUpdated"
                );
                if action_tx.send(Action::SnapshotUpdated(screen, snap)).is_err() {
                    break;
                }
            }
        }
    }

    view.shutdown().await;
    debug!(view = %screen, "data bridge shut down");
}
