//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use aura_core::{ProviderKind, ViewSnapshot};

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    /// Spinner clock.
    Tick,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Data Events (from the view bridges) ──────────────────────
    SnapshotUpdated(ScreenId, Arc<ViewSnapshot>),

    // ── View Triggers ─────────────────────────────────────────────
    Refresh(ScreenId),
    Retry(ScreenId, ProviderKind),
    RecheckAuth(ScreenId),
}
