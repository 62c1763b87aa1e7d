// ── Provider status summary ──
//
// Flat, serializable view of one slice for status commands and headers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{AuthMode, ProviderKind};
use crate::store::{FetchState, ProviderSlice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    #[strum(serialize = "idle")]
    NotStarted,
    #[strum(serialize = "loading")]
    Loading,
    #[strum(serialize = "ok")]
    Success,
    #[strum(serialize = "error")]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    pub label: &'static str,
    pub auth_mode: AuthMode,
    /// At least one auth check has completed.
    pub checked: bool,
    pub connected: bool,
    pub identity: Option<String>,
    pub phase: FetchPhase,
    pub item_count: Option<usize>,
    pub error: Option<String>,
    pub consecutive_failures: u32,
    pub last_success_at: Option<DateTime<Utc>>,
}

impl From<&ProviderSlice> for ProviderStatus {
    fn from(slice: &ProviderSlice) -> Self {
        let phase = match slice.fetch {
            FetchState::NotStarted => FetchPhase::NotStarted,
            FetchState::Loading => FetchPhase::Loading,
            FetchState::Success(_) => FetchPhase::Success,
            FetchState::Error(_) => FetchPhase::Error,
        };
        Self {
            provider: slice.provider,
            label: slice.provider.label(),
            auth_mode: slice.provider.auth_mode(),
            checked: slice.auth_completed(),
            connected: slice.connected(),
            identity: slice.status().and_then(|s| s.identity()).map(str::to_owned),
            phase,
            item_count: slice.visible_items().map(|items| items.len()),
            error: slice.fetch.error().map(str::to_owned),
            consecutive_failures: slice.consecutive_failures,
            last_success_at: slice.last_success_at,
        }
    }
}
