// ── Unified domain model ──
//
// Provider identities, auth payloads and the canonical item shape every
// tracker's native schema is normalized into.

pub mod auth;
pub mod item;
pub mod provider;

// ── Re-exports ──────────────────────────────────────────────────────

pub use auth::AuthStatus;
pub use item::{Label, MAX_LABELS, UnifiedItem};
pub use provider::{AuthMode, ItemKind, ProviderKind};
