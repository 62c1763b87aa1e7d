//! Aggregation engine between `aura-api` and UI consumers (CLI / TUI).
//!
//! This crate turns N independently authenticated, independently failing
//! trackers into one consistent, time-ordered list per view:
//!
//! - **[`ProviderAdapter`]**: The two-call contract (`check_auth`,
//!   `fetch_items`) every tracker satisfies. [`default_adapters()`] builds
//!   the GitHub, Azure DevOps, Jira and FogBugz adapters over `aura-api`.
//!
//! - **[`auth_gate::connected`]**: Derives connectivity from the last auth
//!   status plus the stored config snapshot.
//!
//! - **[`convert`]**: Maps each native schema into a [`UnifiedItem`].
//!
//! - **[`aggregate::merge`]**: Concatenates connected providers' items and
//!   stable-sorts them newest first.
//!
//! - **[`UnifiedView`]**: Per-view orchestrator. Each provider's state lives
//!   in its own `watch` channel; fetches run one task per provider, with at
//!   most one in flight each. Mount, auth flips, manual refresh and
//!   re-activation all trigger fetches.
//!
//! - **[`ViewSnapshot`]**: Merged items, [`ErrorBanner`]s, the derived
//!   [`ViewModel`] and per-provider [`ProviderStatus`], delivered through a
//!   [`ViewStream`].

pub mod adapter;
pub mod aggregate;
pub mod auth_gate;
pub mod banner;
pub mod config;
pub mod convert;
pub mod credentials;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod status;
pub mod store;
pub mod stream;
pub mod view;
pub mod view_model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapter::{ProviderAdapter, RawItem, default_adapters};
pub use banner::ErrorBanner;
pub use config::{FogBugzConfig, JiraConfig, ProviderConfig, SyncConfig};
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::{CoreError, FetchError, NormalizeError};
pub use model::{AuthMode, AuthStatus, ItemKind, Label, ProviderKind, UnifiedItem};
pub use snapshot::ViewSnapshot;
pub use status::{FetchPhase, ProviderStatus};
pub use store::{AuthCheck, FetchState, ProviderSlice};
pub use stream::ViewStream;
pub use view::UnifiedView;
pub use view_model::ViewModel;
