use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ProviderKind;

/// Labels beyond this count are dropped during normalization.
pub const MAX_LABELS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub name: String,
    /// `#rrggbb` when the provider supplies one.
    pub color: Option<String>,
}

/// Canonical, provider-agnostic work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedItem {
    /// `<tag>-<native id>`, unique across every provider.
    pub id: String,
    pub provider: ProviderKind,
    pub title: String,
    pub status: String,
    pub url: String,
    pub updated_at: DateTime<Utc>,
    pub labels: Vec<Label>,
    /// Short display key: `#12`, `PROJ-7`, `!42`, `Case 9`.
    pub reference: String,
    /// Repository or project.
    pub context: Option<String>,
    pub author: Option<String>,
    pub priority: Option<String>,
}
