// ── View snapshot ──
//
// Everything a renderer needs, rebuilt from the provider slices after each
// slice change. Consumers only ever see immutable `Arc<ViewSnapshot>`s.

use std::sync::Arc;

use crate::aggregate;
use crate::banner::{self, ErrorBanner};
use crate::model::{ItemKind, UnifiedItem};
use crate::status::{FetchPhase, ProviderStatus};
use crate::store::ProviderSlice;
use crate::view_model::ViewModel;

#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub kind: ItemKind,
    /// Merged items of connected providers, newest first.
    pub items: Vec<Arc<UnifiedItem>>,
    pub banners: Vec<ErrorBanner>,
    pub model: ViewModel,
    pub providers: Vec<ProviderStatus>,
}

impl ViewSnapshot {
    pub fn build(kind: ItemKind, slices: &[ProviderSlice]) -> Self {
        let items = aggregate::merge(
            slices
                .iter()
                .filter(|s| s.connected())
                .filter_map(ProviderSlice::visible_items)
                .map(|items| items.as_slice()),
        );
        let banners = banner::collect_errors(slices);
        let model = ViewModel::derive(slices, items.len(), banners.len());
        let providers = slices.iter().map(ProviderStatus::from).collect();

        Self {
            kind,
            items,
            banners,
            model,
            providers,
        }
    }

    /// Every auth check has completed and nothing is fetching.
    pub fn is_settled(&self) -> bool {
        self.providers
            .iter()
            .all(|p| p.checked && p.phase != FetchPhase::Loading)
    }
}
