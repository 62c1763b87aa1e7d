// ── Cross-provider merge ──

use std::sync::Arc;

use crate::model::UnifiedItem;

/// Concatenate per-provider lists (in the order given) and stable-sort by
/// `updated_at`, newest first. Ties keep per-provider fetch order.
///
/// Pure and idempotent: the same input always yields the same sequence.
pub fn merge<'a, I>(lists: I) -> Vec<Arc<UnifiedItem>>
where
    I: IntoIterator<Item = &'a [Arc<UnifiedItem>]>,
{
    let mut merged: Vec<Arc<UnifiedItem>> = lists.into_iter().flatten().cloned().collect();
    merged.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ProviderKind;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn item(provider: ProviderKind, native: &str, minutes_ago: i64) -> Arc<UnifiedItem> {
        Arc::new(UnifiedItem {
            id: format!("{}-{native}", provider.tag()),
            provider,
            title: native.into(),
            status: "Open".into(),
            url: format!("https://example.com/{native}"),
            updated_at: now() - Duration::minutes(minutes_ago),
            labels: Vec::new(),
            reference: native.into(),
            context: None,
            author: None,
            priority: None,
        })
    }

    fn ids(items: &[Arc<UnifiedItem>]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn interleaves_providers_by_recency() {
        let a = vec![
            item(ProviderKind::GitHub, "a1", 60),
            item(ProviderKind::GitHub, "a2", 120),
            item(ProviderKind::GitHub, "a3", 180),
        ];
        let b = vec![
            item(ProviderKind::Jira, "b1", 30),
            item(ProviderKind::Jira, "b2", 240),
        ];

        let merged = merge([a.as_slice(), b.as_slice()]);
        assert_eq!(
            ids(&merged),
            vec!["jira-b1", "github-a1", "github-a2", "jira-b2", "github-a3"]
        );
    }

    #[test]
    fn merge_is_idempotent_and_sorted() {
        let a = vec![
            item(ProviderKind::FogBugz, "x", 5),
            item(ProviderKind::FogBugz, "y", 500),
        ];
        let b = vec![
            item(ProviderKind::AzureDevOps, "z", 50),
            item(ProviderKind::AzureDevOps, "w", 5),
        ];

        let first = merge([a.as_slice(), b.as_slice()]);
        let second = merge([a.as_slice(), b.as_slice()]);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
    }

    #[test]
    fn ties_keep_registration_order() {
        let a = vec![item(ProviderKind::GitHub, "a", 10)];
        let b = vec![item(ProviderKind::Jira, "b", 10)];
        let merged = merge([a.as_slice(), b.as_slice()]);
        assert_eq!(ids(&merged), vec!["github-a", "jira-b"]);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(merge(std::iter::empty::<&[Arc<UnifiedItem>]>()).is_empty());
    }
}
