// ── Native-to-unified conversions ──
//
// The only place that knows each provider's native schema. Every mapping
// synthesizes a `<tag>-<native id>` id, parses the native timestamp, keeps
// at most two labels in their original order and maps absent optional
// fields to `None`. Items missing a required field are rejected.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use aura_api::azure::{PullRequest, WorkItem};
use aura_api::fogbugz::Case;
use aura_api::github::Issue as GitHubIssue;
use aura_api::jira::Issue as JiraIssue;

use crate::adapter::RawItem;
use crate::error::NormalizeError;
use crate::model::{Label, MAX_LABELS, ProviderKind, UnifiedItem};

/// Jira's offset form, e.g. `2024-01-15T10:30:00.000+0000`.
const OFFSET_WITHOUT_COLON: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an RFC 3339 timestamp, falling back to the colon-less offset form.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, OFFSET_WITHOUT_COLON))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Identity of one native item while its fields are checked.
struct Native {
    provider: ProviderKind,
    id: String,
}

impl Native {
    fn new(provider: ProviderKind, id: impl ToString) -> Self {
        Self {
            provider,
            id: id.to_string(),
        }
    }

    fn unified_id(&self) -> String {
        format!("{}-{}", self.provider.tag(), self.id)
    }

    fn missing(&self, field: &'static str) -> NormalizeError {
        NormalizeError::MissingField {
            provider: self.provider,
            native_id: self.id.clone(),
            field,
        }
    }

    /// Required text field: absent or blank is rejected.
    fn required(&self, value: Option<&str>, field: &'static str) -> Result<String, NormalizeError> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| self.missing(field))
    }

    fn timestamp(&self, value: Option<&str>) -> Result<DateTime<Utc>, NormalizeError> {
        let raw = value.ok_or_else(|| self.missing("update timestamp"))?;
        parse_timestamp(raw).ok_or_else(|| NormalizeError::BadTimestamp {
            provider: self.provider,
            native_id: self.id.clone(),
            value: raw.to_owned(),
        })
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

fn plain_labels<I, S>(names: I) -> Vec<Label>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .take(MAX_LABELS)
        .map(|name| Label {
            name: name.into(),
            color: None,
        })
        .collect()
}

/// `open` → `Open`, `in progress` stays as-is past the first letter.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// ── Entry points ───────────────────────────────────────────────────

/// Map one native item into the canonical shape.
pub fn normalize(raw: RawItem) -> Result<UnifiedItem, NormalizeError> {
    match raw {
        RawItem::GitHub(issue) => github(issue),
        RawItem::AzureWorkItem(item) => azure_work_item(item),
        RawItem::AzurePullRequest(pr) => azure_pull_request(pr),
        RawItem::Jira(issue) => jira(issue),
        RawItem::FogBugz(case) => fogbugz(case),
    }
}

/// Normalize a provider's whole batch. Rejected items and items that
/// belong to another provider are logged and skipped; a repeated id keeps
/// its first occurrence.
pub fn normalize_batch(provider: ProviderKind, raw: Vec<RawItem>) -> Vec<UnifiedItem> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut items = Vec::with_capacity(raw.len());

    for item in raw {
        let origin = item.provider();
        if origin != provider {
            warn!(provider = %provider, origin = %origin, "skipping item from another provider");
            continue;
        }
        match normalize(item) {
            Ok(item) => {
                if seen.insert(item.id.clone()) {
                    items.push(item);
                } else {
                    debug!(provider = %provider, id = %item.id, "duplicate item dropped");
                }
            }
            Err(e) => warn!(provider = %provider, error = %e, "skipping item"),
        }
    }
    items
}

// ── GitHub ─────────────────────────────────────────────────────────

fn github(issue: GitHubIssue) -> Result<UnifiedItem, NormalizeError> {
    let native = Native::new(ProviderKind::GitHub, issue.id);
    let title = native.required(Some(&issue.title), "title")?;
    let updated_at = native.timestamp(issue.updated_at.as_deref())?;

    let status = if issue.is_pull_request() && issue.draft == Some(true) {
        "Draft".to_owned()
    } else {
        capitalize(&native.required(Some(&issue.state), "status")?)
    };

    let labels = issue
        .labels
        .iter()
        .take(MAX_LABELS)
        .map(|l| Label {
            name: l.name.clone(),
            color: optional(l.color.as_deref()).map(|c| format!("#{c}")),
        })
        .collect();

    Ok(UnifiedItem {
        id: native.unified_id(),
        provider: native.provider,
        title,
        status,
        url: native.required(Some(&issue.html_url), "url")?,
        updated_at,
        labels,
        reference: format!("#{}", issue.number),
        context: issue.repository().map(str::to_owned),
        author: issue.user.map(|u| u.login),
        priority: None,
    })
}

// ── Azure DevOps ───────────────────────────────────────────────────

fn azure_work_item(item: WorkItem) -> Result<UnifiedItem, NormalizeError> {
    let native = Native::new(ProviderKind::AzureDevOps, item.id);
    let fields = &item.fields;

    Ok(UnifiedItem {
        id: native.unified_id(),
        provider: native.provider,
        title: native.required(fields.title.as_deref(), "title")?,
        status: native.required(fields.state.as_deref(), "status")?,
        url: native.required(item.web_url.as_deref(), "url")?,
        updated_at: native.timestamp(fields.changed_date.as_deref())?,
        labels: plain_labels(fields.tag_list()),
        reference: format!("#{}", item.id),
        context: optional(fields.team_project.as_deref()),
        author: None,
        priority: fields.priority.map(|p| format!("P{p}")),
    })
}

fn azure_pull_request(pr: PullRequest) -> Result<UnifiedItem, NormalizeError> {
    let native = Native::new(ProviderKind::AzureDevOps, pr.pull_request_id);

    let status = if pr.is_draft == Some(true) {
        "Draft".to_owned()
    } else {
        capitalize(&native.required(pr.status.as_deref(), "status")?)
    };

    Ok(UnifiedItem {
        id: native.unified_id(),
        provider: native.provider,
        title: native.required(pr.title.as_deref(), "title")?,
        status,
        url: native.required(pr.web_url.as_deref(), "url")?,
        // `az repos pr list` has no last-updated field.
        updated_at: native.timestamp(pr.creation_date.as_deref())?,
        labels: Vec::new(),
        reference: format!("!{}", pr.pull_request_id),
        context: pr.repository_name().map(str::to_owned),
        author: pr
            .created_by
            .as_ref()
            .and_then(|id| optional(id.display_name.as_deref())),
        priority: None,
    })
}

// ── Jira ───────────────────────────────────────────────────────────

fn jira(issue: JiraIssue) -> Result<UnifiedItem, NormalizeError> {
    let native = Native::new(ProviderKind::Jira, &issue.key);
    let fields = &issue.fields;

    let status = fields.status.as_ref().and_then(|s| s.name.as_deref());
    let context = fields
        .project
        .as_ref()
        .and_then(|p| optional(p.name.as_deref()).or_else(|| optional(p.key.as_deref())));

    Ok(UnifiedItem {
        id: native.unified_id(),
        provider: native.provider,
        title: native.required(fields.summary.as_deref(), "title")?,
        status: native.required(status, "status")?,
        url: native.required(issue.browse_url.as_deref(), "url")?,
        updated_at: native.timestamp(fields.updated.as_deref())?,
        labels: plain_labels(fields.labels.iter().cloned()),
        reference: issue.key.clone(),
        context,
        author: None,
        priority: fields
            .priority
            .as_ref()
            .and_then(|p| optional(p.name.as_deref())),
    })
}

// ── FogBugz ────────────────────────────────────────────────────────

fn fogbugz(case: Case) -> Result<UnifiedItem, NormalizeError> {
    let native = Native::new(ProviderKind::FogBugz, case.id);

    Ok(UnifiedItem {
        id: native.unified_id(),
        provider: native.provider,
        title: native.required(case.title.as_deref(), "title")?,
        status: native.required(case.status.as_deref(), "status")?,
        url: native.required(case.web_url.as_deref(), "url")?,
        updated_at: native.timestamp(case.last_updated.as_deref())?,
        labels: plain_labels(case.tags),
        reference: format!("Case {}", case.id),
        context: optional(case.project.as_deref()),
        author: None,
        priority: optional(case.priority.as_deref()),
    })
}
