// Raw JSON shapes emitted by `az boards query` and `az repos pr list`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u64,
    pub fields: WorkItemFields,
    /// Browser URL, filled in from the configured organization/project.
    #[serde(default)]
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkItemFields {
    #[serde(rename = "System.Title")]
    pub title: Option<String>,
    #[serde(rename = "System.State")]
    pub state: Option<String>,
    #[serde(rename = "System.WorkItemType")]
    pub work_item_type: Option<String>,
    /// Either a display string or an identity object depending on the
    /// extension version.
    #[serde(rename = "System.AssignedTo")]
    pub assigned_to: Option<serde_json::Value>,
    #[serde(rename = "System.ChangedDate")]
    pub changed_date: Option<String>,
    /// Semicolon-separated tag list.
    #[serde(rename = "System.Tags")]
    pub tags: Option<String>,
    #[serde(rename = "System.TeamProject")]
    pub team_project: Option<String>,
    #[serde(rename = "Microsoft.VSTS.Common.Priority")]
    pub priority: Option<u32>,
}

impl WorkItemFields {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn assigned_to_name(&self) -> Option<String> {
        match self.assigned_to.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(map) => map
                .get("displayName")
                .or_else(|| map.get("uniqueName"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub pull_request_id: u64,
    pub title: Option<String>,
    pub status: Option<String>,
    pub created_by: Option<Identity>,
    pub repository: Option<Repository>,
    pub source_ref_name: Option<String>,
    pub target_ref_name: Option<String>,
    pub creation_date: Option<String>,
    pub is_draft: Option<bool>,
    #[serde(default)]
    pub web_url: Option<String>,
}

impl PullRequest {
    pub fn repository_name(&self) -> Option<&str> {
        self.repository.as_ref()?.name.as_deref()
    }

    pub fn source_branch(&self) -> Option<&str> {
        self.source_ref_name.as_deref().map(strip_ref_prefix)
    }

    pub fn target_branch(&self) -> Option<&str> {
        self.target_ref_name.as_deref().map(strip_ref_prefix)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub display_name: Option<String>,
    pub unique_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: Option<String>,
}

/// `az account show`; only the signed-in user is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    pub user: Option<AccountUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUser {
    /// UPN or service principal id.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn strip_ref_prefix(name: &str) -> &str {
    name.strip_prefix("refs/heads/").unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_branch_prefix() {
        assert_eq!(strip_ref_prefix("refs/heads/main"), "main");
        assert_eq!(strip_ref_prefix("refs/heads/feature/x"), "feature/x");
        assert_eq!(strip_ref_prefix("main"), "main");
    }

    #[test]
    fn tags_split_on_semicolons() {
        let fields = WorkItemFields {
            tags: Some("backend; urgent;;ui ".into()),
            ..WorkItemFields::default()
        };
        assert_eq!(fields.tag_list(), vec!["backend", "urgent", "ui"]);
    }

    #[test]
    fn assigned_to_accepts_identity_object() {
        let fields = WorkItemFields {
            assigned_to: Some(serde_json::json!({
                "displayName": "Ada Lovelace",
                "uniqueName": "ada@example.com"
            })),
            ..WorkItemFields::default()
        };
        assert_eq!(fields.assigned_to_name().as_deref(), Some("Ada Lovelace"));
    }
}
