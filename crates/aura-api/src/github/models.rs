// Wire types for the GitHub REST API. Issues and pull requests share the
// issue shape; pull requests carry a `pull_request` object.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub id: u64,
    pub name: Option<String>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color without the leading `#`.
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: String,
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub body: Option<String>,
    pub draft: Option<bool>,
    /// Present if and only if the item is a pull request.
    pub pull_request: Option<serde_json::Value>,
    pub repository_url: Option<String>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// `owner/repo` extracted from `repository_url`.
    pub fn repository(&self) -> Option<&str> {
        let url = self.repository_url.as_deref()?;
        let (_, tail) = url.split_once("/repos/")?;
        Some(tail.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<Issue>,
}
