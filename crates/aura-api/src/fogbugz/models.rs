// Raw JSON shapes from the FogBugz JSON API. Field names follow the
// API's Hungarian notation through serde renames.

use serde::{Deserialize, Serialize};

/// Every FogBugz response shares this envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
    #[serde(rename = "errorCode")]
    pub error_code: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiError {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LogonData {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PersonData {
    pub person: Option<Person>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchData {
    #[serde(default)]
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "ixPerson")]
    pub id: Option<i64>,
    #[serde(rename = "sFullName")]
    pub full_name: Option<String>,
    #[serde(rename = "sEmail")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    #[serde(rename = "ixBug")]
    pub id: i64,
    #[serde(rename = "sTitle")]
    pub title: Option<String>,
    #[serde(rename = "sStatus")]
    pub status: Option<String>,
    #[serde(rename = "sCategory")]
    pub category: Option<String>,
    #[serde(rename = "sPriority")]
    pub priority: Option<String>,
    #[serde(rename = "sProject")]
    pub project: Option<String>,
    #[serde(rename = "sArea")]
    pub area: Option<String>,
    /// e.g. `2024-01-15T10:30:00Z`
    #[serde(rename = "dtLastUpdated")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "fOpen")]
    pub open: Option<bool>,
    /// `{instance}/f/cases/{id}`, filled in by the client.
    #[serde(default)]
    pub web_url: Option<String>,
}
