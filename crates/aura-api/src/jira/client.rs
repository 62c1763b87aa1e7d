use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{Issue, Myself, SearchResult};
use crate::error::{Error, body_preview};
use crate::transport::{TransportConfig, endpoint};

const ASSIGNED_JQL: &str =
    "assignee = currentUser() AND resolution = Unresolved ORDER BY updated DESC";
const SEARCH_FIELDS: &str = "summary,status,issuetype,priority,updated,labels,project,assignee";
const MAX_RESULTS: &str = "100";

pub struct JiraClient {
    http: reqwest::Client,
    base_url: Url,
    email: String,
    api_token: SecretString,
}

impl JiraClient {
    pub fn new(
        base_url: Url,
        email: impl Into<String>,
        api_token: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            email: email.into(),
            api_token,
        })
    }

    /// Verify credentials. Non-success statuses surface as [`Error::Status`].
    pub async fn myself(&self) -> Result<Myself, Error> {
        let url = endpoint(&self.base_url, "rest/api/3/myself")?;
        self.get_json(url).await
    }

    /// Unresolved issues assigned to the current user, newest first.
    pub async fn assigned_issues(&self) -> Result<Vec<Issue>, Error> {
        let mut url = endpoint(&self.base_url, "rest/api/3/search")?;
        url.query_pairs_mut()
            .append_pair("jql", ASSIGNED_JQL)
            .append_pair("maxResults", MAX_RESULTS)
            .append_pair("fields", SEARCH_FIELDS);

        let result: SearchResult = self.get_json(url).await?;
        let base = self.base_url.as_str().trim_end_matches('/');
        let issues: Vec<Issue> = result
            .issues
            .into_iter()
            .map(|mut issue| {
                issue.browse_url = Some(format!("{base}/browse/{}", issue.key));
                issue
            })
            .collect();

        debug!(count = issues.len(), total = result.total, "jira assigned issues");
        Ok(issues)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .basic_auth(&self.email, Some(self.api_token.expose_secret()))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Status {
                provider: "Jira",
                status: status.as_u16(),
                body: body_preview(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body_preview(&body),
        })
    }
}
