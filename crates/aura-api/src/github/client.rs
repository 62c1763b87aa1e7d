// GitHub REST client: assigned issues (paged) and pull requests the user
// is involved in (search API).

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::{Issue, SearchResult, User};
use crate::error::{Error, body_preview};
use crate::transport::{TransportConfig, endpoint};

const PER_PAGE: usize = 100;
/// Upper bound on pages walked for assigned issues.
const MAX_PAGES: u32 = 20;

pub struct GitHubClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GitHubClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.github.com";

    pub fn new(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Authentication {
                message: "GitHub token contains invalid header characters".into(),
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// Client against `api.github.com`.
    pub fn public(token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(Self::DEFAULT_BASE_URL)?;
        Self::new(base_url, token, transport)
    }

    /// The authenticated user.
    pub async fn current_user(&self) -> Result<User, Error> {
        let url = self.url("user")?;
        self.get_json(url).await
    }

    /// Open issues assigned to the authenticated user, across every page.
    /// Pull requests returned by the issues endpoint are dropped.
    pub async fn assigned_issues(&self) -> Result<Vec<Issue>, Error> {
        let mut issues = Vec::new();

        for page in 1..=MAX_PAGES {
            let mut url = self.url("issues")?;
            url.query_pairs_mut()
                .append_pair("filter", "assigned")
                .append_pair("state", "open")
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let batch: Vec<Issue> = self.get_json(url).await?;
            let count = batch.len();
            issues.extend(batch.into_iter().filter(|i| !i.is_pull_request()));

            if count < PER_PAGE {
                break;
            }
        }

        debug!(count = issues.len(), "github assigned issues");
        Ok(issues)
    }

    /// Open pull requests the user authored, was assigned, or was asked to
    /// review, most recently updated first.
    pub async fn involved_pull_requests(&self, username: &str) -> Result<Vec<Issue>, Error> {
        let mut url = self.url("search/issues")?;
        url.query_pairs_mut()
            .append_pair("q", &format!("type:pr is:open involves:{username}"))
            .append_pair("sort", "updated")
            .append_pair("per_page", &PER_PAGE.to_string());

        let result: SearchResult = self.get_json(url).await?;
        debug!(
            count = result.items.len(),
            total = result.total_count,
            "github involved pull requests"
        );
        Ok(result.items)
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        endpoint(&self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Status {
                provider: "GitHub",
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
