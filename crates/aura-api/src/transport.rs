// Shared transport configuration for building reqwest::Client instances.
//
// Every REST provider client shares timeout and user-agent settings
// through this module.

use std::time::Duration;

use reqwest::header::HeaderMap;

const USER_AGENT: &str = concat!("aura/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        self.build_client_with_headers(HeaderMap::new())
    }

    /// Build a `reqwest::Client` with additional default headers.
    ///
    /// Used by the GitHub client to inject its API version headers.
    pub fn build_client_with_headers(
        &self,
        headers: HeaderMap,
    ) -> Result<reqwest::Client, crate::error::Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .build()?;
        Ok(client)
    }
}

/// Join a relative API path onto a base URL, treating the base as a
/// directory even when it lacks a trailing slash.
pub(crate) fn endpoint(base: &url::Url, path: &str) -> Result<url::Url, crate::error::Error> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let base = url::Url::parse("https://example.com/jira").unwrap();
        let url = endpoint(&base, "/rest/api/3/myself").unwrap();
        assert_eq!(url.as_str(), "https://example.com/jira/rest/api/3/myself");
    }

    #[test]
    fn endpoint_on_bare_host() {
        let base = url::Url::parse("https://api.github.com").unwrap();
        let url = endpoint(&base, "search/issues").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/search/issues");
    }
}
