use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use super::models::{Case, Envelope, LogonData, Person, PersonData, SearchData};
use crate::error::{Error, body_preview};
use crate::transport::{TransportConfig, endpoint};

const ASSIGNED_QUERY: &str = "assignedto:me status:active";
const CASE_COLUMNS: [&str; 10] = [
    "ixBug",
    "sTitle",
    "sStatus",
    "sCategory",
    "sPriority",
    "sProject",
    "sArea",
    "dtLastUpdated",
    "tags",
    "fOpen",
];
const MAX_CASES: u32 = 200;

pub struct FogBugzClient {
    http: reqwest::Client,
    base_url: Url,
    email: String,
    password: SecretString,
}

impl FogBugzClient {
    pub fn new(
        base_url: Url,
        email: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            email: email.into(),
            password,
        })
    }

    /// Exchange email/password for a session token.
    pub async fn logon(&self) -> Result<SecretString, Error> {
        let body = json!({
            "email": self.email,
            "password": self.password.expose_secret(),
        });
        let data: LogonData = self.post("api/logon", &body).await.map_err(|e| match e {
            Error::Api { message, .. } => Error::Authentication { message },
            other => other,
        })?;

        data.token
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| Error::Authentication {
                message: "Logon succeeded but no token returned".into(),
            })
    }

    /// The person owning `token`.
    pub async fn view_person(&self, token: &SecretString) -> Result<Option<Person>, Error> {
        let body = json!({ "token": token.expose_secret() });
        let data: PersonData = self.post("api/viewPerson", &body).await?;
        Ok(data.person)
    }

    /// Active cases assigned to the logged-in user.
    pub async fn assigned_cases(&self, token: &SecretString) -> Result<Vec<Case>, Error> {
        let body = json!({
            "token": token.expose_secret(),
            "q": ASSIGNED_QUERY,
            "cols": CASE_COLUMNS,
            "max": MAX_CASES,
        });
        let data: SearchData = self.post("api/search", &body).await?;

        let base = self.base_url.as_str().trim_end_matches('/');
        let cases: Vec<Case> = data
            .cases
            .into_iter()
            .map(|mut case| {
                case.web_url = Some(format!("{base}/f/cases/{}", case.id));
                case
            })
            .collect();

        debug!(count = cases.len(), "fogbugz assigned cases");
        Ok(cases)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        let url = endpoint(&self.base_url, path)?;
        debug!("POST {}", url);
        let resp = self.http.post(url).json(body).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Status {
                provider: "FogBugz",
                status: status.as_u16(),
                body: body_preview(&text),
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body_preview(&text),
            })?;
        unwrap_envelope(envelope)
    }
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, Error> {
    let messages: Vec<String> = envelope
        .errors
        .into_iter()
        .filter_map(|e| e.message)
        .collect();
    let code = envelope
        .error_code
        .filter(|c| !c.is_null())
        .map(|c| c.to_string());

    if !messages.is_empty() {
        return Err(Error::Api {
            provider: "FogBugz",
            message: messages.join("; "),
            code,
        });
    }
    if let Some(code) = code {
        return Err(Error::Api {
            provider: "FogBugz",
            message: format!("error code {code}"),
            code: Some(code),
        });
    }

    envelope.data.ok_or_else(|| Error::Deserialization {
        message: "response has no data".into(),
        body: String::new(),
    })
}
