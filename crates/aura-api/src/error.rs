use thiserror::Error;

/// Top-level error type for the `aura-api` crate.
///
/// Covers every failure mode across the provider transports:
/// authentication, HTTP transport, provider API envelopes, and CLI
/// subprocesses. `aura-core` flattens these into fetch diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected by the provider.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A CLI-delegated provider is installed but not logged in.
    #[error("{program} CLI not authenticated. Run `{login_hint}` first.")]
    NotLoggedIn {
        program: &'static str,
        login_hint: &'static str,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success HTTP status with a preview of the response body.
    #[error("{provider} API error {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// Provider-level error envelope on an otherwise successful response.
    #[error("{provider} error: {message}")]
    Api {
        provider: &'static str,
        message: String,
        code: Option<String>,
    },

    // ── CLI ─────────────────────────────────────────────────────────
    /// The CLI binary could not be spawned.
    #[error("{program} CLI not found: {reason}")]
    CliUnavailable { program: String, reason: String },

    /// The CLI ran but exited unsuccessfully.
    #[error("{program} {command} failed: {stderr}")]
    CliFailed {
        program: String,
        command: String,
        stderr: String,
    },

    /// The CLI lacks required local configuration (e.g. default org).
    #[error("{0}")]
    NotConfigured(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Parse error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if retrying later might succeed without user action.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the failure means the credentials are not usable.
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::NotLoggedIn { .. } => true,
            Self::Status { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}

/// Truncate a response body for inclusion in an error message.
pub(crate) fn body_preview(body: &str) -> String {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    body[..end].to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let limited = Error::Status {
            provider: "Jira",
            status: 429,
            body: String::new(),
        };
        assert!(limited.is_transient());
        assert!(!limited.is_auth());

        let denied = Error::Status {
            provider: "GitHub",
            status: 401,
            body: String::new(),
        };
        assert!(denied.is_auth());
        assert!(!denied.is_transient());
    }

    #[test]
    fn body_preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        let preview = body_preview(&body);
        assert_eq!(preview.chars().count(), 200);
    }

    #[test]
    fn not_logged_in_message_carries_hint() {
        let err = Error::NotLoggedIn {
            program: "Azure",
            login_hint: "az login",
        };
        assert_eq!(
            err.to_string(),
            "Azure CLI not authenticated. Run `az login` first."
        );
    }
}
