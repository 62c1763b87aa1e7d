// ── Core error types ──
//
// User-facing errors from aura-core. Consumers never see raw HTTP status
// codes or subprocess exit states; the `From<aura_api::Error>` impl
// translates transport failures into domain variants.

use thiserror::Error;

use crate::model::ProviderKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{message}")]
    NotLoggedIn { message: String },

    // ── Connectivity ─────────────────────────────────────────────────
    #[error("Cannot reach provider: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("{program} CLI is not available: {reason}")]
    CliUnavailable { program: String, reason: String },

    // ── Provider errors (wrapped, not exposed raw) ───────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{provider} is not configured")]
    NotConfigured { provider: ProviderKind },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aura_api::Error> for CoreError {
    fn from(err: aura_api::Error) -> Self {
        match err {
            aura_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            e @ aura_api::Error::NotLoggedIn { .. } => CoreError::NotLoggedIn {
                message: e.to_string(),
            },
            aura_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            aura_api::Error::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            aura_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            aura_api::Error::Status {
                provider,
                status,
                body,
            } => {
                if matches!(status, 401 | 403) {
                    CoreError::AuthenticationFailed {
                        message: format!("{provider} rejected the credentials ({status})"),
                    }
                } else {
                    CoreError::Api {
                        message: format!("{provider} API error {status}: {body}"),
                        status: Some(status),
                    }
                }
            }
            aura_api::Error::Api {
                provider, message, ..
            } => CoreError::Api {
                message: format!("{provider}: {message}"),
                status: None,
            },
            aura_api::Error::CliUnavailable { program, reason } => {
                CoreError::CliUnavailable { program, reason }
            }
            e @ aura_api::Error::CliFailed { .. } => CoreError::Api {
                message: e.to_string(),
                status: None,
            },
            aura_api::Error::NotConfigured(message) => CoreError::Config { message },
            aura_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

// ── Fetch / normalize errors ─────────────────────────────────────────

/// A provider fetch failure. The message is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<aura_api::Error> for FetchError {
    fn from(err: aura_api::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<CoreError> for FetchError {
    fn from(err: CoreError) -> Self {
        Self::new(err.to_string())
    }
}

/// A native item that cannot be mapped into a `UnifiedItem`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("{provider} item {native_id} has no {field}")]
    MissingField {
        provider: ProviderKind,
        native_id: String,
        field: &'static str,
    },

    #[error("{provider} item {native_id} has an unparseable timestamp: {value}")]
    BadTimestamp {
        provider: ProviderKind,
        native_id: String,
        value: String,
    },
}
