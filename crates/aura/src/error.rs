//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use aura_config::ConfigError;
use aura_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Providers ────────────────────────────────────────────────────
    #[error("No providers are connected for {kind}")]
    #[diagnostic(
        code(aura::no_providers),
        help(
            "GitHub:       run `gh auth login`\n\
             Azure DevOps: run `az login` and `az devops configure --defaults organization=… project=…`\n\
             Jira:         run `aura config set-jira`\n\
             FogBugz:      run `aura config set-fogbugz`\n\
             Check with:   aura auth status"
        )
    )]
    NoProvidersConnected { kind: String },

    #[error("{program} CLI is not available: {reason}")]
    #[diagnostic(
        code(aura::cli_unavailable),
        help("Install {program} and make sure it is on your PATH.")
    )]
    CliUnavailable { program: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(aura::auth_failed),
        help("Re-enter credentials with `aura config set-jira` or `aura config set-fogbugz`.")
    )]
    AuthFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(aura::not_logged_in))]
    NotLoggedIn { message: String },

    // ── Connectivity ─────────────────────────────────────────────────
    #[error("Could not reach provider: {reason}")]
    #[diagnostic(
        code(aura::connection_failed),
        help("Check the instance URL with `aura config show` and your network connection.")
    )]
    ConnectionFailed { reason: String },

    #[error("Timed out after {seconds}s waiting for providers")]
    #[diagnostic(
        code(aura::timeout),
        help("Increase the timeout with --timeout or `defaults.timeout` in the config file.")
    )]
    Timeout { seconds: u64 },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(aura::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aura::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(aura::config),
        help("Config file: {path}")
    )]
    Config { message: String, path: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(aura::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(aura::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(aura::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoProvidersConnected { .. } | Self::AuthFailed { .. } | Self::NotLoggedIn { .. } => {
                exit_code::AUTH
            }
            Self::ConnectionFailed { .. } | Self::CliUnavailable { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::NotLoggedIn { message } => CliError::NotLoggedIn { message },
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::Timeout => CliError::ConnectionFailed {
                reason: "request timed out".into(),
            },
            CoreError::CliUnavailable { program, reason } => {
                CliError::CliUnavailable { program, reason }
            }
            CoreError::Api { message, status: _ } => CliError::ApiError { message },
            CoreError::NotConfigured { provider } => CliError::Config {
                message: format!("{provider} is not configured"),
                path: aura_config::config_path().display().to_string(),
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => CliError::Config {
                message,
                path: aura_config::config_path().display().to_string(),
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path: aura_config::config_path().display().to_string(),
            },
        }
    }
}
