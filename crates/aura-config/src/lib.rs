//! Shared configuration for the aura CLI and TUI.
//!
//! One TOML file, secret resolution (env + keyring + plaintext), and
//! translation to `aura_core::ProviderConfig`. [`KeyringCredentialStore`]
//! serves the same file to the core as its `CredentialStore`.

mod store;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use aura_api::TransportConfig;
use aura_core::{CoreError, FogBugzConfig, JiraConfig, ProviderConfig, ProviderKind, SyncConfig};

pub use store::{KeyringCredentialStore, SecretStorage};

/// Keyring service name shared by every stored secret.
pub const KEYRING_SERVICE: &str = "aura";

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "AURA_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {secret} configured for {provider}")]
    NoCredentials {
        provider: &'static str,
        secret: &'static str,
    },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Sync tuning.
    #[serde(default)]
    pub sync: SyncSection,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira: Option<JiraSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fogbugz: Option<FogBugzSection>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyncSection {
    /// Clear a provider's last good items after this many failed fetches
    /// in a row. Unset keeps them indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_after_failures: Option<u32>,
}

/// Jira connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JiraSection {
    /// Site URL (e.g., "https://acme.atlassian.net").
    pub instance_url: String,

    pub email: String,

    /// API token (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Environment variable holding the API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token_env: Option<String>,
}

/// FogBugz connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FogBugzSection {
    pub instance_url: String,

    pub email: String,

    /// Password (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable holding the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

impl Config {
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            stale_after_failures: self.sync.stale_after_failures,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(Duration::from_secs(self.defaults.timeout))
    }

    /// Whether a section exists for a credential-based provider.
    pub fn has_section(&self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::Jira => self.jira.is_some(),
            ProviderKind::FogBugz => self.fogbugz.is_some(),
            ProviderKind::GitHub | ProviderKind::AzureDevOps => false,
        }
    }

    /// Drop a provider's section. Returns whether one existed.
    pub fn remove(&mut self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::Jira => self.jira.take().is_some(),
            ProviderKind::FogBugz => self.fogbugz.take().is_some(),
            ProviderKind::GitHub | ProviderKind::AzureDevOps => false,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `AURA_CONFIG`, then platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("dev", "aura", "aura").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aura");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` layered over defaults and `AURA_` env vars.
///
/// Nested keys use a double underscore: `AURA_SYNC__STALE_AFTER_FAILURES=3`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AURA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Secret resolution ───────────────────────────────────────────────

/// Keyring account for a provider's secret, e.g. `jira/api-token`.
pub fn keyring_key(provider: ProviderKind) -> String {
    format!("{}/{}", provider.tag(), secret_slug(provider))
}

/// Default env var for a provider's secret, e.g. `AURA_JIRA_API_TOKEN`.
pub fn default_secret_env(provider: ProviderKind) -> String {
    format!(
        "AURA_{}_{}",
        provider.tag().to_uppercase(),
        secret_slug(provider).replace('-', "_").to_uppercase()
    )
}

fn secret_slug(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Jira => "api-token",
        ProviderKind::FogBugz => "password",
        ProviderKind::GitHub | ProviderKind::AzureDevOps => "token",
    }
}

fn secret_label(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Jira => "API token",
        ProviderKind::FogBugz => "password",
        ProviderKind::GitHub | ProviderKind::AzureDevOps => "token",
    }
}

/// Resolve a provider secret: env var (section override, then default
/// name) → system keyring → plaintext in config.
pub fn resolve_secret(
    provider: ProviderKind,
    env_name: Option<&str>,
    plaintext: Option<&str>,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    let default_env = default_secret_env(provider);
    for name in env_name.into_iter().chain([default_env.as_str()]) {
        if let Ok(val) = std::env::var(name) {
            if !val.is_empty() {
                return Ok(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(provider)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(secret) = plaintext.filter(|s| !s.is_empty()) {
        return Ok(SecretString::from(secret.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        provider: provider.label(),
        secret: secret_label(provider),
    })
}

fn parse_instance_url(raw: &str) -> Result<Url, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Validation {
        field: "instance_url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

pub fn jira_config(section: &JiraSection) -> Result<JiraConfig, ConfigError> {
    Ok(JiraConfig {
        instance_url: parse_instance_url(&section.instance_url)?,
        email: section.email.clone(),
        api_token: resolve_secret(
            ProviderKind::Jira,
            section.api_token_env.as_deref(),
            section.api_token.as_deref(),
        )?,
    })
}

pub fn fogbugz_config(section: &FogBugzSection) -> Result<FogBugzConfig, ConfigError> {
    Ok(FogBugzConfig {
        instance_url: parse_instance_url(&section.instance_url)?,
        email: section.email.clone(),
        password: resolve_secret(
            ProviderKind::FogBugz,
            section.password_env.as_deref(),
            section.password.as_deref(),
        )?,
    })
}

/// Build the runtime config for one provider. `Ok(None)` when the provider
/// has no section (or needs none).
pub fn provider_config(
    cfg: &Config,
    provider: ProviderKind,
) -> Result<Option<ProviderConfig>, ConfigError> {
    match provider {
        ProviderKind::Jira => cfg
            .jira
            .as_ref()
            .map(|s| jira_config(s).map(ProviderConfig::Jira))
            .transpose(),
        ProviderKind::FogBugz => cfg
            .fogbugz
            .as_ref()
            .map(|s| fogbugz_config(s).map(ProviderConfig::FogBugz))
            .transpose(),
        ProviderKind::GitHub | ProviderKind::AzureDevOps => Ok(None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.sync_config(), SyncConfig::default());
        assert!(cfg.jira.is_none());
    }

    #[test]
    fn reads_sections_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[defaults]
timeout = 10

[sync]
stale_after_failures = 3

[jira]
instance_url = "https://acme.atlassian.net"
email = "ada@example.com"
api_token = "plain"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.sync_config().stale_after_failures, Some(3));
        assert_eq!(cfg.transport().timeout, Duration::from_secs(10));
        assert_eq!(cfg.defaults.output, "table");

        let Some(ProviderConfig::Jira(jira)) = provider_config(&cfg, ProviderKind::Jira).unwrap()
        else {
            panic!("expected jira config");
        };
        assert_eq!(jira.instance_url.host_str(), Some("acme.atlassian.net"));
        assert_eq!(jira.api_token.expose_secret(), "plain");
        assert!(
            provider_config(&cfg, ProviderKind::FogBugz)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn unset_env_var_falls_through_to_plaintext() {
        let name = "AURA_TEST_FOGBUGZ_SECRET_UNSET";
        let section = FogBugzSection {
            instance_url: "https://acme.fogbugz.com".into(),
            email: "grace@example.com".into(),
            password: Some("plain".into()),
            password_env: Some(name.into()),
        };
        let cfg = fogbugz_config(&section).unwrap();
        assert_eq!(cfg.password.expose_secret(), "plain");
    }

    #[test]
    fn missing_secret_is_reported() {
        let section = JiraSection {
            instance_url: "https://acme.atlassian.net".into(),
            email: "ada@example.com".into(),
            api_token: None,
            api_token_env: Some("AURA_TEST_JIRA_TOKEN_UNSET".into()),
        };
        // Skip when a developer keyring or env var happens to hold a token.
        if std::env::var(default_secret_env(ProviderKind::Jira)).is_ok() {
            return;
        }
        match jira_config(&section) {
            Err(ConfigError::NoCredentials { provider, secret }) => {
                assert_eq!(provider, "Jira");
                assert_eq!(secret, "API token");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => {}
        }
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let section = JiraSection {
            instance_url: "not a url".into(),
            email: "ada@example.com".into(),
            api_token: Some("t".into()),
            api_token_env: None,
        };
        let err = jira_config(&section).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "instance_url"));
    }

    #[test]
    fn secret_names() {
        assert_eq!(keyring_key(ProviderKind::Jira), "jira/api-token");
        assert_eq!(keyring_key(ProviderKind::FogBugz), "fogbugz/password");
        assert_eq!(default_secret_env(ProviderKind::Jira), "AURA_JIRA_API_TOKEN");
        assert_eq!(
            default_secret_env(ProviderKind::FogBugz),
            "AURA_FOGBUGZ_PASSWORD"
        );
    }

    #[test]
    fn remove_reports_existing_section() {
        let mut cfg = Config {
            fogbugz: Some(FogBugzSection {
                instance_url: "https://acme.fogbugz.com".into(),
                email: "grace@example.com".into(),
                password: None,
                password_env: None,
            }),
            ..Config::default()
        };
        assert!(cfg.has_section(ProviderKind::FogBugz));
        assert!(cfg.remove(ProviderKind::FogBugz));
        assert!(!cfg.remove(ProviderKind::FogBugz));
        assert!(!cfg.remove(ProviderKind::GitHub));
    }
}
