// ── File + keyring credential store ──
//
// Backs `aura_core::CredentialStore` with the TOML config file. Non-secret
// fields live in the file; secrets go to the system keyring unless the
// store is told to write them in plaintext.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use aura_core::{AuthMode, CoreError, CredentialStore, ProviderConfig, ProviderKind};

use crate::{
    Config, ConfigError, FogBugzSection, JiraSection, KEYRING_SERVICE, config_path, keyring_key,
    load_config_from, provider_config, save_config_to,
};

/// Where saved secrets are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecretStorage {
    /// System keyring (the default).
    #[default]
    Keyring,
    /// Inline in the config file.
    Plaintext,
}

/// `CredentialStore` reading and writing the aura config file.
///
/// Every `load` re-reads the file, so a save from another process is seen
/// on the next recheck.
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    path: PathBuf,
    storage: SecretStorage,
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringCredentialStore {
    /// Store at the canonical config path.
    pub fn new() -> Self {
        Self::at(config_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            storage: SecretStorage::default(),
        }
    }

    pub fn with_storage(mut self, storage: SecretStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Config, ConfigError> {
        load_config_from(&self.path)
    }

    /// Persist a secret. Returns the value to inline in the file, if any.
    fn store_secret(
        &self,
        provider: ProviderKind,
        secret: &SecretString,
    ) -> Result<Option<String>, ConfigError> {
        match self.storage {
            SecretStorage::Plaintext => Ok(Some(secret.expose_secret().to_owned())),
            SecretStorage::Keyring => {
                let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(provider))?;
                entry.set_password(secret.expose_secret())?;
                debug!(provider = %provider, "secret stored in keyring");
                Ok(None)
            }
        }
    }

    fn forget_secret(&self, provider: ProviderKind) {
        if self.storage != SecretStorage::Keyring {
            return;
        }
        let result = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(provider))
            .and_then(|entry| entry.delete_credential());
        match result {
            Ok(()) | Err(keyring::Error::NoEntry) => {}
            Err(e) => warn!(provider = %provider, error = %e, "could not clear keyring entry"),
        }
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self, provider: ProviderKind) -> Option<ProviderConfig> {
        let config = match self.read() {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "config unreadable");
                return None;
            }
        };
        match provider_config(&config, provider) {
            Ok(loaded) => loaded,
            Err(e) => {
                debug!(provider = %provider, error = %e, "stored credentials unusable");
                None
            }
        }
    }

    fn save(&self, config: &ProviderConfig) -> Result<(), CoreError> {
        config.validate()?;
        let mut file = self.read()?;

        match config {
            ProviderConfig::Jira(jira) => {
                let api_token = self.store_secret(ProviderKind::Jira, &jira.api_token)?;
                let api_token_env = file.jira.as_ref().and_then(|s| s.api_token_env.clone());
                file.jira = Some(JiraSection {
                    instance_url: jira.instance_url.to_string(),
                    email: jira.email.trim().to_owned(),
                    api_token,
                    api_token_env,
                });
            }
            ProviderConfig::FogBugz(fogbugz) => {
                let password = self.store_secret(ProviderKind::FogBugz, &fogbugz.password)?;
                let password_env = file.fogbugz.as_ref().and_then(|s| s.password_env.clone());
                file.fogbugz = Some(FogBugzSection {
                    instance_url: fogbugz.instance_url.to_string(),
                    email: fogbugz.email.trim().to_owned(),
                    password,
                    password_env,
                });
            }
        }

        save_config_to(&file, &self.path)?;
        debug!(provider = %config.provider(), path = %self.path.display(), "credentials saved");
        Ok(())
    }

    fn delete(&self, provider: ProviderKind) -> Result<(), CoreError> {
        if provider.auth_mode() != AuthMode::Credential {
            return Err(CoreError::ValidationFailed {
                message: format!("{} signs in through its CLI", provider.label()),
            });
        }

        let mut file = self.read()?;
        if file.remove(provider) {
            save_config_to(&file, &self.path)?;
        }
        self.forget_secret(provider);
        debug!(provider = %provider, "credentials deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use url::Url;

    use aura_core::{FogBugzConfig, JiraConfig};

    use super::*;

    fn plaintext_store(dir: &tempfile::TempDir) -> KeyringCredentialStore {
        KeyringCredentialStore::at(dir.path().join("config.toml"))
            .with_storage(SecretStorage::Plaintext)
    }

    fn jira() -> ProviderConfig {
        ProviderConfig::Jira(JiraConfig {
            instance_url: Url::parse("https://acme.atlassian.net").unwrap(),
            email: "ada@example.com".into(),
            api_token: SecretString::from("jira-token".to_string()),
        })
    }

    #[test]
    fn save_then_load_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let store = plaintext_store(&dir);
        assert!(store.load(ProviderKind::Jira).is_none());

        store.save(&jira()).unwrap();

        let Some(ProviderConfig::Jira(loaded)) = store.load(ProviderKind::Jira) else {
            panic!("expected jira config");
        };
        assert_eq!(loaded.email, "ada@example.com");
        assert_eq!(loaded.instance_url.as_str(), "https://acme.atlassian.net/");

        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(written.contains("[jira]"));
        assert!(written.contains("api_token = \"jira-token\""));
    }

    #[test]
    fn save_keeps_other_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sync]\nstale_after_failures = 2\n").unwrap();
        let store = KeyringCredentialStore::at(&path).with_storage(SecretStorage::Plaintext);

        store.save(&jira()).unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.sync.stale_after_failures, Some(2));
        assert!(cfg.jira.is_some());
    }

    #[test]
    fn save_rejects_blank_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = plaintext_store(&dir);
        let config = ProviderConfig::FogBugz(FogBugzConfig {
            instance_url: Url::parse("https://acme.fogbugz.com").unwrap(),
            email: "  ".into(),
            password: SecretString::from("pw".to_string()),
        });

        let err = store.save(&config).unwrap_err();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));
        assert!(!store.path().exists());
    }

    #[test]
    fn delete_removes_section() {
        let dir = tempfile::tempdir().unwrap();
        let store = plaintext_store(&dir);
        store.save(&jira()).unwrap();

        store.delete(ProviderKind::Jira).unwrap();

        assert!(store.load(ProviderKind::Jira).is_none());
        let cfg = load_config_from(store.path()).unwrap();
        assert!(cfg.jira.is_none());
    }

    #[test]
    fn delete_of_cli_provider_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = plaintext_store(&dir)
            .delete(ProviderKind::GitHub)
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: GitHub signs in through its CLI");
    }

    #[test]
    fn cli_providers_never_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = plaintext_store(&dir);
        store.save(&jira()).unwrap();
        assert!(store.load(ProviderKind::AzureDevOps).is_none());
    }
}
