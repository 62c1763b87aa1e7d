// ── Credential store boundary ──
//
// The view only ever reads through this trait, and only re-reads after
// `UnifiedView::credentials_changed`.

use dashmap::DashMap;

use crate::config::ProviderConfig;
use crate::error::CoreError;
use crate::model::ProviderKind;

pub trait CredentialStore: Send + Sync {
    /// Stored config for `provider`, or `None` when absent or unreadable.
    fn load(&self, provider: ProviderKind) -> Option<ProviderConfig>;

    fn save(&self, config: &ProviderConfig) -> Result<(), CoreError>;

    fn delete(&self, provider: ProviderKind) -> Result<(), CoreError>;
}

/// Process-local store. Used by tests and by one-shot runs that receive
/// credentials from the environment.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    configs: DashMap<ProviderKind, ProviderConfig>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, config: ProviderConfig) -> Self {
        self.configs.insert(config.provider(), config);
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self, provider: ProviderKind) -> Option<ProviderConfig> {
        self.configs.get(&provider).map(|c| c.value().clone())
    }

    fn save(&self, config: &ProviderConfig) -> Result<(), CoreError> {
        self.configs.insert(config.provider(), config.clone());
        Ok(())
    }

    fn delete(&self, provider: ProviderKind) -> Result<(), CoreError> {
        self.configs.remove(&provider);
        Ok(())
    }
}
