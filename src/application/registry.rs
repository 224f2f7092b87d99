use crate::domain::provider::ProviderRef;
use crate::error::{Result, SettlementError};
use std::collections::{BTreeSet, HashMap};

/// Resolves provider names to their implementation.
///
/// Built once at startup and never mutated afterwards, so it can be shared
/// across tasks behind an `Arc` without locking.
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderRef>,
}

impl ProviderRegistry {
    /// Indexes the given providers by lower-cased name.
    ///
    /// Fails if two providers report the same name.
    pub fn new(providers: impl IntoIterator<Item = ProviderRef>) -> Result<Self> {
        let mut index = HashMap::new();
        for provider in providers {
            let key = provider.name().to_lowercase();
            if index.contains_key(&key) {
                return Err(SettlementError::DuplicateProvider(key));
            }
            index.insert(key, provider);
        }
        Ok(Self { providers: index })
    }

    /// Case-insensitive lookup.
    pub fn resolve(&self, name: &str) -> Result<ProviderRef> {
        self.providers
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| SettlementError::UnsupportedProvider(name.to_string()))
    }

    pub fn list_providers(&self) -> BTreeSet<String> {
        self.providers.keys().cloned().collect()
    }
}
