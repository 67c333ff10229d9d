//! In-memory settings store

use std::collections::HashMap;

use super::SettingsStore;

/// `SettingsStore` backed by a nested map, usually built from the
/// `[settings]` table of the application configuration.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsStore {
    values: HashMap<String, HashMap<String, String>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: HashMap<String, HashMap<String, String>>) -> Self {
        Self { values }
    }

    /// Insert or replace a value
    pub fn set(&mut self, section: impl Into<String>, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn with(mut self, section: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(section, key, value);
        self
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.values.get(section)?.get(key).cloned()
    }
}
