//! Preference store for the presentation adapter.
//!
//! Theme and locale settings live here instead of in shared mutable UI
//! state. The store is passed by reference to the presentation layer;
//! the core engine never reads it.

use std::collections::BTreeMap;

use dashmap::DashMap;

/// Concurrent key-value store for UI preferences
#[derive(Debug, Default)]
pub struct PreferenceStore {
    entries: DashMap<String, String>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for a preference key
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Set a preference, returning the previous value if any
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a preference, returning its value if it was set
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.remove(key).map(|(_, value)| value)
    }

    /// All preferences, sorted by key
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
