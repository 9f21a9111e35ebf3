//! # Settings Store
//!
//! Scalar key/value settings read and written by the manager (languages,
//! auto-lock period, onboarding flag). No transactional semantics.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|value| matches!(value.trim(), "1" | "true"))
            .unwrap_or(false)
    }

    fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|value| value.trim().parse().ok())
    }
}

/// Cloneable in-memory store; clones share the same values.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettings {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            values: Arc::new(RwLock::new(map)),
        }
    }
}

impl SettingsStore for InMemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }
}
