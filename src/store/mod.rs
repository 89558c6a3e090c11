//! Local preference storage
//!
//! Persists the API key and the two boolean preferences as string values in
//! a flat key-value store. Every write is persisted immediately.

pub mod file;
pub mod mock;

pub use file::FileStore;
pub use mock::MemoryStore;

use crate::models::{Credentials, Preferences};
use crate::Result;

pub const API_KEY: &str = "gemini_api_key";
pub const AUTO_ENHANCE: &str = "auto_enhance";
pub const DARK_MODE: &str = "dark_mode";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Typed view over a [`KeyValueStore`].
pub struct Settings {
    store: Box<dyn KeyValueStore>,
}

impl Settings {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored credentials; an unreadable store yields an empty key.
    pub fn credentials(&self) -> Credentials {
        match self.store.get(API_KEY) {
            Ok(key) => Credentials::new(key.unwrap_or_default()),
            Err(e) => {
                tracing::warn!("Could not read API key from preference store: {}", e);
                Credentials::default()
            }
        }
    }

    pub fn set_api_key(&self, key: &str) -> Result<()> {
        self.store.set(API_KEY, key)
    }

    pub fn clear_api_key(&self) -> Result<()> {
        self.store.remove(API_KEY)
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            auto_enhance: self.flag(AUTO_ENHANCE),
            dark_mode: self.flag(DARK_MODE),
        }
    }

    pub fn set_auto_enhance(&self, enabled: bool) -> Result<()> {
        self.store.set(AUTO_ENHANCE, bool_str(enabled))
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.store.set(DARK_MODE, bool_str(enabled))
    }

    fn flag(&self, key: &str) -> bool {
        match self.store.get(key) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!("Could not read preference '{}': {}", key, e);
                false
            }
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_store_is_empty() {
        let settings = Settings::new(Box::new(MemoryStore::new()));
        assert!(settings.credentials().is_empty());
        assert_eq!(settings.preferences(), Preferences::default());
    }

    #[test]
    fn test_flags_are_stored_as_strings() {
        let store = MemoryStore::new();
        let settings = Settings::new(Box::new(store.clone()));

        settings.set_auto_enhance(true).unwrap();
        settings.set_dark_mode(false).unwrap();

        assert_eq!(store.get(AUTO_ENHANCE).unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(DARK_MODE).unwrap().as_deref(), Some("false"));
        assert_eq!(
            settings.preferences(),
            Preferences {
                auto_enhance: true,
                dark_mode: false
            }
        );
    }

    #[test]
    fn test_unrecognised_flag_value_reads_as_false() {
        let store = MemoryStore::new().with_value(AUTO_ENHANCE, "yes");
        let settings = Settings::new(Box::new(store));
        assert!(!settings.preferences().auto_enhance);
    }

    #[test]
    fn test_api_key_round_trip_and_clear() {
        let settings = Settings::new(Box::new(MemoryStore::new()));

        settings.set_api_key("secret-key").unwrap();
        assert_eq!(settings.credentials(), Credentials::new("secret-key"));

        settings.clear_api_key().unwrap();
        assert!(settings.credentials().is_empty());
    }

    #[test]
    fn test_read_failure_degrades_to_defaults() {
        let settings = Settings::new(Box::new(MemoryStore::new().with_failure(true)));
        assert!(settings.credentials().is_empty());
        assert!(!settings.preferences().dark_mode);
        assert!(settings.set_api_key("k").is_err());
    }
}
