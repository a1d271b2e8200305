//! Persistent store adapter
//!
//! JSON get-or-default / best-effort set over the platform's key/value
//! storage. Nothing here ever fails: unreadable values come back as the
//! caller's fallback, and rejected writes are logged and dropped. The
//! in-memory session stays the source of truth either way.

use serde::{de::DeserializeOwned, Serialize};

use crate::state::Platform;

#[derive(Clone)]
pub struct PersistentStore {
    platform: Platform,
}

impl PersistentStore {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    /// Read and deserialize `key`, or return `fallback` if the key is
    /// missing, the value is malformed, or the backend refuses the read.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.platform.storage_load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::warn!(key, error = %e, "Storage read failed, using fallback");
                return fallback;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value is malformed, using fallback");
                fallback
            }
        }
    }

    /// Serialize and write `value` under `key`. Failures are swallowed.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to serialize value for storage");
                return;
            }
        };

        if let Err(e) = self.platform.storage_save(key, &raw) {
            tracing::warn!(key, error = %e, "Storage write failed, continuing without persistence");
        }
    }

    /// Remove `key`. Failures are swallowed.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.platform.storage_remove(key) {
            tracing::warn!(key, error = %e, "Storage remove failed");
        }
    }
}
