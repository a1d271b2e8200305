//! Platform DI Container
//!
//! This module provides the `Platform` struct - a dependency injection container
//! that aggregates all platform-specific service implementations behind port traits.
//!
//! Usage:
//! - Created by `create_platform()` in platform/desktop.rs or platform/wasm.rs
//! - Created by `mock::create_mock_platform()` in tests
//! - Handed to `SessionController::bootstrap` and `ReplyResolver::from_config`

use std::{future::Future, pin::Pin, sync::Arc};

use chrono::{DateTime, Utc};

use crate::ports::outbound::{
    LocationProvider, PlatformError, SleepProvider, StorageProvider, TimeProvider,
};

/// Unified platform services container
#[derive(Clone)]
pub struct Platform {
    time: Arc<dyn TimeProviderDyn>,
    sleep: Arc<dyn SleepProviderDyn>,
    storage: Arc<dyn StorageProviderDyn>,
    location: Arc<dyn LocationProviderDyn>,
}

// =============================================================================
// Dynamic trait versions for Arc storage (need Send + Sync for Dioxus context)
// =============================================================================

trait TimeProviderDyn: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

trait SleepProviderDyn: Send + Sync {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>>;
}

trait StorageProviderDyn: Send + Sync {
    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError>;
    fn load(&self, key: &str) -> Result<Option<String>, PlatformError>;
    fn remove(&self, key: &str) -> Result<(), PlatformError>;
}

trait LocationProviderDyn: Send + Sync {
    fn fragment(&self) -> String;
    fn replace_fragment(&self, fragment: &str) -> Result<(), PlatformError>;
}

// =============================================================================
// Blanket implementations - convert port traits to dyn-safe wrappers
// =============================================================================

impl<T: TimeProvider + Send + Sync> TimeProviderDyn for T {
    fn now(&self) -> DateTime<Utc> {
        TimeProvider::now(self)
    }
}

impl<T: SleepProvider + Send + Sync> SleepProviderDyn for T {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        SleepProvider::sleep_ms(self, ms)
    }
}

impl<T: StorageProvider + Send + Sync> StorageProviderDyn for T {
    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        StorageProvider::save(self, key, value)
    }
    fn load(&self, key: &str) -> Result<Option<String>, PlatformError> {
        StorageProvider::load(self, key)
    }
    fn remove(&self, key: &str) -> Result<(), PlatformError> {
        StorageProvider::remove(self, key)
    }
}

impl<T: LocationProvider + Send + Sync> LocationProviderDyn for T {
    fn fragment(&self) -> String {
        LocationProvider::fragment(self)
    }
    fn replace_fragment(&self, fragment: &str) -> Result<(), PlatformError> {
        LocationProvider::replace_fragment(self, fragment)
    }
}

// =============================================================================
// Platform implementation
// =============================================================================

impl Platform {
    /// Create a new Platform with the given providers
    pub fn new<Tm, Sl, S, L>(time: Tm, sleep: Sl, storage: S, location: L) -> Self
    where
        Tm: TimeProvider + Send + Sync,
        Sl: SleepProvider + Send + Sync,
        S: StorageProvider + Send + Sync,
        L: LocationProvider + Send + Sync,
    {
        Self {
            time: Arc::new(time),
            sleep: Arc::new(sleep),
            storage: Arc::new(storage),
            location: Arc::new(location),
        }
    }

    // -------------------------------------------------------------------------
    // Time operations
    // -------------------------------------------------------------------------

    /// Current wall-clock time
    pub fn now(&self) -> DateTime<Utc> {
        self.time.now()
    }

    // -------------------------------------------------------------------------
    // Sleep operations
    // -------------------------------------------------------------------------

    /// Sleep for the given number of milliseconds.
    pub fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        self.sleep.sleep_ms(ms)
    }

    // -------------------------------------------------------------------------
    // Storage operations
    // -------------------------------------------------------------------------

    /// Save a string value with the given key
    pub fn storage_save(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        self.storage.save(key, value)
    }

    /// Load a string value by key
    pub fn storage_load(&self, key: &str) -> Result<Option<String>, PlatformError> {
        self.storage.load(key)
    }

    /// Remove a value by key
    pub fn storage_remove(&self, key: &str) -> Result<(), PlatformError> {
        self.storage.remove(key)
    }

    // -------------------------------------------------------------------------
    // Location operations
    // -------------------------------------------------------------------------

    /// Current URL fragment without the leading `#`
    pub fn fragment(&self) -> String {
        self.location.fragment()
    }

    /// Replace the URL fragment without creating a history entry
    pub fn replace_fragment(&self, fragment: &str) -> Result<(), PlatformError> {
        self.location.replace_fragment(fragment)
    }
}
