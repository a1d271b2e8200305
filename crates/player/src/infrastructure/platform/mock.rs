//! Mock platform for tests
//!
//! In-memory providers with knobs for the failure paths: storage that throws
//! on read or write, a location bar that refuses updates, and sleep futures
//! that either fire immediately or never.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::{future::Future, pin::Pin};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::ports::outbound::platform::{
    LocationProvider, PlatformError, SleepProvider, StorageProvider, TimeProvider,
};
use crate::state::Platform;

/// Clock that advances one second per reading so timestamps stay ordered
#[derive(Clone)]
pub struct MockTimeProvider {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl Default for MockTimeProvider {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }
}

impl TimeProvider for MockTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        let current = *guard;
        *guard = current + Duration::seconds(1);
        current
    }
}

/// How mock sleeps behave
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SleepMode {
    /// Every sleep completes on first poll; timeouts fire immediately
    #[default]
    Instant,
    /// Sleeps never complete; timeouts never fire
    Never,
}

#[derive(Clone, Default)]
pub struct MockSleepProvider {
    mode: SleepMode,
    calls: Arc<AtomicUsize>,
}

impl MockSleepProvider {
    pub fn new(mode: SleepMode) -> Self {
        Self {
            mode,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SleepProvider for MockSleepProvider {
    fn sleep_ms(&self, _ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            SleepMode::Instant => Box::pin(futures_util::future::ready(())),
            SleepMode::Never => Box::pin(futures_util::future::pending()),
        }
    }
}

/// In-memory storage with failure injection
#[derive(Clone, Default)]
pub struct MockStorageProvider {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MockStorageProvider {
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Put a raw value in place, bypassing failure injection
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    /// Read a raw value, bypassing failure injection
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl StorageProvider for MockStorageProvider {
    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PlatformError::QuotaExceeded(key.to_string()));
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, PlatformError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable(key.to_string()));
        }
        Ok(self.raw(key))
    }

    fn remove(&self, key: &str) -> Result<(), PlatformError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable(key.to_string()));
        }
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// In-memory address bar that records how often it was replaced
#[derive(Clone, Default)]
pub struct MockLocationProvider {
    fragment: Arc<Mutex<String>>,
    replacements: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MockLocationProvider {
    pub fn with_fragment(fragment: &str) -> Self {
        let location = Self::default();
        *location.fragment.lock().unwrap_or_else(PoisonError::into_inner) =
            fragment.trim_start_matches('#').to_string();
        location
    }

    pub fn replacements(&self) -> usize {
        self.replacements.load(Ordering::SeqCst)
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl LocationProvider for MockLocationProvider {
    fn fragment(&self) -> String {
        self.fragment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_fragment(&self, fragment: &str) -> Result<(), PlatformError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable("history".into()));
        }
        *self.fragment.lock().unwrap_or_else(PoisonError::into_inner) =
            fragment.trim_start_matches('#').to_string();
        self.replacements.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Mock platform plus handles to every provider for assertions
#[derive(Clone)]
pub struct MockPlatform {
    pub platform: Platform,
    pub storage: MockStorageProvider,
    pub location: MockLocationProvider,
    pub sleep: MockSleepProvider,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::with_parts(
            MockStorageProvider::default(),
            MockLocationProvider::default(),
            SleepMode::Instant,
        )
    }

    /// Build a platform over existing providers, e.g. to simulate a reload
    /// that keeps the same storage.
    pub fn with_parts(
        storage: MockStorageProvider,
        location: MockLocationProvider,
        sleep_mode: SleepMode,
    ) -> Self {
        let sleep = MockSleepProvider::new(sleep_mode);
        let platform = Platform::new(
            MockTimeProvider::default(),
            sleep.clone(),
            storage.clone(),
            location.clone(),
        );
        Self {
            platform,
            storage,
            location,
            sleep,
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a mock platform with empty storage and an empty fragment
pub fn create_mock_platform() -> MockPlatform {
    MockPlatform::new()
}
