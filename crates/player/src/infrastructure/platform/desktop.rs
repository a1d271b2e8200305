//! Desktop platform implementations
//!
//! Provides platform-specific implementations for desktop using
//! standard library and native crates.

use crate::ports::outbound::platform::{
    LocationProvider, PlatformError, SleepProvider, StorageProvider, TimeProvider,
};
use crate::state::Platform;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use std::{future::Future, pin::Pin, sync::Arc};

/// Desktop time provider using the system clock
#[derive(Clone, Default)]
pub struct DesktopTimeProvider;

impl TimeProvider for DesktopTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Desktop storage provider with file-based persistence
///
/// Stores key-value pairs in a JSON file at:
/// - Linux: ~/.config/player/storage.json
/// - macOS: ~/Library/Application Support/org.littleexplorers.player/storage.json
/// - Windows: C:\Users\<User>\AppData\Roaming\littleexplorers\player\storage.json
#[derive(Clone)]
pub struct DesktopStorageProvider {
    /// Path to the storage file
    storage_path: PathBuf,
    /// In-memory cache of stored values
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for DesktopStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopStorageProvider {
    /// Create a new desktop storage provider in the platform config directory
    pub fn new() -> Self {
        let storage_path =
            if let Some(dirs) = ProjectDirs::from("org", "littleexplorers", "player") {
                dirs.config_dir().join("storage.json")
            } else {
                // Fallback to current directory if project dirs unavailable
                PathBuf::from("littleexplorers_storage.json")
            };

        Self::with_path(storage_path)
    }

    /// Create a storage provider backed by an explicit file.
    ///
    /// Loads existing data from the file if it exists. An unreadable or
    /// corrupt file starts an empty store.
    pub fn with_path(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();

        let cache = if storage_path.exists() {
            match fs::read_to_string(&storage_path) {
                Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        tracing::warn!("Failed to parse storage file: {}", e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read storage file: {}", e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        tracing::debug!("Desktop storage initialized at: {:?}", storage_path);

        Self {
            storage_path,
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Persist the cache to disk
    fn persist(&self) -> Result<(), PlatformError> {
        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    PlatformError::Io(format!("create storage directory: {e}"))
                })?;
            }
        }

        let data = {
            let cache = self
                .cache
                .read()
                .map_err(|e| PlatformError::Io(format!("storage lock poisoned: {e}")))?;
            serde_json::to_string_pretty(&*cache)
                .map_err(|e| PlatformError::Io(format!("serialize storage: {e}")))?
        };

        fs::write(&self.storage_path, data)
            .map_err(|e| PlatformError::Io(format!("write storage file: {e}")))
    }
}

impl StorageProvider for DesktopStorageProvider {
    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        {
            let mut guard = self
                .cache
                .write()
                .map_err(|e| PlatformError::Io(format!("storage lock poisoned: {e}")))?;
            guard.insert(key.to_string(), value.to_string());
        } // Release lock before I/O
        self.persist()
    }

    fn load(&self, key: &str) -> Result<Option<String>, PlatformError> {
        let guard = self
            .cache
            .read()
            .map_err(|e| PlatformError::Io(format!("storage lock poisoned: {e}")))?;
        Ok(guard.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), PlatformError> {
        {
            let mut guard = self
                .cache
                .write()
                .map_err(|e| PlatformError::Io(format!("storage lock poisoned: {e}")))?;
            guard.remove(key);
        }
        self.persist()
    }
}

/// Desktop sleep provider using tokio timer
#[derive(Clone, Default)]
pub struct DesktopSleepProvider;

impl SleepProvider for DesktopSleepProvider {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>> {
        Box::pin(async move {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        })
    }
}

/// Desktop location provider
///
/// There is no address bar on desktop; the fragment lives in memory so scene
/// selection behaves the same as in the browser within one run. The initial
/// value comes from the command line (`explorers-player '#scene=math-garden'`).
#[derive(Clone, Default)]
pub struct DesktopLocationProvider {
    fragment: Arc<RwLock<String>>,
}

impl DesktopLocationProvider {
    pub fn new(initial: &str) -> Self {
        Self {
            fragment: Arc::new(RwLock::new(initial.trim_start_matches('#').to_string())),
        }
    }
}

impl LocationProvider for DesktopLocationProvider {
    fn fragment(&self) -> String {
        match self.fragment.read() {
            Ok(guard) => guard.clone(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for fragment: {}", e);
                String::new()
            }
        }
    }

    fn replace_fragment(&self, fragment: &str) -> Result<(), PlatformError> {
        let mut guard = self
            .fragment
            .write()
            .map_err(|e| PlatformError::Io(format!("fragment lock poisoned: {e}")))?;
        *guard = fragment.trim_start_matches('#').to_string();
        Ok(())
    }
}

/// Create platform services for desktop
pub fn create_platform(initial_fragment: &str) -> Platform {
    Platform::new(
        DesktopTimeProvider,
        DesktopSleepProvider,
        DesktopStorageProvider::new(),
        DesktopLocationProvider::new(initial_fragment),
    )
}
