//! Platform abstraction ports for cross-platform compatibility
//!
//! These traits abstract platform-specific operations so that:
//! 1. Application code remains platform-agnostic
//! 2. Platform-specific code is isolated in infrastructure
//! 3. Code becomes easily testable with mock implementations
//!
//! NOTE: The `Platform` struct (DI container) that aggregates these traits
//! lives in `state/platform.rs`, not here.
//! Ports layer contains only trait definitions.

use std::{future::Future, pin::Pin};

use chrono::{DateTime, Utc};

/// Failure reported by a platform backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The backing facility does not exist or is disabled (private mode, no window)
    #[error("platform facility unavailable: {0}")]
    Unavailable(String),
    /// The backing store refused the write (quota exceeded)
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),
    /// Any other I/O failure
    #[error("platform I/O failed: {0}")]
    Io(String),
}

/// Time operations abstraction
pub trait TimeProvider: Clone + 'static {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;
}

/// Async sleep abstraction
///
/// Used to race remote calls against a timeout without `#[cfg]` branches in
/// application code.
pub trait SleepProvider: Clone + 'static {
    fn sleep_ms(&self, ms: u64) -> Pin<Box<dyn Future<Output = ()> + 'static>>;
}

/// Persistent storage abstraction (localStorage/file-based)
///
/// Backends report failures; the `PersistentStore` adapter decides to
/// swallow them.
pub trait StorageProvider: Clone + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str) -> Result<(), PlatformError>;

    /// Load a string value by key, returns `Ok(None)` if not found
    fn load(&self, key: &str) -> Result<Option<String>, PlatformError>;

    /// Remove a value by key
    fn remove(&self, key: &str) -> Result<(), PlatformError>;
}

/// Address bar fragment abstraction (`#scene=math-garden`)
pub trait LocationProvider: Clone + 'static {
    /// Current fragment without the leading `#`
    fn fragment(&self) -> String;

    /// Replace the fragment without navigating or adding a history entry
    fn replace_fragment(&self, fragment: &str) -> Result<(), PlatformError>;
}

/// Storage key constants
///
/// These are kept in the ports layer as they define the contract for
/// what keys are used across the application.
pub mod storage_keys {
    pub const ACTIVE_SCENE: &str = "le.activeScene";
    pub const CHARACTER: &str = "le.character";
    pub const CHAT_OPEN: &str = "le.chatOpen";
    pub const CHAT_HISTORY: &str = "le.chatHistory";
}
