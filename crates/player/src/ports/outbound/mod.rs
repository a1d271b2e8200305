//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with external systems without
//! depending on concrete implementations.

pub mod platform;
pub mod reply_port;

pub use platform::{
    storage_keys, LocationProvider, PlatformError, SleepProvider, StorageProvider, TimeProvider,
};
pub use reply_port::{ReplyError, ReplyPort, ReplyRequest};

#[cfg(any(test, feature = "testing"))]
pub use reply_port::MockReplyPort;
