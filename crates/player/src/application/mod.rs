//! Application layer - session state, chat and reply resolution
//!
//! Everything here is platform-agnostic and talks to the outside world only
//! through `Platform` and the outbound ports.

pub mod chat;
pub mod controller;
pub mod reply_resolver;
pub mod store;

pub use chat::{ChatLog, ReplyQueue, ReplyTicket};
pub use controller::{HeaderView, PendingReply, SessionController, SessionState, Visibility};
pub use reply_resolver::{FallbackReason, ReplyOutcome, ReplyResolver, ReplySource};
pub use store::PersistentStore;
