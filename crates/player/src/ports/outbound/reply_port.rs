//! Reply Port - remote language-model endpoint
//!
//! The resolver hands one `ReplyRequest` to the port per user message and
//! treats every `ReplyError` the same way: log it and answer locally.
//!
//! Note: uses `async_trait` instead of returning `Pin<Box<dyn Future>>`
//! for better mockall compatibility.

use async_trait::async_trait;
use explorers_domain::{CharacterId, Message, SceneId};

/// Everything the remote endpoint gets to see for one reply
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRequest {
    /// Persona prompt of the current character, if one is selected
    pub persona: Option<String>,
    /// Most recent messages before `user_text`, oldest first
    pub recent_history: Vec<Message>,
    pub scene: SceneId,
    pub character: Option<CharacterId>,
    pub user_text: String,
}

/// Why a remote reply attempt failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
    #[error("reply request timed out after {0} ms")]
    Timeout(u64),
    #[error("reply endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("reply request failed: {0}")]
    Transport(String),
    #[error("malformed reply payload: {0}")]
    Malformed(String),
}

/// Port for the remote reply endpoint
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReplyPort: Send + Sync {
    /// Request one reply. A successful result is a non-empty, trimmed string.
    async fn reply(&self, request: ReplyRequest) -> Result<String, ReplyError>;
}
