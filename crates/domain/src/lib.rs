//! Little Explorers domain vocabulary.
//!
//! Pure types and functions shared by every front end: scene and view
//! identifiers, chat messages, the character registry and the local
//! fallback reply table. Nothing in here touches storage, the network or
//! the clock; timestamps are always passed in.

pub mod character;
pub mod error;
pub mod fallback;
pub mod message;
pub mod scene;
pub mod view;

pub use character::{Character, CharacterId, CharacterRegistry};
pub use error::DomainError;
pub use fallback::{greeting, toy_reply, ReplyContext, PLACEHOLDER_NAME};
pub use message::{Message, MessageRole};
pub use scene::SceneId;
pub use view::View;
