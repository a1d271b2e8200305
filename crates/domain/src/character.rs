//! Character registry
//!
//! Characters are defined once at process start and never mutated. The
//! registry only answers lookups; selecting a character is a user event that
//! the session controller records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Identifier of a registry character (e.g. `"leo"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Immutable character metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Short role shown under the name
    pub role: &'static str,
    pub portrait_ref: &'static str,
    /// Personality description handed to the remote reply endpoint
    pub persona_prompt: &'static str,
    /// Signature emoji used to flavor local replies
    pub emoji: &'static str,
}

impl Character {
    pub fn character_id(&self) -> CharacterId {
        CharacterId::new(self.id)
    }
}

static BUILTIN: [Character; 4] = [
    Character {
        id: "leo",
        display_name: "Leo",
        role: "Brave Explorer",
        portrait_ref: "assets/images/characters/leo.png",
        persona_prompt: "You are Leo, a brave young lion who loves exploring with kids aged 4-7. \
            You are curious and cheerful, speak like a friendly older sibling, and love asking \
            'what if' questions. Use simple words and keep every answer to one or two short sentences.",
        emoji: "🦁",
    },
    Character {
        id: "ella",
        display_name: "Ella",
        role: "Science Helper",
        portrait_ref: "assets/images/characters/ella.png",
        persona_prompt: "You are Ella, a warm and enthusiastic science helper for kids aged 4-7. \
            You make science feel magical, ask curious questions and always encourage trying things. \
            Use simple words and keep every answer to one or two short sentences.",
        emoji: "🧪",
    },
    Character {
        id: "pip",
        display_name: "Pip",
        role: "Nature Buddy",
        portrait_ref: "assets/images/characters/pip.png",
        persona_prompt: "You are Pip, a gentle little bird who knows all about plants, bugs and \
            animals. You are patient and kind and notice small wonders. Use simple words and keep \
            every answer to one or two short sentences.",
        emoji: "🐦",
    },
    Character {
        id: "gina",
        display_name: "Gina",
        role: "Number Gardener",
        portrait_ref: "assets/images/characters/gina.png",
        persona_prompt: "You are Gina, a playful giraffe who finds numbers and shapes everywhere. \
            You turn counting into games and celebrate every try. Use simple words and keep every \
            answer to one or two short sentences.",
        emoji: "🦒",
    },
];

/// Read-only lookup over the built-in characters
#[derive(Debug, Clone, Copy)]
pub struct CharacterRegistry {
    entries: &'static [Character],
}

impl CharacterRegistry {
    /// Registry of the characters shipped with the game
    pub fn builtin() -> Self {
        Self { entries: &BUILTIN }
    }

    pub fn get(&self, id: &str) -> Option<&'static Character> {
        self.entries.iter().find(|c| c.id == id)
    }

    /// Look up an id, failing with [`DomainError::UnknownCharacter`]
    pub fn require(&self, id: &str) -> Result<&'static Character, DomainError> {
        self.get(id).ok_or_else(|| DomainError::unknown_character(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All characters in chooser order
    pub fn all(&self) -> &'static [Character] {
        self.entries
    }
}

impl Default for CharacterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_character() {
        let registry = CharacterRegistry::builtin();
        let ella = registry.get("ella").unwrap();
        assert_eq!(ella.display_name, "Ella");
        assert_eq!(ella.portrait_ref, "assets/images/characters/ella.png");
        assert!(!ella.persona_prompt.is_empty());
    }

    #[test]
    fn test_lookup_unknown_character() {
        let registry = CharacterRegistry::builtin();
        assert!(registry.get("maya").is_none());
        assert!(registry.get("").is_none());
        assert_eq!(
            registry.require("maya"),
            Err(DomainError::unknown_character("maya"))
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let registry = CharacterRegistry::builtin();
        let mut ids: Vec<_> = registry.all().iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), registry.all().len());
    }

    #[test]
    fn test_character_id_is_transparent_on_the_wire() {
        let id = CharacterId::from("pip");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"pip\"");
    }
}
