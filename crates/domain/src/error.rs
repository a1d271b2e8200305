//! Unified error types for the domain layer
//!
//! Parsing of wire identifiers (scene ids, view names, message roles) is the
//! only fallible thing the domain does. Callers decide whether a failure means
//! "substitute the default" or "log and ignore".

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown scene identifier
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// Unknown view name
    #[error("Unknown view: {0}")]
    UnknownView(String),

    /// Character id not present in the registry
    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Create an unknown scene error
    pub fn unknown_scene(id: impl Into<String>) -> Self {
        Self::UnknownScene(id.into())
    }

    /// Create an unknown view error
    pub fn unknown_view(name: impl Into<String>) -> Self {
        Self::UnknownView(name.into())
    }

    /// Create an unknown character error
    pub fn unknown_character(id: impl Into<String>) -> Self {
        Self::UnknownCharacter(id.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for MessageRole {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "user" => Ok(Self::User),
    ///             _ => Err(DomainError::parse(format!("Unknown role: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
