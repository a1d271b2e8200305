//! Scene identifiers
//!
//! The game view shows exactly one of a fixed, closed set of activity areas.
//! Anything outside the set resolves to [`SceneId::DiscoveryZone`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// One of the named activity areas the game view can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneId {
    /// Canonical first scene
    #[default]
    DiscoveryZone,
    ScienceCorner,
    NaturePath,
    MathGarden,
}

impl SceneId {
    /// All scenes in switcher order
    pub const ALL: [SceneId; 4] = [
        SceneId::DiscoveryZone,
        SceneId::ScienceCorner,
        SceneId::NaturePath,
        SceneId::MathGarden,
    ];

    /// Wire identifier used in storage and the URL fragment
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneId::DiscoveryZone => "discovery-zone",
            SceneId::ScienceCorner => "science-corner",
            SceneId::NaturePath => "nature-path",
            SceneId::MathGarden => "math-garden",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            SceneId::DiscoveryZone => "Discovery Zone",
            SceneId::ScienceCorner => "Science Corner",
            SceneId::NaturePath => "Nature Explorers Path",
            SceneId::MathGarden => "Math Garden",
        }
    }

    /// Background image reference for the activity area
    pub fn background_ref(&self) -> &'static str {
        match self {
            SceneId::DiscoveryZone => "assets/images/backgrounds/discovery-zone.png",
            SceneId::ScienceCorner => "assets/images/backgrounds/science-corner.png",
            SceneId::NaturePath => "assets/images/backgrounds/nature-explorers-path.png",
            SceneId::MathGarden => "assets/images/backgrounds/math-garden.png",
        }
    }

    /// Resolve a caller-supplied identifier, substituting the default when
    /// the identifier is not one of the known scenes.
    pub fn resolve_or_default(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneId::ALL
            .into_iter()
            .find(|scene| scene.as_str() == s)
            .ok_or_else(|| DomainError::unknown_scene(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_scene() {
        for scene in SceneId::ALL {
            assert_eq!(scene.as_str().parse::<SceneId>(), Ok(scene));
        }
    }

    #[test]
    fn unknown_scene_resolves_to_default() {
        for bad in ["", "volcano", "Science-Corner", " science-corner", "discoveryZone"] {
            assert_eq!(SceneId::resolve_or_default(bad), SceneId::DiscoveryZone);
        }
    }

    #[test]
    fn serializes_as_wire_id() {
        let json = serde_json::to_string(&SceneId::MathGarden).unwrap();
        assert_eq!(json, "\"math-garden\"");
        let back: SceneId = serde_json::from_str("\"nature-path\"").unwrap();
        assert_eq!(back, SceneId::NaturePath);
    }
}
