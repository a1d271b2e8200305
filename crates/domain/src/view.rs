//! Top-level application views

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Which top-level screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Menu,
    CharacterSelect,
    Game,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Menu => "menu",
            View::CharacterSelect => "character-select",
            View::Game => "game",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(View::Menu),
            // "character" is the name the menu buttons have always used
            "character-select" | "character" | "characterSelect" => Ok(View::CharacterSelect),
            "game" => Ok(View::Game),
            other => Err(DomainError::unknown_view(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_views() {
        assert_eq!("menu".parse::<View>(), Ok(View::Menu));
        assert_eq!("character".parse::<View>(), Ok(View::CharacterSelect));
        assert_eq!("character-select".parse::<View>(), Ok(View::CharacterSelect));
        assert_eq!("game".parse::<View>(), Ok(View::Game));
    }

    #[test]
    fn test_parse_unknown_view() {
        assert_eq!(
            "settings".parse::<View>(),
            Err(DomainError::unknown_view("settings"))
        );
        assert!("Game".parse::<View>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for view in [View::Menu, View::CharacterSelect, View::Game] {
            assert_eq!(view.to_string().parse::<View>(), Ok(view));
        }
    }
}
