use std::fmt;
use std::str::FromStr;

use crate::model::ids::AnimeId;

//
// ─── CONTENT RECORDS ───────────────────────────────────────────────────────────
//

/// One entry of a ranked anime page as returned by the content provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeSummary {
    pub id: AnimeId,
    pub title: String,
    /// `None` while the provider does not know the episode count (airing shows).
    pub episodes: Option<u32>,
}

impl AnimeSummary {
    #[must_use]
    pub fn new(id: AnimeId, title: impl Into<String>, episodes: Option<u32>) -> Self {
        Self {
            id,
            title: title.into(),
            episodes,
        }
    }

    /// Episode count usable for a question, if the provider reported a positive one.
    #[must_use]
    pub fn known_episodes(&self) -> Option<u32> {
        self.episodes.filter(|count| *count > 0)
    }
}

/// A main cast member with a portrait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterOption {
    pub name: String,
    pub portrait_url: String,
}

impl CharacterOption {
    #[must_use]
    pub fn new(name: impl Into<String>, portrait_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            portrait_url: portrait_url.into(),
        }
    }
}

//
// ─── GAME MODE ─────────────────────────────────────────────────────────────────
//

/// Which kind of question a game is played with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Guess a main character's name from their portrait.
    Character,
    /// Guess how many episodes an anime has.
    Episodes,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Character, GameMode::Episodes];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Character => "character",
            GameMode::Episodes => "episodes",
        }
    }

    /// Menu label for this mode.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Character => "Guess The Character",
            GameMode::Episodes => "Guess The Episodes",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a game mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "character" | "characters" | "c" => Ok(GameMode::Character),
            "episodes" | "episode" | "e" => Ok(GameMode::Episodes),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
