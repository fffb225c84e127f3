//! Read-only access to the anime database that supplies quiz content.

mod jikan;
mod memory;

use async_trait::async_trait;
use quest_core::model::{AnimeId, AnimeSummary, CharacterOption};

use crate::error::ProviderError;

pub use jikan::JikanClient;
pub use memory::StaticProvider;

/// Source of anime pages and cast lists.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// One page of top-ranked anime. Pages start at 1.
    async fn top_anime(&self, page: u32) -> Result<Vec<AnimeSummary>, ProviderError>;

    /// Main-role characters of `anime` that have a portrait.
    async fn main_characters(&self, anime: AnimeId)
    -> Result<Vec<CharacterOption>, ProviderError>;
}
