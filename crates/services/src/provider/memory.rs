use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quest_core::model::{AnimeId, AnimeSummary, CharacterOption};

use super::ContentProvider;
use crate::error::ProviderError;

/// In-memory provider for tests and offline play.
///
/// Unknown pages and anime resolve to empty lists. Clones share state.
#[derive(Clone, Default)]
pub struct StaticProvider {
    pages: Arc<Mutex<HashMap<u32, Vec<AnimeSummary>>>>,
    casts: Arc<Mutex<HashMap<AnimeId, Vec<CharacterOption>>>>,
    unavailable: bool,
    calls: Arc<AtomicUsize>,
}

impl StaticProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every call fails, like an unreachable host.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_page(self, page: u32, anime: Vec<AnimeSummary>) -> Self {
        self.insert_page(page, anime);
        self
    }

    /// Add or replace a page after the provider has been handed out.
    pub fn insert_page(&self, page: u32, anime: Vec<AnimeSummary>) {
        if let Ok(mut pages) = self.pages.lock() {
            pages.insert(page, anime);
        }
    }

    #[must_use]
    pub fn with_cast(self, anime: AnimeId, cast: Vec<CharacterOption>) -> Self {
        if let Ok(mut casts) = self.casts.lock() {
            casts.insert(anime, cast);
        }
        self
    }

    /// Number of provider calls served so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn record_call(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.unavailable {
            return Err(ProviderError::Unavailable("static provider is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentProvider for StaticProvider {
    async fn top_anime(&self, page: u32) -> Result<Vec<AnimeSummary>, ProviderError> {
        self.record_call()?;
        let guard = self
            .pages
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(guard.get(&page).cloned().unwrap_or_default())
    }

    async fn main_characters(
        &self,
        anime: AnimeId,
    ) -> Result<Vec<CharacterOption>, ProviderError> {
        self.record_call()?;
        let guard = self
            .casts
            .lock()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(guard.get(&anime).cloned().unwrap_or_default())
    }
}
