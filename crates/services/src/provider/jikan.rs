use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use quest_core::model::{AnimeId, AnimeSummary, CharacterOption};

use super::ContentProvider;
use crate::config::ProviderConfig;
use crate::error::ProviderError;

const MAIN_ROLE: &str = "Main";

/// HTTP client for the Jikan v4 API (an unofficial MyAnimeList mirror).
#[derive(Clone, Debug)]
pub struct JikanClient {
    client: Client,
    config: ProviderConfig,
}

impl JikanClient {
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn top_anime_url(&self, page: u32) -> Result<Url, ProviderError> {
        let mut url = self.config.base_url.join("top/anime")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &self.config.page_size.to_string());
        Ok(url)
    }

    fn characters_url(&self, anime: AnimeId) -> Result<Url, ProviderError> {
        Ok(self
            .config
            .base_url
            .join(&format!("anime/{}/characters", anime.value()))?)
    }

    async fn get<T>(&self, url: Url) -> Result<T, ProviderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ContentProvider for JikanClient {
    async fn top_anime(&self, page: u32) -> Result<Vec<AnimeSummary>, ProviderError> {
        let url = self.top_anime_url(page)?;
        let body: TopAnimeResponse = self.get(url).await?;
        Ok(body.into_summaries())
    }

    async fn main_characters(
        &self,
        anime: AnimeId,
    ) -> Result<Vec<CharacterOption>, ProviderError> {
        let url = self.characters_url(anime)?;
        let body: CharactersResponse = self.get(url).await?;
        Ok(body.into_main_characters())
    }
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct TopAnimeResponse {
    #[serde(default)]
    data: Vec<AnimeEntry>,
}

impl TopAnimeResponse {
    fn into_summaries(self) -> Vec<AnimeSummary> {
        self.data
            .into_iter()
            .map(|entry| AnimeSummary::new(AnimeId::new(entry.mal_id), entry.title, entry.episodes))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct AnimeEntry {
    mal_id: u64,
    title: String,
    episodes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CharactersResponse {
    #[serde(default)]
    data: Vec<CastEntry>,
}

impl CharactersResponse {
    fn into_main_characters(self) -> Vec<CharacterOption> {
        self.data
            .into_iter()
            .filter(|entry| entry.role == MAIN_ROLE)
            .filter_map(|entry| {
                let portrait = entry.character.images?.jpg?.image_url?;
                if portrait.trim().is_empty() {
                    return None;
                }
                Some(CharacterOption::new(entry.character.name, portrait))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct CastEntry {
    #[serde(default)]
    role: String,
    character: CharacterEntry,
}

#[derive(Debug, Deserialize)]
struct CharacterEntry {
    name: String,
    images: Option<CharacterImages>,
}

#[derive(Debug, Deserialize)]
struct CharacterImages {
    jpg: Option<ImageSet>,
}

#[derive(Debug, Deserialize)]
struct ImageSet {
    image_url: Option<String>,
}
