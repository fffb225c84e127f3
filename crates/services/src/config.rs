use std::env;
use std::time::Duration;

use quest_core::rules::{BATCH_SIZE, MAX_SAMPLING_ATTEMPTS};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_PROVIDER_URL: &str = "https://api.jikan.moe/v4/";
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const DEFAULT_ATTEMPT_DELAY: Duration = Duration::from_millis(400);
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

pub const ENV_PROVIDER_URL: &str = "QUEST_PROVIDER_URL";
pub const ENV_PAGE_SIZE: &str = "QUEST_PAGE_SIZE";
pub const ENV_ATTEMPT_DELAY_MS: &str = "QUEST_ATTEMPT_DELAY_MS";
pub const ENV_SEED: &str = "QUEST_SEED";

/// Where and how to query the anime database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: Url,
    pub page_size: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_PROVIDER_URL).expect("default provider URL should be valid"),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProviderConfig {
    /// Defaults overridden by `QUEST_PROVIDER_URL` and `QUEST_PAGE_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = non_empty_var(ENV_PROVIDER_URL) {
            config.base_url = parse_base_url(ENV_PROVIDER_URL, &raw)?;
        }
        if let Some(raw) = non_empty_var(ENV_PAGE_SIZE) {
            config.page_size = parse_positive(ENV_PAGE_SIZE, &raw)?;
        }
        Ok(config)
    }

    /// Replace the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `raw` is not an absolute URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url("--provider-url", raw)?;
        Ok(self)
    }
}

/// Sampling limits for question generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub batch_size: usize,
    pub max_attempts: usize,
    /// Pause between sampling attempts so the provider is not hammered.
    pub attempt_delay: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            max_attempts: MAX_SAMPLING_ATTEMPTS,
            attempt_delay: DEFAULT_ATTEMPT_DELAY,
        }
    }
}

impl GeneratorConfig {
    /// Defaults overridden by `QUEST_ATTEMPT_DELAY_MS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidNumber` when the variable is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = non_empty_var(ENV_ATTEMPT_DELAY_MS) {
            config.attempt_delay = parse_millis(ENV_ATTEMPT_DELAY_MS, &raw)?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_attempt_delay(mut self, delay: Duration) -> Self {
        self.attempt_delay = delay;
        self
    }
}

/// Reads `QUEST_SEED`, if set.
///
/// # Errors
///
/// Returns `ConfigError::InvalidNumber` when the variable is not a number.
pub fn seed_from_env() -> Result<Option<u64>, ConfigError> {
    non_empty_var(ENV_SEED)
        .map(|raw| parse_number(ENV_SEED, &raw))
        .transpose()
}

/// Parse a millisecond count.
///
/// # Errors
///
/// Returns `ConfigError::InvalidNumber` when `raw` is not a whole number.
pub fn parse_millis(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    parse_number(key, raw).map(Duration::from_millis)
}

/// Parse an unsigned number.
///
/// # Errors
///
/// Returns `ConfigError::InvalidNumber` when `raw` is not a whole number.
pub fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            raw: raw.to_string(),
        })
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            raw: raw.to_string(),
        })?;
    if value == 0 {
        return Err(ConfigError::Zero { key });
    }
    Ok(value)
}

/// `Url::join` drops the last path segment unless the base ends with a slash.
fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        key,
        raw: raw.to_string(),
        source,
    })
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
