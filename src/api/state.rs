use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::{FallbackEmbedSource, FzMoviesScraper, MovieScraper};

/// Shared application state
///
/// Holds nothing mutable: every request reads the scraper and fallback
/// settings and builds its own per-request values.
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<dyn MovieScraper>,
    pub fallback: FallbackEmbedSource,
}

impl AppState {
    /// Creates state around any scraper implementation
    pub fn new(scraper: Arc<dyn MovieScraper>, fallback: FallbackEmbedSource) -> Self {
        Self { scraper, fallback }
    }

    /// Creates the production state: the fzmovies scraper and the configured
    /// embed fallback
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let scraper = FzMoviesScraper::new(config.fzmovies_url.clone())?;
        Ok(Self::new(
            Arc::new(scraper),
            FallbackEmbedSource::new(config.fallback_embed_url.clone()),
        ))
    }
}
