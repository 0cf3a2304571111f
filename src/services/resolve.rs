use std::fmt::Display;

use crate::{
    error::{AppError, AppResult},
    models::{FallbackEmbed, Movie, ResolveOutcome, ResolvedStream, SearchQuery},
    services::providers::MovieScraper,
};

/// Source tag reported for links resolved through the scraper
pub const PRIMARY_SOURCE: &str = "fzmovies.cms";

/// Source tag reported alongside an embed fallback
pub const FALLBACK_SOURCE: &str = "vidsrc.to (Fallback)";

/// Quality label reported for every resolved stream, whichever file option
/// was picked.
pub const DEFAULT_QUALITY_LABEL: &str = "480p";

/// Where resolution failures are sent instead
#[derive(Debug, Clone)]
pub struct FallbackEmbedSource {
    base_url: String,
}

impl FallbackEmbedSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds the embed URL, with `movie_id` substituted verbatim
    pub fn embed_url(&self, movie_id: &str) -> String {
        format!("{}/embed/movie/{}", self.base_url, movie_id)
    }

    fn fallback_for(&self, movie_id: &str) -> FallbackEmbed {
        FallbackEmbed {
            fallback_embed: self.embed_url(movie_id),
            source: FALLBACK_SOURCE.to_string(),
        }
    }
}

/// Steps of a resolve request; a failure in any of them ends in the fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    Searching,
    Navigating,
    ExtractingLinks,
}

impl Display for ResolveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveStage::Searching => write!(f, "searching"),
            ResolveStage::Navigating => write!(f, "navigating"),
            ResolveStage::ExtractingLinks => write!(f, "extracting_links"),
        }
    }
}

/// Error from one stage of a resolve request
#[derive(Debug)]
pub struct StageError {
    pub stage: ResolveStage,
    pub source: AppError,
}

trait AtStage<T> {
    fn at(self, stage: ResolveStage) -> Result<T, StageError>;
}

impl<T> AtStage<T> for AppResult<T> {
    fn at(self, stage: ResolveStage) -> Result<T, StageError> {
        self.map_err(|source| StageError { stage, source })
    }
}

/// Resolves `movie_id` into playable links, or into an embed fallback
///
/// Never fails: any stage error is logged and replaced by the fallback.
pub async fn resolve(
    scraper: &dyn MovieScraper,
    movie_id: &str,
    fallback: &FallbackEmbedSource,
) -> ResolveOutcome {
    match resolve_stream(scraper, movie_id).await {
        Ok(stream) => {
            tracing::info!(movie_id = %movie_id, title = %stream.title, "Movie resolved");
            ResolveOutcome::Resolved(stream)
        }
        Err(e) => {
            tracing::warn!(
                movie_id = %movie_id,
                stage = %e.stage,
                error = %e.source,
                "Resolve failed, returning embed fallback"
            );
            ResolveOutcome::Fallback(fallback.fallback_for(movie_id))
        }
    }
}

/// Search → navigate → extract, with no retries between steps
pub async fn resolve_stream(
    scraper: &dyn MovieScraper,
    movie_id: &str,
) -> Result<ResolvedStream, StageError> {
    let results = scraper
        .search(&SearchQuery::from(movie_id))
        .await
        .at(ResolveStage::Searching)?;
    let movie = select_movie(&results, movie_id)
        .ok_or_else(|| AppError::NotFound(format!("No search results for {}", movie_id)))
        .at(ResolveStage::Searching)?;

    let page = scraper
        .navigate(movie)
        .await
        .at(ResolveStage::Navigating)?;
    let file = page
        .default_file()
        .ok_or_else(|| AppError::NotFound(format!("No file options for {}", movie.title)))
        .at(ResolveStage::Navigating)?;

    let links = scraper
        .extract_links(file)
        .await
        .at(ResolveStage::ExtractingLinks)?;

    tracing::debug!(
        movie_id = %movie_id,
        file = %file.title,
        mirrors = links.links.len(),
        "Selected file option"
    );

    Ok(ResolvedStream {
        title: movie.title.clone(),
        stream_url: links.links,
        size: links.size,
        quality: DEFAULT_QUALITY_LABEL.to_string(),
        source: PRIMARY_SOURCE.to_string(),
    })
}

/// Picks the search result a `movie_id` refers to
///
/// An exact match on the page id or title wins; otherwise the top-ranked
/// result is used.
pub fn select_movie<'a>(results: &'a [Movie], movie_id: &str) -> Option<&'a Movie> {
    results
        .iter()
        .find(|movie| movie.id == movie_id || movie.title.eq_ignore_ascii_case(movie_id))
        .or_else(|| results.first())
}
