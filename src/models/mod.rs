use serde::{Deserialize, Serialize};
use std::fmt::Display;

// ============================================================================
// Catalogue Types
// ============================================================================

/// Fixed catalogue listings the movie site exposes alongside free-text search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogFilter {
    /// IMDB Top 250 listing, used as the trending feed
    ImdbTop250,
    /// Most recently released titles
    RecentlyReleased,
}

impl Display for CatalogFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogFilter::ImdbTop250 => write!(f, "imdb-top-250"),
            CatalogFilter::RecentlyReleased => write!(f, "recently-released"),
        }
    }
}

/// What a search is run against: free text or one of the fixed listings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchQuery {
    Text(String),
    Filter(CatalogFilter),
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchQuery::Text(query) => write!(f, "{}", query),
            SearchQuery::Filter(filter) => write!(f, "{}", filter),
        }
    }
}

impl From<&str> for SearchQuery {
    fn from(query: &str) -> Self {
        SearchQuery::Text(query.to_string())
    }
}

/// Movie summary as returned by a search
///
/// `id` is the site-relative page path of the movie. It is only guaranteed to
/// point at the same item for as long as the site keeps that listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub url: String,
    pub year: Option<u16>,
    pub cover_photo: Option<String>,
}

/// Movie page reached by navigating from a search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    pub title: String,
    pub files: Vec<FileOption>,
}

impl MoviePage {
    /// The option a resolve picks when the caller has no preference
    pub fn default_file(&self) -> Option<&FileOption> {
        self.files.first()
    }
}

/// One downloadable file (quality variant) listed on a movie page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileOption {
    pub title: String,
    /// Site-relative path of the download options page
    pub url: String,
    pub size: Option<String>,
}

/// Final mirror links for a file option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadLinks {
    pub links: Vec<String>,
    pub size: Option<String>,
}

// ============================================================================
// Resolve Types
// ============================================================================

/// Playable links resolved through the primary source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedStream {
    pub title: String,
    pub stream_url: Vec<String>,
    pub size: Option<String>,
    pub quality: String,
    pub source: String,
}

/// Embed URL handed out when the primary source could not resolve a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackEmbed {
    pub fallback_embed: String,
    pub source: String,
}

/// Result of a resolve request
///
/// Serialized without a tag: callers tell the variants apart by the fields
/// present (and by `source`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ResolveOutcome {
    Resolved(ResolvedStream),
    Fallback(FallbackEmbed),
}

impl ResolveOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolveOutcome::Fallback(_))
    }

    pub fn source(&self) -> &str {
        match self {
            ResolveOutcome::Resolved(stream) => &stream.source,
            ResolveOutcome::Fallback(fallback) => &fallback.source,
        }
    }
}
