/// Movie scraper abstraction
///
/// The bridge never talks to a movie site directly: every handler goes through
/// a `MovieScraper`, which covers the three steps of the site's flow (search,
/// navigate to a movie page, extract download links). The fzmovies scraper is
/// the production implementation; tests substitute their own.
use crate::{
    error::AppResult,
    models::{DownloadLinks, FileOption, Movie, MoviePage, SearchQuery},
};

pub mod fzmovies;

pub use fzmovies::FzMoviesScraper;

/// Trait for movie scrapers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieScraper: Send + Sync {
    /// Run a free-text search or fetch one of the fixed catalogue listings
    ///
    /// Results come back in the order the site ranks them.
    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Movie>>;

    /// Open the page of a movie from a search result and list its file options
    async fn navigate(&self, movie: &Movie) -> AppResult<MoviePage>;

    /// Turn a file option into its final mirror links
    async fn extract_links(&self, file: &FileOption) -> AppResult<DownloadLinks>;

    /// Scraper name for logging and debugging
    fn name(&self) -> &'static str;
}
