use crate::{
    error::{AppError, AppResult},
    models::{CatalogFilter, Movie, SearchQuery},
    services::providers::MovieScraper,
};

/// Maximum number of entries served from a fixed catalogue listing
pub const TRENDING_LIMIT: usize = 20;

/// Trending movies: the head of the IMDB Top 250 listing
pub async fn trending(scraper: &dyn MovieScraper) -> AppResult<Vec<Movie>> {
    listing(scraper, CatalogFilter::ImdbTop250).await
}

/// Most recently released movies, capped like the trending feed
pub async fn recent(scraper: &dyn MovieScraper) -> AppResult<Vec<Movie>> {
    listing(scraper, CatalogFilter::RecentlyReleased).await
}

/// Free-text search, returned exactly as the scraper ranked it
pub async fn search(scraper: &dyn MovieScraper, query: &str) -> AppResult<Vec<Movie>> {
    scraper.search(&SearchQuery::from(query)).await
}

/// Fetches a fixed listing; an empty listing is an error.
async fn listing(scraper: &dyn MovieScraper, filter: CatalogFilter) -> AppResult<Vec<Movie>> {
    let mut movies = scraper.search(&SearchQuery::Filter(filter)).await?;
    if movies.is_empty() {
        return Err(AppError::NotFound(format!("No movies in {} listing", filter)));
    }
    movies.truncate(TRENDING_LIMIT);
    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockMovieScraper;
    use tokio_test::{assert_err, assert_ok};

    fn movies(count: usize) -> Vec<Movie> {
        (0..count)
            .map(|i| Movie {
                id: format!("movie-{}.htm", i),
                title: format!("Movie {}", i),
                url: format!("https://fzmovies.test/movie-{}.htm", i),
                year: Some(2000),
                cover_photo: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_trending_caps_at_limit() {
        let mut scraper = MockMovieScraper::new();
        scraper
            .expect_search()
            .withf(|query| *query == SearchQuery::Filter(CatalogFilter::ImdbTop250))
            .times(1)
            .returning(|_| Ok(movies(250)));

        let result = assert_ok!(trending(&scraper).await);
        assert_eq!(result.len(), TRENDING_LIMIT);
        assert_eq!(result[0].title, "Movie 0");
        assert_eq!(result[19].title, "Movie 19");
    }

    #[tokio::test]
    async fn test_trending_keeps_short_listing() {
        let mut scraper = MockMovieScraper::new();
        scraper.expect_search().returning(|_| Ok(movies(3)));

        let result = assert_ok!(trending(&scraper).await);
        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_trending_listing_is_an_error() {
        let mut scraper = MockMovieScraper::new();
        scraper.expect_search().times(1).returning(|_| Ok(vec![]));

        let err = assert_err!(trending(&scraper).await);
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Not found: No movies in imdb-top-250 listing");
    }

    #[tokio::test]
    async fn test_empty_search_is_not_an_error() {
        let mut scraper = MockMovieScraper::new();
        scraper.expect_search().returning(|_| Ok(vec![]));

        let result = assert_ok!(search(&scraper, "zzzz").await);
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_recent_uses_recently_released_listing() {
        let mut scraper = MockMovieScraper::new();
        scraper
            .expect_search()
            .withf(|query| *query == SearchQuery::Filter(CatalogFilter::RecentlyReleased))
            .times(1)
            .returning(|_| Ok(movies(30)));

        let result = assert_ok!(recent(&scraper).await);
        assert_eq!(result.len(), TRENDING_LIMIT);
    }

    #[tokio::test]
    async fn test_search_passes_results_through() {
        let mut scraper = MockMovieScraper::new();
        scraper
            .expect_search()
            .withf(|query| *query == SearchQuery::Text("Inception".to_string()))
            .times(1)
            .returning(|_| Ok(movies(45)));

        let result = assert_ok!(search(&scraper, "Inception").await);
        assert_eq!(result, movies(45));
    }

    #[tokio::test]
    async fn test_search_propagates_scraper_error() {
        let mut scraper = MockMovieScraper::new();
        scraper
            .expect_search()
            .returning(|_| Err(AppError::Upstream("connection reset".to_string())));

        let err = assert_err!(search(&scraper, "Inception").await);
        assert_eq!(err.to_string(), "Upstream error: connection reset");
    }
}
