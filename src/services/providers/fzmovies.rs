/// fzmovies scraper
///
/// Drives the site the same way a browser would:
/// 1. Search: POST /csearch.php (or GET /movieslist.php for fixed listings)
/// 2. Navigate: GET /movie-*.htm → file options in `ul.moviesfiles`
/// 3. Extract: GET /download1.php?... → follow `a#downloadlink` → mirror inputs
///
/// HTML parsing is kept in free functions so it can be checked against
/// fixture markup without a network.
use crate::{
    error::{AppError, AppResult},
    models::{CatalogFilter, DownloadLinks, FileOption, Movie, MoviePage, SearchQuery},
    services::providers::MovieScraper,
};
use reqwest::Client as HttpClient;
use scraper::{ElementRef, Html, Selector};

const USER_AGENT: &str = concat!("krioflix-bridge/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct FzMoviesScraper {
    http_client: HttpClient,
    base_url: String,
}

impl FzMoviesScraper {
    /// Creates a scraper with its own HTTP client
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let http_client = HttpClient::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(http_client, base_url))
    }

    /// Creates a scraper around an existing HTTP client
    pub fn with_client(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn listing_path(filter: CatalogFilter) -> &'static str {
        match filter {
            CatalogFilter::ImdbTop250 => "movieslist.php?catID=2&by=imdbtop250",
            CatalogFilter::RecentlyReleased => "movieslist.php?catID=2&by=date",
        }
    }

    async fn fetch_html(&self, path: &str) -> AppResult<String> {
        let url = absolute_url(&self.base_url, path);
        let response = self.http_client.get(&url).send().await?;
        Self::read_body(response).await
    }

    async fn search_text(&self, query: &str) -> AppResult<String> {
        let url = absolute_url(&self.base_url, "csearch.php");
        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("searchname", query),
                ("Search", "Search"),
                ("searchby", "Name"),
                ("category", "All"),
            ])
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn read_body(response: reqwest::Response) -> AppResult<String> {
        if !response.status().is_success() {
            let status = response.status();
            let url = response.url().to_string();
            return Err(AppError::Upstream(format!(
                "fzmovies returned status {} for {}",
                status, url
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl MovieScraper for FzMoviesScraper {
    async fn search(&self, query: &SearchQuery) -> AppResult<Vec<Movie>> {
        let html = match query {
            SearchQuery::Text(text) => self.search_text(text).await?,
            SearchQuery::Filter(filter) => self.fetch_html(Self::listing_path(*filter)).await?,
        };

        let movies = parse_movie_list(&html, &self.base_url)?;

        tracing::info!(
            query = %query,
            results = movies.len(),
            provider = self.name(),
            "Movie search completed"
        );

        Ok(movies)
    }

    async fn navigate(&self, movie: &Movie) -> AppResult<MoviePage> {
        let html = self.fetch_html(&movie.id).await?;
        let page = parse_movie_page(&html, &movie.title)?;

        tracing::info!(
            movie_id = %movie.id,
            files = page.files.len(),
            provider = self.name(),
            "Movie page parsed"
        );

        Ok(page)
    }

    async fn extract_links(&self, file: &FileOption) -> AppResult<DownloadLinks> {
        let options_html = self.fetch_html(&file.url).await?;
        let download_path = parse_download_page_link(&options_html)?;

        let links_html = self.fetch_html(&download_path).await?;
        let links = parse_mirror_links(&links_html)?;

        tracing::info!(
            file = %file.title,
            mirrors = links.len(),
            provider = self.name(),
            "Download links extracted"
        );

        Ok(DownloadLinks {
            links,
            size: file.size.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "fzmovies"
    }
}

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| AppError::Scrape(e.to_string()))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Joins a site-relative href onto the base URL; absolute hrefs pass through.
pub(crate) fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}/{}", base_url, href.trim_start_matches('/'))
    }
}

/// Pulls a four-digit year out of text such as "(2010)"
fn parse_year(text: &str) -> Option<u16> {
    text.split(|c: char| c == '(' || c == ')')
        .map(str::trim)
        .find(|part| part.len() == 4 && part.chars().all(|c| c.is_ascii_digit()))
        .and_then(|part| part.parse().ok())
}

/// Parses a search or listing page into movie summaries
///
/// A page without any result boxes is a valid empty result.
pub fn parse_movie_list(html: &str, base_url: &str) -> AppResult<Vec<Movie>> {
    let document = Html::parse_document(html);
    let box_selector = selector("div.mainbox")?;
    let link_selector = selector(r#"a[href^="movie-"]"#)?;
    let small_selector = selector("small")?;
    let img_selector = selector("img")?;

    let mut movies = Vec::new();

    for result in document.select(&box_selector) {
        let Some(link) = result.select(&link_selector).next() else {
            continue;
        };
        let id = link.value().attr("href").unwrap_or_default().to_string();

        let title = result
            .select(&link_selector)
            .map(element_text)
            .find(|text| !text.is_empty());
        let Some(title) = title else {
            continue;
        };

        let year = result
            .select(&small_selector)
            .find_map(|small| parse_year(&element_text(small)));

        let cover_photo = result
            .select(&img_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(|src| absolute_url(base_url, src));

        movies.push(Movie {
            url: absolute_url(base_url, &id),
            id,
            title,
            year,
            cover_photo,
        });
    }

    Ok(movies)
}

/// Parses a movie page into its list of file options
///
/// A page with no file list means the site layout is not what we expect, so
/// that is an error rather than an empty page.
pub fn parse_movie_page(html: &str, fallback_title: &str) -> AppResult<MoviePage> {
    let document = Html::parse_document(html);
    let heading_selector = selector("h2")?;
    let list_selector = selector("ul.moviesfiles")?;
    let option_selector = selector(r#"a[id^="downloadoptionslink"]"#)?;
    let size_selector = selector("dcounter")?;
    let item_selector = selector("li")?;

    let title = document
        .select(&heading_selector)
        .map(element_text)
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| fallback_title.to_string());

    let mut files = Vec::new();

    for list in document.select(&list_selector) {
        for item in list.select(&item_selector) {
            let Some(anchor) = item.select(&option_selector).next() else {
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            let size = item
                .select(&size_selector)
                .next()
                .map(element_text)
                .map(|text| text.trim_matches(|c: char| c == '(' || c == ')').trim().to_string())
                .filter(|text| !text.is_empty());

            files.push(FileOption {
                title: element_text(anchor),
                url: href.to_string(),
                size,
            });
        }
    }

    if files.is_empty() {
        return Err(AppError::NotFound(format!(
            "No file options found for {}",
            title
        )));
    }

    Ok(MoviePage { title, files })
}

/// Finds the link from a download options page to the mirror list
pub fn parse_download_page_link(html: &str) -> AppResult<String> {
    let document = Html::parse_document(html);
    let link_selector = selector("a#downloadlink")?;

    document
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .ok_or_else(|| AppError::Scrape("Download link not found on options page".to_string()))
}

/// Collects the mirror URLs from the final download page
pub fn parse_mirror_links(html: &str) -> AppResult<Vec<String>> {
    let document = Html::parse_document(html);
    let input_selector = selector(r#"input[name="download1"]"#)?;

    let links: Vec<String> = document
        .select(&input_selector)
        .filter_map(|input| input.value().attr("value"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
        .collect();

    if links.is_empty() {
        return Err(AppError::NotFound(
            "No mirror links found on download page".to_string(),
        ));
    }

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://fzmovies.test";

    const SEARCH_HTML: &str = r#"
        <html><body>
        <div class="mainbox">
          <table><tr>
            <td><a href="movie-Inception--hmp4.htm"><img src="imdb_images/inception.jpg"></a></td>
            <td><span><a href="movie-Inception--hmp4.htm"><small><b>Inception</b></small></a></span>
                <br><small>(2010)</small></td>
          </tr></table>
        </div>
        <div class="mainbox">
          <table><tr>
            <td><a href="movie-Interstellar--hmp4.htm"><img src="https://img.test/interstellar.jpg"></a></td>
            <td><a href="movie-Interstellar--hmp4.htm"><b>Interstellar</b></a><small>Sci-Fi</small></td>
          </tr></table>
        </div>
        <div class="mainbox"><p>Advertisement</p></div>
        </body></html>
    "#;

    const MOVIE_PAGE_HTML: &str = r#"
        <html><body>
        <h2> Inception  (2010) </h2>
        <ul class="moviesfiles">
          <li><a id="downloadoptionslink2" href="download1.php?downloadoptionskey=11">Inception (2010) [480p].mp4</a>
              <dcounter>(400 MB)</dcounter></li>
          <li><a id="downloadoptionslink2" href="download1.php?downloadoptionskey=12">Inception (2010) [720p].mp4</a>
              <dcounter>(900 MB)</dcounter></li>
          <li>Advertisement</li>
        </ul>
        </body></html>
    "#;

    #[test]
    fn test_parse_movie_list() {
        let movies = parse_movie_list(SEARCH_HTML, BASE).unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, "movie-Inception--hmp4.htm");
        assert_eq!(movies[0].title, "Inception");
        assert_eq!(movies[0].url, "https://fzmovies.test/movie-Inception--hmp4.htm");
        assert_eq!(movies[0].year, Some(2010));
        assert_eq!(
            movies[0].cover_photo.as_deref(),
            Some("https://fzmovies.test/imdb_images/inception.jpg")
        );

        assert_eq!(movies[1].title, "Interstellar");
        assert_eq!(movies[1].year, None);
        assert_eq!(
            movies[1].cover_photo.as_deref(),
            Some("https://img.test/interstellar.jpg")
        );
    }

    #[test]
    fn test_parse_movie_list_empty_page() {
        let movies = parse_movie_list("<html><body>No results</body></html>", BASE).unwrap();
        assert!(movies.is_empty());
    }

    #[test]
    fn test_parse_movie_page() {
        let page = parse_movie_page(MOVIE_PAGE_HTML, "fallback").unwrap();

        assert_eq!(page.title, "Inception (2010)");
        assert_eq!(page.files.len(), 2);
        assert_eq!(page.files[0].title, "Inception (2010) [480p].mp4");
        assert_eq!(page.files[0].url, "download1.php?downloadoptionskey=11");
        assert_eq!(page.files[0].size.as_deref(), Some("400 MB"));
        assert_eq!(page.files[1].size.as_deref(), Some("900 MB"));
    }

    #[test]
    fn test_parse_movie_page_without_files() {
        let result = parse_movie_page("<html><body><h2>Inception</h2></body></html>", "x");
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_parse_movie_page_uses_fallback_title() {
        let html = r#"<ul class="moviesfiles"><li><a id="downloadoptionslink1" href="d.php">file</a></li></ul>"#;
        let page = parse_movie_page(html, "Inception").unwrap();
        assert_eq!(page.title, "Inception");
        assert_eq!(page.files[0].size, None);
    }

    #[test]
    fn test_parse_download_page_link() {
        let html = r#"<p><a id="downloadlink" href="download.php?downloadkey=abc">Download</a></p>"#;
        assert_eq!(
            parse_download_page_link(html).unwrap(),
            "download.php?downloadkey=abc"
        );
    }

    #[test]
    fn test_parse_download_page_link_missing() {
        let result = parse_download_page_link("<p>expired</p>");
        assert!(matches!(result, Err(AppError::Scrape(_))));
    }

    #[test]
    fn test_parse_mirror_links() {
        let html = r#"
            <ul class="downloadlinks">
              <li><input name="download1" value="https://mirror1.test/inception.mp4"></li>
              <li><input name="download1" value=" https://mirror2.test/inception.mp4 "></li>
              <li><input name="download1" value=""></li>
              <li><input name="other" value="https://ignored.test"></li>
            </ul>
        "#;

        let links = parse_mirror_links(html).unwrap();
        assert_eq!(
            links,
            vec![
                "https://mirror1.test/inception.mp4".to_string(),
                "https://mirror2.test/inception.mp4".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_mirror_links_empty() {
        assert!(parse_mirror_links("<ul></ul>").is_err());
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url(BASE, "/a.htm"), "https://fzmovies.test/a.htm");
        assert_eq!(absolute_url(BASE, "a.htm"), "https://fzmovies.test/a.htm");
        assert_eq!(absolute_url(BASE, "https://x.test/a"), "https://x.test/a");
    }

    #[test]
    fn test_with_client_trims_trailing_slash() {
        let scraper = FzMoviesScraper::with_client(HttpClient::new(), "https://fzmovies.test/");
        assert_eq!(scraper.base_url, "https://fzmovies.test");
        assert_eq!(scraper.name(), "fzmovies");
    }

    #[tokio::test]
    async fn test_unreachable_site_is_an_error() {
        // Reserve a free port, then release it so nothing is listening there.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let scraper =
            FzMoviesScraper::with_client(HttpClient::new(), format!("http://{}", address));
        let result = scraper.search(&SearchQuery::from("Inception")).await;
        assert!(matches!(result, Err(AppError::HttpClient(_))));
    }
}
