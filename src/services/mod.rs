pub mod catalog;
pub mod providers;
pub mod resolve;

pub use providers::{FzMoviesScraper, MovieScraper};
pub use resolve::FallbackEmbedSource;
