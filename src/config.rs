use serde::Deserialize;

/// Application configuration loaded from environment variables
///
/// Every field has a default, so an empty environment yields the stock
/// deployment: listen on `0.0.0.0:8000`, scrape fzmovies, fall back to vidsrc.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the movie site scraped for search, navigation and links
    #[serde(default = "default_fzmovies_url")]
    pub fzmovies_url: String,

    /// Base URL of the embed service used when resolution fails
    #[serde(default = "default_fallback_embed_url")]
    pub fallback_embed_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_fzmovies_url() -> String {
    "https://fzmovies.net".to_string()
}

fn default_fallback_embed_url() -> String {
    "https://vidsrc.to".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            fzmovies_url: default_fzmovies_url(),
            fallback_embed_url: default_fallback_embed_url(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
