use serde::Deserialize;

/// Main configuration structure for Blog Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// The crawled site and the structural queries used to read it
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL that relative links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Blog listing page holding the article cards
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Selects each article card on the listing page
    #[serde(rename = "listing-query")]
    pub listing_query: String,

    /// Selects the category links inside one card's categories block
    #[serde(rename = "category-query")]
    pub category_query: String,

    /// Selects the content container on an article page
    #[serde(rename = "article-text-query")]
    pub article_text_query: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Fetch the body text of every article created during a crawl
    #[serde(rename = "fetch-article-text", default)]
    pub fetch_article_text: bool,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            fetch_article_text: false,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Verbose logging and request tracing
    #[serde(default)]
    pub debug: bool,

    /// Signing key for server-side sessions; unused while the API is stateless
    #[serde(rename = "secret-key", default)]
    pub secret_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            secret_key: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}
