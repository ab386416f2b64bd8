use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use scraper::Html;
use url::Url;

use crate::{configuration::ScraperSettings, error::ScrapeError};

/// Sites reject the default client signature, so every request goes out as a desktop browser.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/42.0.2311.135 Safari/537.36 Edge/12.246";

pub struct Fetcher {
    client: reqwest::Client,
    search_url: String,
    cache_dir: PathBuf,
    use_cache: bool,
}

impl Fetcher {
    pub fn new(settings: &ScraperSettings) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Fetcher {
            client,
            search_url: settings.search_url.clone(),
            cache_dir: settings.cache_dir.clone(),
            use_cache: settings.use_cache,
        })
    }

    pub fn use_cache(&self) -> bool {
        self.use_cache
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// GETs `url` and parses the body. With a `cache_key` the raw body is
    /// also written to the content cache first.
    pub async fn fetch(&self, url: &str, cache_key: Option<&str>) -> Result<Html, ScrapeError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if let Some(key) = cache_key {
            self.write_cache(key, &body).await?;
        }

        Ok(Html::parse_document(&body))
    }

    /// Parses a previously cached body without touching the network.
    pub async fn read_cached(&self, cache_key: &str) -> Result<Html, ScrapeError> {
        let path = self.cache_path(cache_key);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(Html::parse_document(&body)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ScrapeError::CacheNotFound(cache_file_name(cache_key)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Live fetch that refreshes the cache, or a cache read in replay mode.
    pub async fn get_page(&self, url: &str, cache_key: &str) -> Result<Html, ScrapeError> {
        match self.use_cache {
            true => self.read_cached(cache_key).await,
            false => self.fetch(url, Some(cache_key)).await,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Html, ScrapeError> {
        let url = Url::parse_with_params(&self.search_url, &[("q", query)])?;
        log::debug!("Searching: {}", url);

        self.get_page(url.as_str(), &search_cache_key(query)).await
    }

    fn cache_path(&self, cache_key: &str) -> PathBuf {
        self.cache_dir.join(cache_file_name(cache_key))
    }

    async fn write_cache(&self, cache_key: &str, body: &str) -> Result<(), ScrapeError> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        tokio::fs::write(self.cache_path(cache_key), body).await?;
        Ok(())
    }
}

pub fn search_cache_key(query: &str) -> String {
    format!("google_{}.html", query)
}

/// Lower-cased, spaces become `_`, anything outside `[a-z0-9._-]` is replaced
/// so a key can never leave the cache directory.
pub fn cache_file_name(cache_key: &str) -> String {
    cache_key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}
