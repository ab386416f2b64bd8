use thiserror::Error;

/// Everything that can go wrong while scraping a single company.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("cannot find both urls for \"{company}\": overview={overview_url:?} reviews={reviews_url:?}")]
    Resolution {
        company: String,
        overview_url: Option<String>,
        reviews_url: Option<String>,
    },

    #[error("missing `{marker}` on {page} page")]
    Extraction {
        page: &'static str,
        marker: &'static str,
    },

    #[error("no cached page under key {0}")]
    CacheNotFound(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn extraction(page: &'static str, marker: &'static str) -> Self {
        ScrapeError::Extraction { page, marker }
    }
}
