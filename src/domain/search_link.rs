use std::sync::LazyLock;

use regex::Regex;
use url::Url;

const AGGREGATOR_HOSTS: [&str; 2] = ["glassdoor.com/", "glassdoor.ca/"];
const OVERVIEW_MARKER: &str = "Overview";
const REVIEWS_MARKER: &str = "Reviews";
const EMPLOYEE_REVIEW_MARKER: &str = "Employee-Review";
const WORKING_AT_LABEL: &str = "Working at";

static LINKEDIN_COMPANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://www\.linkedin\.com/company/[\w-]+/").expect("valid linkedin regex")
});

/// An anchor from a search results page.
#[derive(Debug, PartialEq, Clone)]
pub struct SearchLink {
    pub href: String,
    pub label: String,
}

impl SearchLink {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        SearchLink {
            href: href.into(),
            label: label.into(),
        }
    }

    /// Destination of the link with the search engine redirect removed.
    pub fn target_url(&self) -> String {
        unwrap_search_redirect(&self.href)
    }
}

/// `/url?q=<target>&sa=...` -> `<target>`, anything else is returned as is.
pub fn unwrap_search_redirect(href: &str) -> String {
    if !href.starts_with("/url?") {
        return href.to_string();
    }

    Url::parse("https://www.google.com")
        .and_then(|base| base.join(href))
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or_else(|| href.to_string())
}

pub fn is_aggregator_url(url: &str) -> bool {
    AGGREGATOR_HOSTS.iter().any(|host| url.contains(host))
}

pub fn is_overview_link(url: &str, label: &str) -> bool {
    url.contains(OVERVIEW_MARKER) || label.trim().starts_with(WORKING_AT_LABEL)
}

pub fn is_reviews_link(url: &str) -> bool {
    url.contains(REVIEWS_MARKER) && !url.contains(EMPLOYEE_REVIEW_MARKER)
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GlassdoorUrls {
    pub overview_url: Option<String>,
    pub reviews_url: Option<String>,
}

impl GlassdoorUrls {
    pub fn is_complete(&self) -> bool {
        self.overview_url.is_some() && self.reviews_url.is_some()
    }
}

/// Scans links in document order; the first match per category wins.
pub fn find_glassdoor_urls(links: &[SearchLink]) -> GlassdoorUrls {
    let mut urls = GlassdoorUrls::default();

    for link in links {
        if urls.is_complete() {
            break;
        }

        let url = link.target_url();
        if !is_aggregator_url(&url) {
            continue;
        }

        if urls.overview_url.is_none() && is_overview_link(&url, &link.label) {
            urls.overview_url = Some(url.clone());
        }
        if urls.reviews_url.is_none() && is_reviews_link(&url) {
            urls.reviews_url = Some(url);
        }
    }

    urls
}

pub fn find_linkedin_url(links: &[SearchLink]) -> Option<String> {
    links.iter().find_map(|link| {
        LINKEDIN_COMPANY_RE
            .find(&link.target_url())
            .map(|m| m.as_str().to_string())
    })
}
