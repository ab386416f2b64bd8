use scraper::{ElementRef, Html, Selector};

use crate::{
    domain::search_link::{find_glassdoor_urls, find_linkedin_url, SearchLink},
    error::ScrapeError,
};

use super::Fetcher;

pub fn build_glassdoor_query(company: &str) -> String {
    format!("{} glassdoor", company)
}

pub fn build_overview_query(company: &str) -> String {
    format!("{} overview glassdoor", company)
}

pub fn build_reviews_query(company: &str) -> String {
    format!("{} reviews glassdoor", company)
}

pub fn build_linkedin_query(company: &str) -> String {
    format!("{} linkedin", company)
}

/// Every anchor with an href, in document order. The label is the text of the
/// first nested `div` (the result title), or the anchor text when there is none.
pub fn collect_search_links(document: &Html) -> Vec<SearchLink> {
    let a_tag_selector = Selector::parse("a").unwrap();
    let div_selector = Selector::parse("div").unwrap();

    document
        .select(&a_tag_selector)
        .filter_map(|tag| {
            tag.value().attr("href").map(|href| {
                let label = match tag.select(&div_selector).next() {
                    Some(div) => element_text(div),
                    None => element_text(tag),
                };
                SearchLink::new(href, label)
            })
        })
        .collect()
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

async fn search_links(fetcher: &Fetcher, query: &str) -> Result<Vec<SearchLink>, ScrapeError> {
    let document = fetcher.search(query).await?;
    let links = collect_search_links(&document);
    log::debug!("Found {} links on query: {}", links.len(), query);

    Ok(links)
}

/// Resolves the (overview, reviews) pages of a company. Whatever the first
/// query misses gets one more category specific query.
pub async fn resolve_glassdoor_urls(
    fetcher: &Fetcher,
    company: &str,
) -> Result<(String, String), ScrapeError> {
    let links = search_links(fetcher, &build_glassdoor_query(company)).await?;
    let mut urls = find_glassdoor_urls(&links);

    if urls.overview_url.is_none() {
        let links = search_links(fetcher, &build_overview_query(company)).await?;
        urls.overview_url = find_glassdoor_urls(&links).overview_url;
    }
    if urls.reviews_url.is_none() {
        let links = search_links(fetcher, &build_reviews_query(company)).await?;
        urls.reviews_url = find_glassdoor_urls(&links).reviews_url;
    }

    match (urls.overview_url, urls.reviews_url) {
        (Some(overview_url), Some(reviews_url)) => Ok((overview_url, reviews_url)),
        (overview_url, reviews_url) => Err(ScrapeError::Resolution {
            company: company.to_string(),
            overview_url,
            reviews_url,
        }),
    }
}

pub async fn resolve_linkedin_url(
    fetcher: &Fetcher,
    company: &str,
) -> Result<Option<String>, ScrapeError> {
    let links = search_links(fetcher, &build_linkedin_query(company)).await?;
    Ok(find_linkedin_url(&links))
}
