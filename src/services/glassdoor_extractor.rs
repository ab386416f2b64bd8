use std::collections::BTreeSet;

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};

use crate::{domain::company::FieldMap, error::ScrapeError};

pub const OVERVIEW_KEYS: [&str; 10] = [
    "Website",
    "Headquarters",
    "Part of",
    "Size",
    "Founded",
    "Type",
    "Industry",
    "Revenue",
    "Competitors",
    "Logo URL",
];

const LOGO_KEY: &str = "Logo URL";
const EMP_STATS: &str = "div#EmpStats";
const REVIEW_COUNT: &str = "span.count";
const RATING: &str = "div.common__EIReviewsRatingsStyles__ratingNum";

/// Whitespace runs (tabs and newlines included) collapse to one space so a
/// value always fits in a single TSV cell.
fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().split_whitespace().join(" ")
}

/// Labels found on the page that are not part of [`OVERVIEW_KEYS`].
pub fn unexpected_overview_keys(info: &FieldMap) -> Vec<&str> {
    let expected: BTreeSet<&str> = OVERVIEW_KEYS.into_iter().collect();
    info.keys()
        .map(String::as_str)
        .filter(|k| !expected.contains(k))
        .collect()
}

/// Firmographic fields of an overview page. Every key of [`OVERVIEW_KEYS`] is
/// present in the result, `None` when the page does not carry it.
pub fn extract_overview(document: &Html) -> FieldMap {
    let info_entity_selector = Selector::parse("div.infoEntity").unwrap();
    let label_selector = Selector::parse("label").unwrap();
    let value_selector = Selector::parse("span").unwrap();
    let logo_selector = Selector::parse("span.sqLogo.tighten.lgSqLogo.logoOverlay img").unwrap();

    let mut info = FieldMap::new();
    for entity in document.select(&info_entity_selector) {
        let label = entity.select(&label_selector).next().map(text_of);
        let value = entity.select(&value_selector).next().map(text_of);
        match (label, value) {
            (Some(label), Some(value)) => {
                info.insert(label, Some(value));
            }
            _ => log::debug!("Skipping info entity without label or value"),
        }
    }

    let logo_url = document
        .select(&logo_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string);
    info.insert(LOGO_KEY.to_string(), logo_url);

    let unexpected_keys = unexpected_overview_keys(&info);
    if !unexpected_keys.is_empty() {
        let website = info.get("Website").cloned().flatten().unwrap_or_default();
        log::warn!(
            "Unexpected overview keys for company \"{}\": {:?}",
            website,
            unexpected_keys
        );
    }

    OVERVIEW_KEYS
        .into_iter()
        .map(|key| (key.to_string(), info.get(key).cloned().flatten()))
        .collect()
}

/// Rating and review count from the statistics block of a reviews page.
pub fn extract_reviews(document: &Html) -> Result<FieldMap, ScrapeError> {
    let stats_selector = Selector::parse(EMP_STATS).unwrap();
    let count_selector = Selector::parse(REVIEW_COUNT).unwrap();
    let rating_selector = Selector::parse(RATING).unwrap();

    let stats = document
        .select(&stats_selector)
        .next()
        .ok_or(ScrapeError::extraction("reviews", EMP_STATS))?;
    let review_counts = stats
        .select(&count_selector)
        .next()
        .map(text_of)
        .ok_or(ScrapeError::extraction("reviews", REVIEW_COUNT))?;
    let rating = stats
        .select(&rating_selector)
        .next()
        .map(text_of)
        .ok_or(ScrapeError::extraction("reviews", RATING))?;

    Ok(FieldMap::from([
        ("rating".to_string(), Some(rating)),
        ("review_counts".to_string(), Some(review_counts)),
    ]))
}
