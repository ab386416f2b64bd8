use std::collections::HashSet;

use itertools::Itertools;

use crate::{
    domain::company::{company_id, Company, FailedCompany, FieldMap},
    error::ScrapeError,
};

use super::{
    extract_overview, extract_reviews, resolve_glassdoor_urls, resolve_linkedin_url, Fetcher,
};

#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub companies: Vec<Company>,
    pub failures: Vec<FailedCompany>,
}

/// Scrapes companies one at a time in input order. Names (or ids) in
/// `skip_companies` are never fetched, and a failing company never stops the batch.
pub async fn scrape_companies(
    fetcher: &Fetcher,
    company_names: &[String],
    skip_companies: &HashSet<String>,
    limit: Option<usize>,
) -> ScrapeOutcome {
    let mut outcome = ScrapeOutcome::default();

    for name in company_names.iter().take(limit.unwrap_or(usize::MAX)) {
        if skip_companies.contains(name) || skip_companies.contains(&company_id(name)) {
            log::info!("[SKIP] {}", name);
            continue;
        }

        match scrape_company(fetcher, name).await {
            Ok(company) => outcome.companies.push(company),
            Err(error) => {
                log::error!("[FAIL] unable to parse data for {}: {}", name, error);
                outcome.failures.push(FailedCompany {
                    company_name: name.to_string(),
                    error,
                });
            }
        }
    }

    log::info!(
        "Scraped {} companies, {} failed",
        outcome.companies.len(),
        outcome.failures.len()
    );

    outcome
}

pub async fn scrape_company(fetcher: &Fetcher, name: &str) -> Result<Company, ScrapeError> {
    let (overview_url, reviews_url) = resolve_glassdoor_urls(fetcher, name).await?;
    log::info!("{} {} {}", name, overview_url, reviews_url);

    let id = company_id(name);

    let reviews_data = {
        let document = fetcher
            .get_page(&reviews_url, &format!("{}_reviews.html", id))
            .await?;
        extract_reviews(&document)?
    };
    let overview_data = {
        let document = fetcher
            .get_page(&overview_url, &format!("{}_overview.html", id))
            .await?;
        extract_overview(&document)
    };

    let linkedin_url = match resolve_linkedin_url(fetcher, name).await {
        Ok(url) => url,
        Err(e) => {
            log::warn!("No linkedin url for {}: {}", name, e);
            None
        }
    };

    let mut data = FieldMap::from([
        ("name".to_string(), Some(name.to_string())),
        ("overview_url".to_string(), Some(overview_url)),
        ("reviews_url".to_string(), Some(reviews_url)),
        ("linkedin_url".to_string(), linkedin_url),
    ]);
    data.extend(reviews_data);
    data.extend(overview_data);

    let mut company = Company::new(id);
    company.update_data(data);

    Ok(company)
}

/// Human readable summary of a batch's failures, empty when there are none.
pub fn failure_report(failures: &[FailedCompany]) -> String {
    if failures.is_empty() {
        return String::new();
    }

    let mut report = String::from("------------\n| FAILURES |\n------------\n");
    for failure in failures {
        report.push_str(&format!("[FAIL company:{}]\n{}\n", failure.company_name, failure));
    }
    report.push_str(&format!(
        "[FAIL summary] failed to get data for: [{}]",
        failures.iter().map(|f| &f.company_name).join(", ")
    ));

    report
}
