use std::collections::HashSet;

use actix_web::{get, post, web, HttpResponse};
use itertools::Itertools;
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    dal::company_db,
    domain::company::{company_id, Company},
    services::{failure_report, post_process, scrape_companies, Fetcher},
};

#[derive(Deserialize, Default)]
struct ScrapeCompaniesBody {
    companies: Option<String>,
}

/// `"Airbnb, Google,,"` -> `["Airbnb", "Google"]`
pub fn parse_company_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names requested by a POST body. An empty body or a missing/empty
/// `companies` field yields no names.
pub fn parse_requested_names(body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let body: ScrapeCompaniesBody = match body.is_empty() {
        true => ScrapeCompaniesBody::default(),
        false => serde_json::from_slice(body)?,
    };

    Ok(parse_company_names(body.companies.as_deref().unwrap_or_default()))
}

/// Requested names whose derived id is already stored.
pub fn skip_set(names: &[String], existing_ids: &HashSet<String>) -> HashSet<String> {
    names
        .iter()
        .filter(|n| existing_ids.contains(&company_id(n)))
        .cloned()
        .collect()
}

pub fn merge_companies(scraped: Vec<Company>, known: Vec<Company>) -> Vec<Company> {
    scraped
        .into_iter()
        .chain(known)
        .sorted_by(|a, b| a.name().cmp(b.name()))
        .collect()
}

async fn all_companies_response(pool: &PgPool) -> HttpResponse {
    match company_db::get_all_companies(pool).await {
        Ok(companies) => HttpResponse::Ok().json(companies),
        Err(e) => {
            log::error!("Failed to fetch companies: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("")]
pub async fn get_companies(pool: web::Data<PgPool>) -> HttpResponse {
    all_companies_response(&pool).await
}

/// The body is read as JSON whatever its content type.
#[post("")]
pub async fn post_companies(
    pool: web::Data<PgPool>,
    fetcher: web::Data<Fetcher>,
    body: web::Bytes,
) -> HttpResponse {
    let names = match parse_requested_names(&body) {
        Ok(names) => names,
        Err(e) => return HttpResponse::BadRequest().body(format!("Invalid body: {}", e)),
    };
    if names.is_empty() {
        return all_companies_response(&pool).await;
    }

    let ids: Vec<String> = names.iter().map(|n| company_id(n)).collect();
    let existing_ids = match company_db::get_existing_company_ids(&pool, &ids).await {
        Ok(existing_ids) => existing_ids,
        Err(e) => {
            log::error!("Failed to look up existing companies: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };
    let skip_companies = skip_set(&names, &existing_ids);

    let mut outcome = scrape_companies(&fetcher, &names, &skip_companies, None).await;
    if !outcome.failures.is_empty() {
        log::error!("{}", failure_report(&outcome.failures));
    }

    post_process(&mut outcome.companies);

    for company in outcome.companies.iter() {
        if let Err(e) = company_db::upsert_company(&pool, company, false).await {
            log::error!("Failed to persist {}: {:?}", company.id(), e);
        }
    }

    let known_ids: Vec<String> = existing_ids.into_iter().collect();
    let known = match company_db::get_companies_by_ids(&pool, &known_ids).await {
        Ok(known) => known,
        Err(e) => {
            log::error!("Failed to fetch known companies: {:?}", e);
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(merge_companies(outcome.companies, known))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::CompanyField;

    fn named(name: &str) -> Company {
        let mut company = Company::new(company_id(name));
        company.set(CompanyField::Name, Some(name.to_string()));
        company
    }

    #[test]
    fn parses_and_trims_names() {
        assert_eq!(
            parse_company_names(" Airbnb, Google ,, ,Walt Disney"),
            vec!["Airbnb", "Google", "Walt Disney"]
        );
        assert!(parse_company_names(" , ").is_empty());
    }

    #[test]
    fn missing_or_empty_companies_request_nothing() {
        assert!(parse_requested_names(b"").unwrap().is_empty());
        assert!(parse_requested_names(b"{}").unwrap().is_empty());
        assert!(parse_requested_names(br#"{"companies": ""}"#).unwrap().is_empty());
        assert!(parse_requested_names(br#"{"companies": null}"#).unwrap().is_empty());
    }

    #[test]
    fn requested_names_are_parsed_from_body() {
        let names = parse_requested_names(br#"{"companies": "Airbnb, Google"}"#).unwrap();

        assert_eq!(names, vec!["Airbnb", "Google"]);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_requested_names(b"companies=Airbnb").is_err());
    }

    #[test]
    fn skip_set_holds_names_already_stored() {
        let names = vec![
            "Walt Disney".to_string(),
            "Lyft".to_string(),
            "Airbnb".to_string(),
        ];
        let existing_ids = HashSet::from(["walt_disney".to_string(), "airbnb".to_string()]);

        let skip = skip_set(&names, &existing_ids);

        assert_eq!(
            skip,
            HashSet::from(["Walt Disney".to_string(), "Airbnb".to_string()])
        );
    }

    #[test]
    fn merged_companies_are_sorted_by_name() {
        let merged = merge_companies(vec![named("Lyft"), named("Airbnb")], vec![named("Google")]);
        let names: Vec<&str> = merged.iter().map(|c| c.name()).collect();

        assert_eq!(names, vec!["Airbnb", "Google", "Lyft"]);
    }

    #[test]
    fn body_without_companies_parses() {
        let body: ScrapeCompaniesBody = serde_json::from_str("{}").unwrap();
        assert!(body.companies.is_none());
    }
}
