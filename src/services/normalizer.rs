use std::sync::LazyLock;

use regex::Regex;

use crate::domain::company::{Company, CompanyField};

const SUBSIDIARY_TYPE: &str = "Subsidiary or Business Segment";
const UNKNOWN_REVENUE: &str = "Unknown / Non-Applicable";

static TYPE_MAPPING: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"Company - Private").unwrap(), "Private"),
        (Regex::new(r"Company - Public (\(\w+\))").unwrap(), "Public ${1}"),
    ]
});

fn transform_type(company: &mut Company) {
    let new_type = match (company.get(CompanyField::PartOf), company.get(CompanyField::Type)) {
        (Some(part_of), _) => Some(format!("Subsidiary of {}", part_of)),
        (None, Some(SUBSIDIARY_TYPE)) => Some("Subsidiary".to_string()),
        (None, Some(company_type)) => Some(
            TYPE_MAPPING
                .iter()
                .fold(company_type.to_string(), |acc, (re, rep)| {
                    re.replace_all(&acc, *rep).into_owned()
                }),
        ),
        (None, None) => None,
    };

    company.set(CompanyField::Type, new_type);
}

fn has_http_scheme(website: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        website
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn transform_website(company: &mut Company) {
    let website = match company.get(CompanyField::Website) {
        Some(w) if !w.is_empty() && !has_http_scheme(w) => {
            format!("https://{}", w)
        }
        _ => return,
    };

    company.set(CompanyField::Website, Some(website));
}

fn transform_revenue(company: &mut Company) {
    if company.get(CompanyField::Revenue) == Some(UNKNOWN_REVENUE) {
        company.set(CompanyField::Revenue, None);
    }
}

/// Rewrites ownership type, website scheme and revenue placeholder in place.
pub fn post_process(companies: &mut [Company]) {
    for company in companies.iter_mut() {
        transform_type(company);
        transform_website(company);
        transform_revenue(company);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company_with(fields: &[(CompanyField, &str)]) -> Company {
        let mut company = Company::new("acme");
        for (field, value) in fields {
            company.set(*field, Some(value.to_string()));
        }
        company
    }

    fn normalized(fields: &[(CompanyField, &str)]) -> Company {
        let mut companies = vec![company_with(fields)];
        post_process(&mut companies);
        companies.remove(0)
    }

    #[test]
    fn part_of_wins_over_any_type() {
        let company = normalized(&[
            (CompanyField::PartOf, "Acme Corp"),
            (CompanyField::Type, "Company - Private"),
        ]);

        assert_eq!(company.get(CompanyField::Type), Some("Subsidiary of Acme Corp"));
    }

    #[test]
    fn business_segment_becomes_subsidiary() {
        let company = normalized(&[(CompanyField::Type, "Subsidiary or Business Segment")]);

        assert_eq!(company.get(CompanyField::Type), Some("Subsidiary"));
    }

    #[test]
    fn company_types_are_shortened() {
        let private = normalized(&[(CompanyField::Type, "Company - Private")]);
        let public = normalized(&[(CompanyField::Type, "Company - Public (LYFT)")]);
        let other = normalized(&[(CompanyField::Type, "Nonprofit Organization")]);

        assert_eq!(private.get(CompanyField::Type), Some("Private"));
        assert_eq!(public.get(CompanyField::Type), Some("Public (LYFT)"));
        assert_eq!(other.get(CompanyField::Type), Some("Nonprofit Organization"));
    }

    #[test]
    fn absent_type_stays_absent() {
        let company = normalized(&[]);

        assert_eq!(company.get(CompanyField::Type), None);
    }

    #[test]
    fn website_gets_https_scheme() {
        let bare = normalized(&[(CompanyField::Website, "example.com")]);
        let https = normalized(&[(CompanyField::Website, "https://example.com")]);
        let http = normalized(&[(CompanyField::Website, "http://example.com")]);

        assert_eq!(bare.get(CompanyField::Website), Some("https://example.com"));
        assert_eq!(https.get(CompanyField::Website), Some("https://example.com"));
        assert_eq!(http.get(CompanyField::Website), Some("http://example.com"));
    }

    #[test]
    fn website_scheme_check_ignores_case() {
        let upper = normalized(&[(CompanyField::Website, "HTTP://x.com")]);
        let mixed = normalized(&[(CompanyField::Website, "Https://x.com")]);

        assert_eq!(upper.get(CompanyField::Website), Some("HTTP://x.com"));
        assert_eq!(mixed.get(CompanyField::Website), Some("Https://x.com"));
    }

    #[test]
    fn unknown_revenue_becomes_absent() {
        let unknown = normalized(&[(CompanyField::Revenue, "Unknown / Non-Applicable")]);
        let known = normalized(&[(CompanyField::Revenue, "$1 to $5 billion (USD)")]);

        assert_eq!(unknown.get(CompanyField::Revenue), None);
        assert_eq!(known.get(CompanyField::Revenue), Some("$1 to $5 billion (USD)"));
    }
}
