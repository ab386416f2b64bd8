#![allow(dead_code)]

use std::path::Path;

use glassbox::{configuration::ScraperSettings, services::Fetcher};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn fetcher_for(server: &MockServer, cache_dir: &Path, use_cache: bool) -> Fetcher {
    let settings = ScraperSettings {
        search_url: format!("{}/search", server.uri()),
        cache_dir: cache_dir.to_path_buf(),
        request_timeout_secs: 5,
        use_cache,
    };
    Fetcher::new(&settings).expect("fetcher builds")
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Search result page whose anchors point at `hrefs`, in order.
pub fn search_page(hrefs: &[String]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}"><div>Result</div></a>"#, href))
        .collect();
    format!("<html><body><a href=\"/advanced\">Advanced</a>{}</body></html>", anchors)
}

pub fn overview_page(website: &str) -> String {
    format!(
        r#"<html><body>
            <span class="sqLogo tighten lgSqLogo logoOverlay"><img src="https://media.example/logo.png"></span>
            <div class="infoEntity"><label>Website</label><span>{}</span></div>
            <div class="infoEntity"><label>Type</label><span>Company - Private</span></div>
            <div class="infoEntity"><label>Revenue</label><span>Unknown / Non-Applicable</span></div>
        </body></html>"#,
        website
    )
}

pub fn reviews_page(rating: &str, count: &str) -> String {
    format!(
        r#"<html><body><div id="EmpStats">
            <span class="count">{}</span>
            <div class="common__EIReviewsRatingsStyles__ratingNum">{}</div>
        </div></body></html>"#,
        count, rating
    )
}

pub fn overview_path(company: &str) -> String {
    format!("/glassdoor.com/Overview/Working-at-{}-EI_IE1.htm", company)
}

pub fn reviews_path(company: &str) -> String {
    format!("/glassdoor.com/Reviews/{}-Reviews-E1.htm", company)
}

pub async fn mount_search(server: &MockServer, query: &str, hrefs: &[String]) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", query))
        .respond_with(html_response(search_page(hrefs)))
        .mount(server)
        .await;
}

/// Any search without a dedicated mock gets an empty result page.
pub async fn mount_empty_searches(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_response(search_page(&[])))
        .with_priority(10)
        .mount(server)
        .await;
}

pub async fn mount_page(server: &MockServer, url_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

/// Mounts the search results and both aggregator pages of a company.
pub async fn mount_company(server: &MockServer, company: &str, reviews_body: String) {
    let hrefs = vec![
        format!("{}{}", server.uri(), overview_path(company)),
        format!("{}{}", server.uri(), reviews_path(company)),
    ];
    mount_search(server, &format!("{} glassdoor", company), &hrefs).await;
    mount_page(
        server,
        &overview_path(company),
        overview_page(&format!("www.{}.com", company.to_lowercase())),
    )
    .await;
    mount_page(server, &reviews_path(company), reviews_body).await;
}
