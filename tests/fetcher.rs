mod common;

use glassbox::{
    error::ScrapeError,
    services::{cache_file_name, search_cache_key, USER_AGENT},
};
use scraper::Selector;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::fetcher_for;

#[tokio::test]
async fn fetch_sends_browser_user_agent_and_writes_cache() {
    let server = MockServer::start().await;
    let cache_dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><h1>Hello</h1></html>"))
        .expect(1)
        .mount(&server)
        .await;
    let fetcher = fetcher_for(&server, &cache_dir.path().join("cache"), false);

    let document = fetcher
        .fetch(&format!("{}/page", server.uri()), Some("Some Page.html"))
        .await
        .unwrap();

    let h1 = Selector::parse("h1").unwrap();
    assert_eq!(document.select(&h1).count(), 1);
    let requests = server.received_requests().await.unwrap();
    let user_agent = requests[0].headers.get("user-agent").unwrap();
    assert_eq!(user_agent.to_str().unwrap(), USER_AGENT);
    let cached = std::fs::read_to_string(cache_dir.path().join("cache").join("some_page.html")).unwrap();
    assert_eq!(cached, "<html><h1>Hello</h1></html>");
}

#[tokio::test]
async fn fetch_without_key_leaves_cache_untouched() {
    let server = MockServer::start().await;
    let cache_dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .mount(&server)
        .await;
    let fetcher = fetcher_for(&server, &cache_dir.path().join("cache"), false);

    fetcher.fetch(&server.uri(), None).await.unwrap();

    assert!(!cache_dir.path().join("cache").exists());
}

#[tokio::test]
async fn read_cached_returns_stored_page() {
    let server = MockServer::start().await;
    let cache_dir = tempfile::tempdir().unwrap();
    let key = search_cache_key("Lyft glassdoor");
    std::fs::write(cache_dir.path().join(cache_file_name(&key)), "<p class=\"x\">cached</p>").unwrap();
    let fetcher = fetcher_for(&server, cache_dir.path(), true);

    let document = fetcher.read_cached(&key).await.unwrap();

    let p = Selector::parse("p.x").unwrap();
    assert_eq!(document.select(&p).count(), 1);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn read_cached_missing_key_is_not_found() {
    let server = MockServer::start().await;
    let cache_dir = tempfile::tempdir().unwrap();
    let fetcher = fetcher_for(&server, cache_dir.path(), true);

    let err = fetcher.read_cached("nothing_here.html").await.unwrap_err();

    assert!(matches!(err, ScrapeError::CacheNotFound(key) if key == "nothing_here.html"));
}

#[tokio::test]
async fn error_status_is_an_http_error() {
    let server = MockServer::start().await;
    let cache_dir = tempfile::tempdir().unwrap();
    let fetcher = fetcher_for(&server, cache_dir.path(), false);

    let err = fetcher
        .fetch(&format!("{}/missing", server.uri()), Some("missing.html"))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::Http(_)));
    assert!(!cache_dir.path().join("missing.html").exists());
}
