//! Integration tests for page title enrichment
//!
//! These tests use wiremock to serve HTML pages and check the outcome of
//! every title lookup.

use sitemap_harvest::config::FetcherConfig;
use sitemap_harvest::crawler::{build_http_client, Fetcher, PageTitle, TitleEnricher};
use sitemap_harvest::progress::NoProgress;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn enricher(concurrency: usize, timeout: Duration) -> TitleEnricher {
    let client = build_http_client(&FetcherConfig::default()).expect("client");
    TitleEnricher::new(Fetcher::new(client), concurrency, timeout)
}

async fn serve_html(server: &MockServer, route: &str, html: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_titled_page_and_timeout() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_html(
        &server,
        "/hello",
        "<html><head><title>Hello</title></head><body></body></html>",
        Duration::ZERO,
    )
    .await;
    serve_html(
        &server,
        "/slow",
        "<html><head><title>Too late</title></head></html>",
        Duration::from_secs(3),
    )
    .await;

    let hello = format!("{}/hello", base);
    let slow = format!("{}/slow", base);
    let urls = vec![hello.clone(), slow.clone()];

    let outcomes = enricher(10, Duration::from_millis(500))
        .enrich(&urls, &NoProgress)
        .await;

    assert_eq!(outcomes.len(), 2);
    let hello_outcome = outcomes.iter().find(|o| o.url == hello).expect("hello");
    assert_eq!(hello_outcome.title, PageTitle::Title("Hello".to_string()));
    let slow_outcome = outcomes.iter().find(|o| o.url == slow).expect("slow");
    assert!(slow_outcome.title.is_error());
}

#[tokio::test]
async fn test_outcome_count_matches_input() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_html(&server, "/page", "<title>Page</title>", Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut urls = Vec::new();
    for i in 0..15 {
        if i % 3 == 0 {
            urls.push(format!("{}/broken", base));
        } else {
            urls.push(format!("{}/page", base));
        }
    }

    let outcomes = enricher(4, Duration::from_secs(5))
        .enrich(&urls, &NoProgress)
        .await;

    assert_eq!(outcomes.len(), urls.len());
    assert_eq!(outcomes.iter().filter(|o| o.title.is_error()).count(), 5);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| o.title == PageTitle::Title("Page".to_string()))
            .count(),
        10
    );
}

#[tokio::test]
async fn test_missing_and_blank_titles() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_html(&server, "/none", "<html><body>No head</body></html>", Duration::ZERO).await;
    serve_html(&server, "/blank", "<title>   </title>", Duration::ZERO).await;
    serve_html(
        &server,
        "/spaced",
        "<title>\n   Spaced   out \n</title>",
        Duration::ZERO,
    )
    .await;

    let urls = vec![
        format!("{}/none", base),
        format!("{}/blank", base),
        format!("{}/spaced", base),
    ];
    let outcomes = enricher(3, Duration::from_secs(5))
        .enrich(&urls, &NoProgress)
        .await;

    let title_of = |suffix: &str| {
        outcomes
            .iter()
            .find(|o| o.url.ends_with(suffix))
            .map(|o| o.title.clone())
            .expect("outcome")
    };
    assert_eq!(title_of("/none"), PageTitle::NoTitle);
    assert_eq!(title_of("/blank"), PageTitle::NoTitle);
    assert_eq!(title_of("/spaced"), PageTitle::Title("Spaced   out".to_string()));
}

#[tokio::test]
async fn test_not_found_is_error_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let urls = vec![format!("{}/gone", server.uri())];
    let outcomes = enricher(1, Duration::from_secs(5))
        .enrich(&urls, &NoProgress)
        .await;

    assert_eq!(outcomes.len(), 1);
    match &outcomes[0].title {
        PageTitle::Error(reason) => assert!(reason.contains("404")),
        other => panic!("expected error outcome, got {:?}", other),
    }
}
