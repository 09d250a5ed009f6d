//! Integration tests for sitemap resolution
//!
//! These tests use wiremock to serve sitemap trees over HTTP and check the
//! flattened results end-to-end.

use sitemap_harvest::config::FetcherConfig;
use sitemap_harvest::crawler::{build_http_client, Fetcher};
use sitemap_harvest::progress::NoProgress;
use sitemap_harvest::sitemap::{ErrorKind, MultiSourceResolver, SitemapResolver};
use sitemap_harvest::SourceLocation;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> SitemapResolver {
    let client = build_http_client(&FetcherConfig::default()).expect("client");
    SitemapResolver::new(Fetcher::new(client), Duration::from_secs(5), 8)
}

fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|c| format!("<sitemap><loc>{}</loc></sitemap>", c))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

async fn serve_xml(server: &MockServer, route: &str, body: String, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "application/xml")
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_index_to_leaf_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/leaf.xml", base)]),
        Duration::ZERO,
    )
    .await;
    serve_xml(
        &server,
        "/leaf.xml",
        urlset(&[format!("{}/a", base), format!("{}/b", base)]),
        Duration::ZERO,
    )
    .await;

    let root = SourceLocation::new(format!("{}/sitemap.xml", base));
    let result = resolver().resolve(&root).await;

    assert_eq!(result.root, root);
    assert_eq!(result.urls, vec![format!("{}/a", base), format!("{}/b", base)]);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_relative_child_locations_are_joined() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_xml(
        &server,
        "/maps/index.xml",
        sitemap_index(&["posts.xml".to_string()]),
        Duration::ZERO,
    )
    .await;
    serve_xml(
        &server,
        "/maps/posts.xml",
        urlset(&[format!("{}/post/1", base)]),
        Duration::ZERO,
    )
    .await;

    let root = SourceLocation::new(format!("{}/maps/index.xml", base));
    let result = resolver().resolve(&root).await;

    assert_eq!(result.urls, vec![format!("{}/post/1", base)]);
}

#[tokio::test]
async fn test_failing_middle_child_is_isolated() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_xml(
        &server,
        "/index.xml",
        sitemap_index(&[
            format!("{}/a.xml", base),
            format!("{}/b.xml", base),
            format!("{}/c.xml", base),
        ]),
        Duration::ZERO,
    )
    .await;
    serve_xml(&server, "/a.xml", urlset(&[format!("{}/a1", base)]), Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    serve_xml(
        &server,
        "/c.xml",
        urlset(&[format!("{}/c1", base), format!("{}/c2", base)]),
        Duration::ZERO,
    )
    .await;

    let root = SourceLocation::new(format!("{}/index.xml", base));
    let result = resolver().resolve(&root).await;

    assert_eq!(
        result.urls,
        vec![
            format!("{}/a1", base),
            format!("{}/c1", base),
            format!("{}/c2", base)
        ]
    );
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].location.as_str(), format!("{}/b.xml", base));
    assert_eq!(result.errors[0].kind, ErrorKind::Fetch);
}

#[tokio::test]
async fn test_slow_child_times_out_without_hiding_siblings() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_xml(
        &server,
        "/index.xml",
        sitemap_index(&[format!("{}/slow.xml", base), format!("{}/fast.xml", base)]),
        Duration::ZERO,
    )
    .await;
    serve_xml(
        &server,
        "/slow.xml",
        urlset(&[format!("{}/never", base)]),
        Duration::from_secs(3),
    )
    .await;
    serve_xml(&server, "/fast.xml", urlset(&[format!("{}/fast", base)]), Duration::ZERO).await;

    let client = build_http_client(&FetcherConfig::default()).expect("client");
    let resolver = SitemapResolver::new(Fetcher::new(client), Duration::from_millis(300), 8);
    let result = resolver
        .resolve(&SourceLocation::new(format!("{}/index.xml", base)))
        .await;

    assert_eq!(result.urls, vec![format!("{}/fast", base)]);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ErrorKind::Fetch);
}

#[tokio::test]
async fn test_results_keep_input_order_when_later_root_finishes_first() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_xml(
        &server,
        "/root1.xml",
        urlset(&[format!("{}/one", base)]),
        Duration::from_millis(500),
    )
    .await;
    serve_xml(&server, "/root2.xml", urlset(&[format!("{}/two", base)]), Duration::ZERO).await;

    let roots = vec![
        SourceLocation::new(format!("{}/root1.xml", base)),
        SourceLocation::new(format!("{}/root2.xml", base)),
    ];

    let finished = std::sync::Mutex::new(Vec::new());
    let observer = |_current: usize, _total: usize, label: &str| {
        finished.lock().unwrap().push(label.to_string());
    };

    let results = MultiSourceResolver::new(resolver(), 2)
        .resolve_all(&roots, &observer)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].root, roots[0]);
    assert_eq!(results[0].urls, vec![format!("{}/one", base)]);
    assert_eq!(results[1].root, roots[1]);
    assert_eq!(results[1].urls, vec![format!("{}/two", base)]);

    // Progress follows completion order
    assert_eq!(finished.into_inner().unwrap(), vec!["root2.xml", "root1.xml"]);
}

#[tokio::test]
async fn test_remote_cycle_is_reported() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve_xml(
        &server,
        "/a.xml",
        sitemap_index(&[format!("{}/b.xml", base), format!("{}/leaf.xml", base)]),
        Duration::ZERO,
    )
    .await;
    serve_xml(
        &server,
        "/b.xml",
        sitemap_index(&[format!("{}/a.xml", base)]),
        Duration::ZERO,
    )
    .await;
    serve_xml(&server, "/leaf.xml", urlset(&[format!("{}/page", base)]), Duration::ZERO).await;

    let result = resolver()
        .resolve(&SourceLocation::new(format!("{}/a.xml", base)))
        .await;

    assert_eq!(result.urls, vec![format!("{}/page", base)]);
    assert!(result.errors.iter().any(|e| e.kind == ErrorKind::Cycle));
}

#[tokio::test]
async fn test_resolution_is_idempotent() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve_xml(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/x", base), format!("{}/y", base)]),
        Duration::ZERO,
    )
    .await;

    let root = SourceLocation::new(format!("{}/sitemap.xml", base));
    let resolver = resolver();
    let first = resolver.resolve(&root).await;
    let second = resolver.resolve(&root).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_local_root_is_kept() {
    let results = MultiSourceResolver::new(resolver(), 4)
        .resolve_all(&[SourceLocation::new("/nonexistent/sitemap.xml")], &NoProgress)
        .await;
    assert_eq!(results.len(), 1);
    assert!(!results[0].has_urls());
    assert_eq!(results[0].errors.len(), 1);
}

#[tokio::test]
async fn test_remote_index_never_points_at_local_files() {
    let server = MockServer::start().await;
    let base = server.uri();

    let dir = tempfile::tempdir().expect("tempdir");
    let local = dir.path().join("local.xml");
    std::fs::write(&local, urlset(&["http://local/secret".to_string()])).expect("write");

    serve_xml(
        &server,
        "/index.xml",
        sitemap_index(&[
            "C:/x.xml".to_string(),
            format!("file://{}", local.display()),
            format!("{}/leaf.xml", base),
        ]),
        Duration::ZERO,
    )
    .await;
    serve_xml(&server, "/leaf.xml", urlset(&[format!("{}/page", base)]), Duration::ZERO).await;

    let result = resolver()
        .resolve(&SourceLocation::new(format!("{}/index.xml", base)))
        .await;

    assert_eq!(result.urls, vec![format!("{}/page", base)]);
    assert_eq!(result.errors.len(), 2);
    assert!(result
        .errors
        .iter()
        .all(|e| e.kind == ErrorKind::InvalidLocation));
}
