//! Integration tests for a whole harvest run
//!
//! These tests drive the harvester from sources to export files, with
//! wiremock serving remote sitemaps and pages and tempfile holding local
//! sitemaps and output directories.

use sitemap_harvest::config::{load_history, save_history, Config};
use sitemap_harvest::crawler::{Harvester, PageTitle, RunProgress};
use sitemap_harvest::output::{export_report, MarkdownSummary, OutputHandler, TextExporter};
use sitemap_harvest::progress::NoProgress;
use sitemap_harvest::SourceLocation;
use std::fs;
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quiet() -> RunProgress<'static> {
    RunProgress {
        sources: &NoProgress,
        titles: &NoProgress,
    }
}

async fn serve(server: &MockServer, route: &str, body: String, content_type: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", content_type),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_harvest_with_titles_and_export() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/sitemap.xml",
        format!(
            "<sitemapindex><sitemap><loc>{0}/pages.xml</loc></sitemap></sitemapindex>",
            base
        ),
        "application/xml",
    )
    .await;
    serve(
        &server,
        "/pages.xml",
        format!(
            "<urlset><url><loc>{0}/home</loc></url><url><loc>{0}/about</loc></url></urlset>",
            base
        ),
        "application/xml",
    )
    .await;
    serve(
        &server,
        "/home",
        "<html><head><title>Home</title></head></html>".to_string(),
        "text/html",
    )
    .await;
    serve(
        &server,
        "/about",
        "<html><body>About us</body></html>".to_string(),
        "text/html",
    )
    .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let local = dir.path().join("local.xml");
    fs::write(
        &local,
        "<urlset><url><loc>http://127.0.0.1:9/offline</loc></url></urlset>",
    )
    .expect("write local sitemap");

    let remote_root = SourceLocation::new(format!("{}/sitemap.xml", base));
    let sources = vec![
        remote_root.clone(),
        SourceLocation::new(local.to_string_lossy().into_owned()),
    ];

    let mut config = Config::default();
    config.enricher.enabled = true;
    config.enricher.timeout_secs = 2;
    let harvester = Harvester::new(config).expect("harvester");

    let title_events = Mutex::new(Vec::new());
    let title_observer = |current: usize, total: usize, _label: &str| {
        title_events.lock().unwrap().push((current, total));
    };

    let report = harvester
        .run(
            &sources,
            RunProgress {
                sources: &NoProgress,
                titles: &title_observer,
            },
        )
        .await
        .expect("run");

    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.total_urls, 3);
    assert!(!report.is_total_failure());

    let remote = report.get(&remote_root).expect("remote source");
    assert_eq!(
        remote.result.urls,
        vec![format!("{}/home", base), format!("{}/about", base)]
    );
    let titles = remote.titles.as_ref().expect("titles");
    assert_eq!(titles.len(), 2);
    assert!(titles
        .iter()
        .any(|o| o.url.ends_with("/home") && o.title == PageTitle::Title("Home".to_string())));
    assert!(titles
        .iter()
        .any(|o| o.url.ends_with("/about") && o.title == PageTitle::NoTitle));

    // Title progress restarts for every source
    let events = title_events.into_inner().unwrap();
    assert_eq!(events.iter().filter(|(_, total)| *total == 2).count(), 2);
    assert_eq!(events.iter().filter(|(_, total)| *total == 1).count(), 1);

    let out = dir.path().join("out");
    let text = TextExporter::new(&out);
    let summary = MarkdownSummary::new(out.join("summary.md"));
    let handlers: [&dyn OutputHandler; 2] = [&text, &summary];
    let written = export_report(&report, &handlers).expect("export");

    // Two URL lists, two title tables, one summary
    assert_eq!(written.len(), 5);
    assert!(written.iter().all(|p| p.exists()));

    let urls = fs::read_to_string(text.urls_path(remote)).expect("urls file");
    assert_eq!(urls, format!("{0}/home\n{0}/about\n", base));

    let summary_text = fs::read_to_string(out.join("summary.md")).expect("summary");
    assert!(summary_text.contains("- **Total URLs**: 3"));
}

#[tokio::test]
async fn test_all_failing_sources_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    serve(&server, "/empty.xml", "<urlset></urlset>".to_string(), "application/xml").await;

    let sources = vec![
        SourceLocation::new(format!("{}/sitemap.xml", server.uri())),
        SourceLocation::new(format!("{}/empty.xml", server.uri())),
    ];

    let harvester = Harvester::new(Config::default()).expect("harvester");
    let report = harvester.run(&sources, quiet()).await.expect("run");

    assert!(report.is_total_failure());
    assert_eq!(report.failed_sources(), 2);
    assert_eq!(report.total_errors, 2);
    assert_eq!(report.total_successes, None);
}

#[test]
fn test_history_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let history = dir.path().join("state").join("sitemap_sources.toml");

    assert_eq!(load_history(&history).expect("load"), None);

    let sources = vec![
        "https://example.com/sitemap.xml".to_string(),
        "./local.xml".to_string(),
    ];
    save_history(&history, &sources).expect("save");

    assert_eq!(load_history(&history).expect("load"), Some(sources));
}
