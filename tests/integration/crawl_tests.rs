//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full discover-extract-convert-write cycle end-to-end.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use sumi_scribe::config::{parse_config, CrawlConfig, DelayRange};
use sumi_scribe::crawler::{crawl, no_match_message, Coordinator, Fetcher, NoProgress};
use sumi_scribe::output::{clear_workspace, list_markdown_files, to_markdown};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a coordinator for `<server>/docs/` with no politeness delay
fn create_coordinator(server: &MockServer, include_base_url: bool) -> Coordinator {
    create_coordinator_with(server, "article", ".drop", include_base_url, None)
}

fn create_coordinator_with(
    server: &MockServer,
    target: &str,
    exclude: &str,
    include_base_url: bool,
    max_concurrent_pages: Option<usize>,
) -> Coordinator {
    let config = CrawlConfig::new(
        &format!("{}/docs/", server.uri()),
        target,
        exclude,
        include_base_url,
    )
    .expect("Failed to build config")
    .with_delay(DelayRange::none())
    .with_max_concurrent_pages(max_concurrent_pages);

    Coordinator::new(config, Fetcher::with_defaults().expect("Failed to build fetcher"))
}

async fn mount_html(server: &MockServer, p: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn article(text: &str) -> String {
    format!(
        r#"<html><body><nav>menu</nav><article><p>{}</p><span class="drop">gone</span></article></body></html>"#,
        text
    )
}

fn file_names(dir: &Path) -> BTreeSet<String> {
    list_markdown_files(dir)
        .expect("Failed to list output")
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_writes_one_file_per_page() {
    let server = MockServer::start().await;

    // The seed page is fetched twice: once for discovery, once as a page
    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r##"<html><body><article><p>Home</p></article>
            <a href="#top">Top</a>
            <a href="https://other.com/x">Other</a>
            <a href="guide/intro">Intro</a>
            <a href="{}/docs/api">API</a>
            <a href="/docs/api#params">API params</a>
            <a href="/blog/">Blog</a>
            </body></html>"##,
            server.uri()
        )))
        .expect(2)
        .mount(&server)
        .await;
    mount_html(&server, "/docs/guide/intro", article("Intro text")).await;
    mount_html(&server, "/docs/api", article("API text")).await;

    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("files");

    let updates = Mutex::new(Vec::new());
    let sink = |fraction: f64, label: &str| {
        updates.lock().unwrap().push((fraction, label.to_string()));
    };

    let summary = create_coordinator(&server, true)
        .run(&output, &sink)
        .await
        .expect("Crawl failed");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.successful, 3);
    assert_eq!(summary.collisions, 0);

    assert_eq!(
        file_names(&output),
        BTreeSet::from(["api.md", "guide_intro.md", "index.md"].map(String::from))
    );

    let intro = fs::read_to_string(output.join("guide_intro.md")).unwrap();
    assert!(intro.contains("Intro text"));
    assert!(!intro.contains("gone"));
    assert!(!intro.contains("menu"));

    let updates = updates.into_inner().unwrap();
    assert_eq!(updates.len(), 3);
    assert!(updates.iter().all(|(_, label)| label.starts_with("SUCCESS: ")));
    let mut fractions: Vec<f64> = updates.iter().map(|(f, _)| *f).collect();
    fractions.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(fractions, [1.0 / 3.0, 2.0 / 3.0, 1.0]);
}

#[tokio::test]
async fn test_no_links_returns_zero_zero() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/docs/",
        r#"<html><body><a href="https://other.com/">Elsewhere</a></body></html>"#.to_string(),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("files");

    let summary = create_coordinator(&server, false)
        .run(&output, &NoProgress)
        .await
        .expect("Crawl failed");

    assert_eq!((summary.successful, summary.total), (0, 0));
    assert!(summary.is_empty());
    assert!(output.is_dir());
    assert!(file_names(&output).is_empty());
}

#[tokio::test]
async fn test_unreachable_seed_returns_zero_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let base_url = format!("{}/docs/", server.uri());

    // Uses the default delay, which never applies since no page task starts
    let summary = crawl(&base_url, tmp.path(), "article", "", &NoProgress, false)
        .await
        .expect("Crawl failed");

    assert_eq!((summary.successful, summary.total), (0, 0));
    assert!(file_names(tmp.path()).is_empty());
}

#[tokio::test]
async fn test_failed_pages_do_not_abort_siblings() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/docs/",
        r#"<a href="ok">Ok</a><a href="broken">Broken</a><a href="also-ok">Also</a>"#.to_string(),
    )
    .await;
    mount_html(&server, "/docs/ok", article("fine")).await;
    mount_html(&server, "/docs/also-ok", article("also fine")).await;
    Mock::given(method("GET"))
        .and(path("/docs/broken"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let labels = Mutex::new(Vec::new());
    let sink = |_fraction: f64, label: &str| labels.lock().unwrap().push(label.to_string());

    let summary = create_coordinator(&server, false)
        .run(tmp.path(), &sink)
        .await
        .expect("Crawl failed");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.successful, 2);
    assert!(!summary.all_failed());
    assert!(!tmp.path().join("broken.md").exists());

    let labels = labels.into_inner().unwrap();
    assert_eq!(labels.len(), 3);
    assert_eq!(
        labels.iter().filter(|l| l.starts_with("ERROR: ")).count(),
        1
    );
    assert!(labels.iter().any(|l| l.ends_with("/docs/broken")));
}

#[tokio::test]
async fn test_all_pages_failing() {
    let server = MockServer::start().await;
    mount_html(&server, "/docs/", r#"<a href="a">A</a><a href="b">B</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/docs/a"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/b"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let summary = create_coordinator(&server, false)
        .run(tmp.path(), &NoProgress)
        .await
        .expect("Crawl failed");

    assert_eq!((summary.successful, summary.total), (0, 2));
    assert!(summary.all_failed());
}

#[tokio::test]
async fn test_no_match_writes_diagnostic_and_succeeds() {
    let server = MockServer::start().await;
    mount_html(&server, "/docs/", r#"<a href="plain">Plain</a>"#.to_string()).await;
    mount_html(
        &server,
        "/docs/plain",
        "<html><body><div>no article here</div></body></html>".to_string(),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let coordinator = create_coordinator(&server, false);
    let summary = coordinator
        .run(tmp.path(), &NoProgress)
        .await
        .expect("Crawl failed");

    assert_eq!((summary.successful, summary.total), (1, 1));

    let url = coordinator.config().base_url.join("plain").unwrap();
    let written = fs::read_to_string(tmp.path().join("plain.md")).unwrap();
    assert_eq!(written, no_match_message(&coordinator.config().target, &url));
}

#[tokio::test]
async fn test_single_match_round_trip() {
    let server = MockServer::start().await;
    mount_html(&server, "/docs/", r#"<a href="page">Page</a>"#.to_string()).await;
    mount_html(
        &server,
        "/docs/page",
        r#"<html><body><div id="a"><h2>Heading</h2><p>Some <em>text</em></p><ul><li>one</li></ul></div></body></html>"#
            .to_string(),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let summary = create_coordinator_with(&server, "#a", "", false, None)
        .run(tmp.path(), &NoProgress)
        .await
        .expect("Crawl failed");
    assert_eq!(summary.successful, 1);

    let written = fs::read_to_string(tmp.path().join("page.md")).unwrap();
    assert_eq!(
        written,
        to_markdown(r#"<div id="a"><h2>Heading</h2><p>Some <em>text</em></p><ul><li>one</li></ul></div>"#)
    );
}

#[tokio::test]
async fn test_exclusion_end_to_end() {
    let server = MockServer::start().await;
    mount_html(&server, "/docs/", r#"<a href="page">Page</a>"#.to_string()).await;
    mount_html(
        &server,
        "/docs/page",
        r#"<div id="a"><p>keep</p><span class="drop">gone</span></div>"#.to_string(),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    create_coordinator_with(&server, "#a", ".drop", false, None)
        .run(tmp.path(), &NoProgress)
        .await
        .expect("Crawl failed");

    let written = fs::read_to_string(tmp.path().join("page.md")).unwrap();
    assert!(written.contains("keep"));
    assert!(!written.contains("gone"));
}

#[tokio::test]
async fn test_multiple_matches_joined_with_separator() {
    let server = MockServer::start().await;
    mount_html(&server, "/docs/", r#"<a href="multi">Multi</a>"#.to_string()).await;
    mount_html(
        &server,
        "/docs/multi",
        "<section><p>first</p></section><section><p>second</p></section>".to_string(),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    create_coordinator_with(&server, "section", "", false, None)
        .run(tmp.path(), &NoProgress)
        .await
        .expect("Crawl failed");

    let written = fs::read_to_string(tmp.path().join("multi.md")).unwrap();
    let sep = written.find("\n\n---\n\n").expect("separator missing");
    assert!(written.find("first").unwrap() < sep);
    assert!(written.find("second").unwrap() > sep);
}

#[tokio::test]
async fn test_bounded_concurrency_processes_every_page_once() {
    let server = MockServer::start().await;
    let links: String = (1..=6)
        .map(|i| format!(r#"<a href="p{}">Page {}</a>"#, i, i))
        .collect();
    mount_html(&server, "/docs/", links).await;
    for i in 1..=6 {
        mount_html(&server, &format!("/docs/p{}", i), article(&format!("page {}", i))).await;
    }

    let tmp = TempDir::new().unwrap();
    let summary = create_coordinator_with(&server, "article", "", false, Some(2))
        .run(tmp.path(), &NoProgress)
        .await
        .expect("Crawl failed");

    assert_eq!((summary.successful, summary.total), (6, 6));
    assert_eq!(file_names(tmp.path()).len(), 6);
}

#[tokio::test]
async fn test_filename_collisions_reported() {
    let server = MockServer::start().await;
    mount_html(&server, "/docs/", r#"<a href="a/b">AB</a><a href="a_b">A_B</a>"#.to_string())
        .await;
    mount_html(&server, "/docs/a/b", article("slash")).await;
    mount_html(&server, "/docs/a_b", article("underscore")).await;

    let tmp = TempDir::new().unwrap();
    let summary = create_coordinator(&server, false)
        .run(tmp.path(), &NoProgress)
        .await
        .expect("Crawl failed");

    assert_eq!((summary.successful, summary.total), (2, 2));
    assert_eq!(summary.collisions, 1);
    assert_eq!(
        file_names(tmp.path()),
        BTreeSet::from(["a_b.md".to_string()])
    );
}

#[tokio::test]
async fn test_coordinator_from_config_file() {
    let server = MockServer::start().await;
    mount_html(&server, "/docs/", r#"<a href="page">Page</a>"#.to_string()).await;
    mount_html(&server, "/docs/page", article("from config")).await;

    let config = parse_config(&format!(
        r#"
[site]
base-url = "{}/docs/"
include-base-url = false

[extract]
target = "article"
exclude = ".drop"

[crawler]
min-delay = 0
max-delay = 5
max-concurrent-pages = 4
"#,
        server.uri()
    ))
    .expect("Failed to parse config");

    let tmp = TempDir::new().unwrap();
    let summary = Coordinator::from_config(&config)
        .expect("Failed to build coordinator")
        .run(tmp.path(), &NoProgress)
        .await
        .expect("Crawl failed");

    assert_eq!((summary.successful, summary.total), (1, 1));
    let written = fs::read_to_string(tmp.path().join("page.md")).unwrap();
    assert!(written.contains("from config"));
}

#[tokio::test]
async fn test_clear_after_crawl_is_idempotent() {
    let server = MockServer::start().await;
    mount_html(&server, "/docs/", r#"<a href="page">Page</a>"#.to_string()).await;
    mount_html(&server, "/docs/page", article("text")).await;

    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("files");
    create_coordinator(&server, false)
        .run(&output, &NoProgress)
        .await
        .expect("Crawl failed");
    assert!(output.join("page.md").exists());

    clear_workspace(&output).expect("First clear failed");
    assert!(!output.exists());
    clear_workspace(&output).expect("Second clear failed");
}
