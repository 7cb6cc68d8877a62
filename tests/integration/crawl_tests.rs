//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full harvest cycle end-to-end over real HTTP.

use std::time::{Duration, Instant};
use sumi_skim::config::Config;
use sumi_skim::crawler::Coordinator;
use sumi_skim::RunOutcome;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing pages into `output_dir`
fn create_test_config(output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.robots_timeout_ms = 2_000;
    config.crawler.request_timeout_ms = 5_000;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.user_agent.contact_url = "https://example.com/contact".to_string();
    config.user_agent.contact_email = "test@example.com".to_string();
    config.output.directory = output_dir.path().join("Downloads").display().to_string();
    config.output.log_path = None;
    config
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_harvest() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/private/page">Private</a>
               <a href="/public/page">Public</a>
               <a href="not a url">Broken</a>"#,
        ))
        .mount(&mock_server)
        .await;

    // Disallowed by robots.txt, must never be requested
    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html_page("Private", "secret"))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/public/page"))
        .respond_with(html_page("Public Page", "Public content"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&output_dir);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(&mock_server.uri())
        .await
        .expect("Harvest failed");

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.links_seen, 3);
    assert_eq!(report.saved, 1);
    assert_eq!(report.denied, 1);
    assert_eq!(report.invalid, 1);

    let written = output_dir.path().join("Downloads").join("Public Page.txt");
    assert_eq!(report.saved_files, vec![written.clone()]);
    let text = std::fs::read_to_string(&written).expect("Page file missing");
    assert!(text.contains("Public content"));
}

#[tokio::test]
async fn test_seed_disallowed_makes_no_page_requests() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/a">A</a>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let coordinator =
        Coordinator::new(create_test_config(&output_dir)).expect("Failed to create coordinator");
    let report = coordinator.run(&mock_server.uri()).await.expect("Harvest failed");

    assert_eq!(report.outcome, RunOutcome::SeedDenied);
    assert!(report.message.is_some());
    assert!(!output_dir.path().join("Downloads").exists());
}

#[tokio::test]
async fn test_missing_robots_is_permissive() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/admin">Admin</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(html_page("Admin", "admin text"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator =
        Coordinator::new(create_test_config(&output_dir)).expect("Failed to create coordinator");
    let report = coordinator.run(&mock_server.uri()).await.expect("Harvest failed");

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.saved, 1);
}

#[tokio::test]
async fn test_robots_server_error_is_permissive() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503).set_body_string("User-agent: *\nDisallow: /"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/page">Page</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html_page("Page", "text"))
        .mount(&mock_server)
        .await;

    let coordinator =
        Coordinator::new(create_test_config(&output_dir)).expect("Failed to create coordinator");
    let report = coordinator.run(&mock_server.uri()).await.expect("Harvest failed");

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.saved, 1);
}

#[tokio::test]
async fn test_robots_fetched_once_with_user_agent() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            r#"<a href="/one">1</a><a href="/two">2</a><a href="/three">3</a>"#,
        ))
        .mount(&mock_server)
        .await;

    for (page, title) in [("/one", "One"), ("/two", "Two"), ("/three", "Three")] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(title, title))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let coordinator =
        Coordinator::new(create_test_config(&output_dir)).expect("Failed to create coordinator");
    let report = coordinator.run(&mock_server.uri()).await.expect("Harvest failed");

    assert_eq!(report.saved, 3);
    assert_eq!(coordinator.gatekeeper().store().len(), 1);
}

#[tokio::test]
async fn test_seed_fetch_failure() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_robots(&mock_server, "").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let coordinator =
        Coordinator::new(create_test_config(&output_dir)).expect("Failed to create coordinator");
    let report = coordinator.run(&mock_server.uri()).await.expect("Harvest failed");

    assert_eq!(report.outcome, RunOutcome::SeedFetchFailed);
    let message = report.message.expect("Missing failure message");
    assert!(message.contains("500"), "unexpected message: {}", message);
}

#[tokio::test]
async fn test_crawl_delay_between_requests() {
    let mock_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_robots(&mock_server, "User-agent: *\nCrawl-delay: 0.5").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", r#"<a href="/a">A</a><a href="/b">B</a>"#))
        .mount(&mock_server)
        .await;

    for (page, title) in [("/a", "A"), ("/b", "B")] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(title, title))
            .mount(&mock_server)
            .await;
    }

    let coordinator =
        Coordinator::new(create_test_config(&output_dir)).expect("Failed to create coordinator");
    let start = Instant::now();
    let report = coordinator.run(&mock_server.uri()).await.expect("Harvest failed");

    assert_eq!(report.saved, 2);
    // seed, /a and /b are each spaced by the crawl-delay
    assert!(start.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test]
async fn test_policy_is_per_domain() {
    let seed_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    mount_robots(&seed_server, "User-agent: *\nDisallow: /private").await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /blocked"))
        .expect(1)
        .mount(&other_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            &format!(
                r#"<a href="{0}/private/x">other private</a>
                   <a href="{0}/blocked">other blocked</a>
                   <a href="/private">own private</a>"#,
                other_server.uri()
            ),
        ))
        .mount(&seed_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private/x"))
        .respond_with(html_page("Other Private", "allowed on this domain"))
        .expect(1)
        .mount(&other_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(html_page("Blocked", "never"))
        .expect(0)
        .mount(&other_server)
        .await;

    let coordinator =
        Coordinator::new(create_test_config(&output_dir)).expect("Failed to create coordinator");
    let report = coordinator.run(&seed_server.uri()).await.expect("Harvest failed");

    assert_eq!(report.saved, 1);
    assert_eq!(report.denied, 2);
    assert_eq!(coordinator.gatekeeper().store().len(), 2);
}

#[tokio::test]
async fn test_concurrent_domains() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    let output_dir = TempDir::new().expect("Failed to create temp dir");

    for server in [&first, &second] {
        mount_robots(server, "User-agent: *\nAllow: /").await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(html_page(&format!("Page {}", server.address().port()), "text"))
            .expect(1)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "Home",
            &format!(
                r#"<a href="{}/page">first</a><a href="{}/page">second</a>"#,
                first.uri(),
                second.uri()
            ),
        ))
        .mount(&first)
        .await;

    let mut config = create_test_config(&output_dir);
    config.crawler.max_concurrent_domains = 2;
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run(&first.uri()).await.expect("Harvest failed");

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.saved, 2);
}
