//! Integration tests for the site graph builder
//!
//! These tests use wiremock to serve a small site over real HTTP and run the
//! full build and export cycle through `HttpFetcher`.

use sitemapper::config::{load_config, CrawlerConfig, UserAgentConfig};
use sitemapper::crawler::{build, build_http_client, HttpFetcher};
use sitemapper::graph::PageStatus;
use sitemapper::output::{parse_sitemap, write_sitemap};
use sitemapper::FetchError;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/bot".to_string()),
    }
}

fn fetcher(config: &CrawlerConfig) -> Arc<HttpFetcher> {
    let client =
        build_http_client(&user_agent(), config.fetch_timeout()).expect("Failed to build client");
    Arc::new(HttpFetcher::from_client(client))
}

/// Mounts a four-page site: home, two articles and a dead link
async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/missing">Missing</a>
            <a href="https://other.invalid/">Elsewhere</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        server,
        "/page1",
        r#"<a href="/">Home</a><a href="page2">Sibling</a>"#,
    )
    .await;
    mount_page(server, "/page2", "<p>No links here</p>").await;
}

#[tokio::test]
async fn test_full_crawl_and_export() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let config = CrawlerConfig::new(&base_url);
    let report = build(&config, fetcher(&config)).await.expect("Build failed");

    let keys: Vec<String> = report.graph.urls().map(str::to_string).collect();
    assert_eq!(
        keys,
        vec![
            base_url.clone(),
            format!("{}/missing", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );

    let root: Vec<&str> = report.graph.root_page().unwrap().outbound_urls().collect();
    assert_eq!(
        root,
        vec![
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            format!("{}/missing", base_url),
        ]
    );

    assert_eq!(report.unreachable.len(), 1);
    assert_eq!(report.unreachable[0].url, format!("{}/missing", base_url));
    assert_eq!(report.unreachable[0].error, FetchError::Status(404));
    assert!(report.is_complete());

    // Export and read back
    let temp_dir = TempDir::new().unwrap();
    let sitemap_path = temp_dir.path().join("sitemap.xml");
    write_sitemap(&report.graph, &sitemap_path).expect("Export failed");

    let locs = parse_sitemap(&std::fs::read(&sitemap_path).unwrap()).unwrap();
    assert_eq!(locs, keys);
}

#[tokio::test]
async fn test_root_unreachable() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = CrawlerConfig::new(mock_server.uri());
    let report = build(&config, fetcher(&config)).await.expect("Build failed");

    assert_eq!(report.graph.len(), 1);
    let root = report.graph.root_page().unwrap();
    assert_eq!(root.status(), PageStatus::Unreachable);
    assert!(root.outbound_links().is_empty());
    assert_eq!(report.unreachable[0].error, FetchError::Status(503));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/slow">Slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late</p>").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let config = CrawlerConfig::new(mock_server.uri()).with_fetch_timeout(Duration::from_millis(200));
    let report = build(&config, fetcher(&config)).await.expect("Build failed");

    assert_eq!(report.unreachable.len(), 1);
    assert!(matches!(report.unreachable[0].error, FetchError::Timeout(_)));
    assert_eq!(
        report.graph.root_page().unwrap().status(),
        PageStatus::Fetched
    );
}

#[tokio::test]
async fn test_depth_bound_over_http() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/level1">1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">2</a>"#).await;
    mount_page(&mock_server, "/level2", r#"<a href="/level3">3</a>"#).await;

    let config = CrawlerConfig::new(mock_server.uri()).with_max_depth(1);
    let report = build(&config, fetcher(&config)).await.expect("Build failed");

    assert_eq!(report.graph.len(), 2);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_concurrent_build_matches_sequential() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let sequential_config = CrawlerConfig::new(mock_server.uri());
    let sequential = build(&sequential_config, fetcher(&sequential_config))
        .await
        .expect("Build failed");

    let concurrent_config = CrawlerConfig::new(mock_server.uri()).with_max_concurrent_fetches(4);
    let concurrent = build(&concurrent_config, fetcher(&concurrent_config))
        .await
        .expect("Build failed");

    assert_eq!(sequential.graph, concurrent.graph);
}

#[tokio::test]
async fn test_user_agent_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/bot)",
        ))
        .respond_with(html("<p>hello bot</p>"))
        .mount(&mock_server)
        .await;

    let config = CrawlerConfig::new(mock_server.uri());
    let report = build(&config, fetcher(&config)).await.expect("Build failed");

    assert!(report.unreachable.is_empty());
}

#[tokio::test]
async fn test_redirect_resolves_against_final_url() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/old">Old</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/new"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/new", r#"<a href="child">Child</a>"#).await;

    let config = CrawlerConfig::new(mock_server.uri()).with_max_depth(1);
    let report = build(&config, fetcher(&config)).await.expect("Build failed");

    let old_url = format!("{}/old", mock_server.uri());
    let old = report.graph.get(&old_url).expect("Redirected page missing");
    let links: Vec<&str> = old.outbound_urls().collect();
    assert_eq!(links, vec![format!("{}/docs/child", mock_server.uri())]);
}

#[tokio::test]
async fn test_non_html_response_has_no_links() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/data.json">Data</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"link": "<a href='/hidden'>x</a>"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let config = CrawlerConfig::new(mock_server.uri());
    let report = build(&config, fetcher(&config)).await.expect("Build failed");

    let data = report
        .graph
        .get(&format!("{}/data.json", mock_server.uri()))
        .unwrap();
    assert_eq!(data.status(), PageStatus::Fetched);
    assert!(data.outbound_links().is_empty());
    assert_eq!(report.graph.len(), 2);
}

#[tokio::test]
async fn test_build_from_config_file() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("sitemapper.toml");
    let sitemap_path = temp_dir.path().join("out.xml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[crawler]
root-host = "{}"
max-depth = 2
page-limit = 50
fetch-timeout-ms = 2000
max-concurrent-fetches = 2

[output]
sitemap-path = "{}"
"#,
            mock_server.uri(),
            sitemap_path.display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).expect("Config should load");
    let fetcher = Arc::new(
        HttpFetcher::new(&config.user_agent, config.crawler.fetch_timeout()).unwrap(),
    );
    let report = build(&config.crawler, fetcher).await.expect("Build failed");
    write_sitemap(&report.graph, std::path::Path::new(&config.output.sitemap_path)).unwrap();

    let locs = parse_sitemap(&std::fs::read(&sitemap_path).unwrap()).unwrap();
    assert_eq!(locs.len(), 4);
}
