use super::*;
use crate::storage::SqliteStorage;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use std::sync::Mutex;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


const LISTING: &str = r#"
<html><body>
  <div class="card">
    <h2><a href="/intro-to-x/">Intro to X</a></h2>
    <p><a href="/category/python/">Python</a><a href="/category/web/">Web</a></p>
  </div>
  <div class="card">
    <h2><a href="/async-basics/">Async Basics</a></h2>
    <p><a href="/category/python/">Python</a><a href="/category/concurrency/">Concurrency</a></p>
  </div>
</body></html>
"#;

fn test_config(site_uri: &str) -> Config {
    toml::from_str(&format!(
        r#"
[site]
base-url = "{site_uri}"
listing-url = "{site_uri}/blog/"
listing-query = "div.card"
category-query = "a"
article-text-query = "div.entry-content"

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[database]
path = ":memory:"
"#
    ))
    .unwrap()
}

/// Router over an in-memory store, crawling the given site
fn create_test_app(site_uri: &str) -> (Router, Arc<Orchestrator>) {
    let config = Arc::new(test_config(site_uri));
    let storage = Arc::new(Mutex::new(SqliteStorage::open_in_memory().unwrap()));
    let orchestrator = Arc::new(Orchestrator::from_config(&config, storage).unwrap());
    (create_router(orchestrator.clone(), config), orchestrator)
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .mount(server)
        .await;
}

async fn send(app: &Router, method: &str, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app("http://127.0.0.1:9");

    let response = send(&app, "GET", "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_index_on_empty_store() {
    let (app, _) = create_test_app("http://127.0.0.1:9");

    let response = send(&app, "GET", "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["categories"], 0);
    assert_eq!(json["articles"], 0);
    assert_eq!(json["links"], 0);
}

#[tokio::test]
async fn test_api_server_spawns() {
    let mut config = test_config("http://127.0.0.1:9");
    // Port 0 = OS assigns a free port
    config.server.port = 0;
    let config = Arc::new(config);

    let storage = Arc::new(Mutex::new(SqliteStorage::open_in_memory().unwrap()));
    let orchestrator = Arc::new(Orchestrator::from_config(&config, storage).unwrap());

    let handle = tokio::spawn(start_api_server(orchestrator, config));
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert!(!handle.is_finished());
    handle.abort();
}

#[tokio::test]
async fn test_debug_router_serves_requests() {
    let mut config = test_config("http://127.0.0.1:9");
    config.server.debug = true;
    let config = Arc::new(config);

    let storage = Arc::new(Mutex::new(SqliteStorage::open_in_memory().unwrap()));
    let orchestrator = Arc::new(Orchestrator::from_config(&config, storage).unwrap());
    let app = create_router(orchestrator, config);

    let response = send(&app, "GET", "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}
