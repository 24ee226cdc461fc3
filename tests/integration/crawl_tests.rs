//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a blog listing and article pages and
//! run the full fetch → extract → persist cycle against a SQLite file.

use blog_harvester::config::{
    Config, CrawlerConfig, DatabaseConfig, ServerConfig, SiteConfig, UserAgentConfig,
};
use blog_harvester::crawler::crawl;
use blog_harvester::storage::{SqliteStorage, Storage};
use blog_harvester::{HarvestError, Orchestrator};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TWO_CARD_LISTING: &str = r#"<html><head><title>Blog</title></head><body>
<main class="archive">
  <article class="card">
    <div class="summary"><h2><a href="/intro-to-x/">Intro to X</a></h2></div>
    <div class="tags">
      <a href="/category/python/">Python</a>
      <a href="/category/web/">Web</a>
    </div>
  </article>
  <article class="card">
    <div class="summary"><h2><a href="/async-basics/">Async Basics</a></h2></div>
    <div class="tags">
      <a href="/category/python/">Python</a>
      <a href="/category/concurrency/">Concurrency</a>
    </div>
  </article>
</main>
</body></html>"#;

/// Creates a test configuration for a blog served at `base_url`
fn create_test_config(base_url: &str, db_path: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            listing_url: format!("{}/blog/", base_url),
            listing_query: "main.archive > article.card".to_string(),
            category_query: "a".to_string(),
            article_text_query: "div.entry-content".to_string(),
        },
        crawler: CrawlerConfig {
            fetch_article_text: false,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        database: DatabaseConfig {
            path: db_path.to_string_lossy().into_owned(),
        },
        server: ServerConfig::default(),
    }
}

async fn mount_listing(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn open(config: &Config) -> SqliteStorage {
    SqliteStorage::new(Path::new(&config.database.path)).expect("Failed to open database")
}

fn titles<T>(records: &[T], title: impl Fn(&T) -> &str) -> Vec<String> {
    records.iter().map(|r| title(r).to_string()).collect()
}

#[tokio::test]
async fn test_full_crawl_two_cards() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, TWO_CARD_LISTING).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &temp_dir.path().join("blog.db"));

    let report = crawl(&config).await.expect("Crawl failed");
    assert_eq!(report.cards, 2);
    assert_eq!(report.articles_created, 2);
    assert_eq!(report.categories_created, 3);
    assert_eq!(report.links_created, 4);

    let storage = open(&config);
    assert_eq!(storage.count_articles().unwrap(), 2);
    assert_eq!(storage.count_categories().unwrap(), 3);
    assert_eq!(storage.count_links().unwrap(), 4);

    let python = storage.list_articles_by_category("Python").unwrap();
    assert_eq!(
        titles(&python, |a| &a.title),
        vec!["Async Basics", "Intro to X"]
    );

    let web = storage.list_articles_by_category("Web").unwrap();
    assert_eq!(titles(&web, |a| &a.title), vec!["Intro to X"]);

    // Links are visible from both sides
    let intro = storage.find_article_by_title("Intro to X").unwrap().unwrap();
    let web_category = storage.find_category_by_title("Web").unwrap().unwrap();
    assert!(intro.categories.contains(&web_category.id));
    assert_eq!(intro.categories.len(), 2);
    assert_eq!(intro.source_url, format!("{}/intro-to-x/", mock_server.uri()));
    assert_eq!(
        web_category.source_url,
        format!("{}/category/web/", mock_server.uri())
    );
}

#[tokio::test]
async fn test_recrawl_is_idempotent() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, TWO_CARD_LISTING).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &temp_dir.path().join("blog.db"));

    crawl(&config).await.expect("First crawl failed");
    let first = open(&config).find_article_by_title("Intro to X").unwrap().unwrap();

    let report = crawl(&config).await.expect("Second crawl failed");
    assert_eq!(report.cards, 2);
    assert_eq!(report.articles_created, 0);
    assert_eq!(report.categories_created, 0);
    assert_eq!(report.links_created, 0);

    let storage = open(&config);
    assert_eq!(storage.count_articles().unwrap(), 2);
    assert_eq!(storage.count_categories().unwrap(), 3);
    assert_eq!(storage.count_links().unwrap(), 4);

    // Same record, same id
    let second = storage.find_article_by_title("Intro to X").unwrap().unwrap();
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn test_unreachable_listing_creates_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // Nothing listens on the discard port
    let config = create_test_config("http://127.0.0.1:9", &temp_dir.path().join("blog.db"));

    let err = crawl(&config).await.unwrap_err();
    assert!(matches!(err, HarvestError::Unreachable { .. }), "{:?}", err);
    assert!(err.is_fatal());

    let storage = open(&config);
    assert_eq!(storage.count_articles().unwrap(), 0);
    assert_eq!(storage.count_categories().unwrap(), 0);
    assert_eq!(storage.count_links().unwrap(), 0);
}

#[tokio::test]
async fn test_listing_http_error_is_malformed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &temp_dir.path().join("blog.db"));

    let err = crawl(&config).await.unwrap_err();
    assert!(matches!(err, HarvestError::MalformedDocument(_)), "{:?}", err);
    assert_eq!(open(&config).count_articles().unwrap(), 0);
}

#[tokio::test]
async fn test_card_with_one_child_aborts() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        r#"<main class="archive">
          <article class="card">
            <div class="summary"><a href="/first/">First</a></div>
            <div class="tags"><a href="/category/a/">A</a></div>
          </article>
          <article class="card">
            <div class="summary"><a href="/lonely/">Lonely</a></div>
          </article>
          <article class="card">
            <div class="summary"><a href="/last/">Last</a></div>
            <div class="tags"><a href="/category/b/">B</a></div>
          </article>
        </main>"#,
    )
    .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &temp_dir.path().join("blog.db"));

    let err = crawl(&config).await.unwrap_err();
    assert!(matches!(err, HarvestError::MalformedDocument(_)), "{:?}", err);

    let storage = open(&config);
    assert!(storage.find_article_by_title("First").unwrap().is_some());
    assert!(storage.find_article_by_title("Lonely").unwrap().is_none());
    assert!(storage.find_article_by_title("Last").unwrap().is_none());
    assert!(storage.find_category_by_title("B").unwrap().is_none());
}

#[tokio::test]
async fn test_card_with_three_children_aborts() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        r#"<main class="archive">
          <article class="card">
            <div class="summary"><a href="/crowded/">Crowded</a></div>
            <div class="tags"><a href="/category/a/">A</a></div>
            <footer>Share this</footer>
          </article>
        </main>"#,
    )
    .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &temp_dir.path().join("blog.db"));

    let err = crawl(&config).await.unwrap_err();
    assert!(matches!(err, HarvestError::MalformedDocument(_)), "{:?}", err);
    assert_eq!(open(&config).count_articles().unwrap(), 0);
}

#[tokio::test]
async fn test_crawl_fetches_article_text() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, TWO_CARD_LISTING).await;

    Mock::given(method("GET"))
        .and(path("/intro-to-x/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <div class="entry-content"><p>X is a thing.</p></div>
            <div class="entry-content"><p> More on X.</p></div>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    // No mock for /async-basics/: wiremock answers 404

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&mock_server.uri(), &temp_dir.path().join("blog.db"));
    config.crawler.fetch_article_text = true;

    let report = crawl(&config).await.expect("Crawl failed");
    assert_eq!(report.articles_created, 2);
    assert_eq!(report.texts_fetched, 2);

    let storage = open(&config);
    let intro = storage.find_article_by_title("Intro to X").unwrap().unwrap();
    assert_eq!(intro.text, "X is a thing. More on X.");

    let missing = storage.find_article_by_title("Async Basics").unwrap().unwrap();
    assert_eq!(missing.text, "");
}

#[tokio::test]
async fn test_refresh_article_text_and_not_found() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, TWO_CARD_LISTING).await;
    Mock::given(method("GET"))
        .and(path("/async-basics/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="entry-content">Futures all the way down.</div>"#,
        ))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &temp_dir.path().join("blog.db"));

    let storage = Arc::new(Mutex::new(open(&config)));
    let orchestrator =
        Orchestrator::from_config(&config, storage.clone()).expect("Failed to create orchestrator");
    orchestrator.crawl().await.expect("Crawl failed");

    let id = storage
        .lock()
        .unwrap()
        .find_article_by_title("Async Basics")
        .unwrap()
        .unwrap()
        .id;

    let refreshed = orchestrator
        .refresh_article_text(id.as_str())
        .await
        .expect("Refresh failed");
    assert_eq!(refreshed.id, id);
    assert_eq!(refreshed.text, "Futures all the way down.");

    for bad in ["", "123", "zzzzzzzzzzzzzzzzzzzzzzzz", "000000000000000000000000"] {
        let err = orchestrator.refresh_article_text(bad).await.unwrap_err();
        assert!(matches!(err, HarvestError::NotFound(_)), "{}: {:?}", bad, err);
        assert!(!err.is_fatal());
    }
}

#[tokio::test]
async fn test_recrawl_fills_text_left_empty_by_aborted_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/first/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="entry-content">Body</div>"#,
        ))
        .mount(&mock_server)
        .await;

    // First listing breaks on its second card
    let broken = Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<main class="archive">
              <article class="card">
                <div class="summary"><a href="/first/">First</a></div>
                <div class="tags"><a href="/category/a/">A</a></div>
              </article>
              <article class="card">
                <div class="summary"><a href="/lonely/">Lonely</a></div>
              </article>
            </main>"#,
        ))
        .mount_as_scoped(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&mock_server.uri(), &temp_dir.path().join("blog.db"));
    config.crawler.fetch_article_text = true;

    let err = crawl(&config).await.unwrap_err();
    assert!(matches!(err, HarvestError::MalformedDocument(_)), "{:?}", err);
    let first = open(&config).find_article_by_title("First").unwrap().unwrap();
    assert_eq!(first.text, "");

    drop(broken);
    mount_listing(
        &mock_server,
        r#"<main class="archive">
          <article class="card">
            <div class="summary"><a href="/first/">First</a></div>
            <div class="tags"><a href="/category/a/">A</a></div>
          </article>
        </main>"#,
    )
    .await;

    let report = crawl(&config).await.expect("Re-run failed");
    assert_eq!(report.articles_created, 0);
    assert_eq!(report.texts_fetched, 1);

    let first = open(&config).find_article_by_title("First").unwrap().unwrap();
    assert_eq!(first.text, "Body");
}
