use std::sync::Arc;

use actix_web::{App, http::StatusCode, http::header, test, web};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};

use inkwell_core::domain::{NewPost, NewTag};
use inkwell_core::ports::{PostRepository, TagRepository};
use inkwell_infra::InMemoryStore;

use super::configure_routes;
use crate::config::SiteConfig;
use crate::state::AppState;

macro_rules! init_app {
    ($store:expr) => {
        init_app!(
            $store,
            SiteConfig {
                url: Some("https://blog.example.com".to_string()),
                ..SiteConfig::default()
            }
        )
    };
    ($store:expr, $site:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::with_store($store.clone(), $site)))
                .configure(configure_routes),
        )
        .await
    };
}

fn new_post(slug: &str, days: i64) -> NewPost {
    NewPost {
        slug: slug.to_string(),
        title: format!("Title of {slug}"),
        excerpt: "Excerpt".to_string(),
        content: "Body".to_string(),
        cover_image: None,
        published_at: Some(
            Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap() + Duration::days(days),
        ),
        reading_time: "3 min read".to_string(),
        author_id: None,
    }
}

/// `post-1` is the oldest, `post-{n}` the newest.
async fn store_with_posts(n: i64) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for i in 1..=n {
        store.create_post(new_post(&format!("post-{i}"), i)).await.unwrap();
    }
    store
}

fn slugs(posts: &Value) -> Vec<&str> {
    posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect()
}

#[actix_web::test]
async fn test_health_reports_storage_backend() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_web::test]
async fn test_list_posts_paginates_newest_first() {
    let store = store_with_posts(5).await;
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/posts?page=2&limit=2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(slugs(&body["posts"]), vec!["post-3", "post-2"]);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["totalPages"], 3);
}

#[actix_web::test]
async fn test_list_posts_defaults_and_page_past_end() {
    let store = store_with_posts(3).await;
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(slugs(&body["posts"]), vec!["post-3", "post-2", "post-1"]);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(body["pagination"]["totalPages"], 1);

    let req = test::TestRequest::get().uri("/api/posts?page=9").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["posts"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 3);
}

#[actix_web::test]
async fn test_list_posts_rejects_bad_query() {
    let store = store_with_posts(1).await;
    let app = init_app!(store);

    let bad = [
        "/api/posts?page=abc",
        "/api/posts?page=0",
        "/api/posts?limit=0",
        "/api/posts?limit=1000",
    ];
    for uri in bad {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[actix_web::test]
async fn test_list_posts_includes_tags() {
    let store = store_with_posts(1).await;
    let tag = store
        .create_tag(NewTag {
            name: "Rust".to_string(),
            slug: "rust".to_string(),
        })
        .await
        .unwrap();
    store.add_tag_to_post(1, tag.id).await.unwrap();
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let tags = &body["posts"][0]["tags"];
    assert_eq!(tags[0]["slug"], "rust");
    assert_eq!(body["posts"][0]["publishedAt"], "2024-10-02T12:00:00Z");
}

#[actix_web::test]
async fn test_featured_post() {
    let empty = Arc::new(InMemoryStore::new());
    let app = init_app!(empty);
    let req = test::TestRequest::get().uri("/api/posts/featured").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let store = store_with_posts(3).await;
    let app = init_app!(store);
    let req = test::TestRequest::get().uri("/api/posts/featured").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["slug"], "post-3");
    assert!(body["tags"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_get_post_by_slug() {
    let store = store_with_posts(2).await;
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/api/posts/post-1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "Title of post-1");
    assert_eq!(body["readingTime"], "3 min read");

    let req = test::TestRequest::get().uri("/api/posts/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn test_create_post_derives_slug() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let payload = json!({
        "title": "Hello, World Again!",
        "excerpt": "Short",
        "content": "Long",
        "readingTime": "1 min read"
    });

    let req = test::TestRequest::post().uri("/api/posts").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["slug"], "hello-world-again");
    assert!(body["id"].as_i64().unwrap() > 0);

    // Same title, same slug.
    let req = test::TestRequest::post().uri("/api/posts").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(store.get_post_by_slug("hello-world-again").await.unwrap().is_some());
}

#[actix_web::test]
async fn test_create_post_validation() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "title": "", "excerpt": "", "content": "x", "readingTime": "1 min" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    // Missing required field fails extraction.
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "title": "Only a title" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({
            "slug": "Not A Slug",
            "title": "T", "excerpt": "E", "content": "C", "readingTime": "1 min"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({
            "title": "T", "excerpt": "E", "content": "C", "readingTime": "1 min", "authorId": 42
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(store.get_all_posts().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_tag_endpoints() {
    let store = store_with_posts(3).await;
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .set_json(json!({ "name": "Web Development" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let tag: Value = test::read_body_json(resp).await;
    assert_eq!(tag["slug"], "web-development");

    let tag_id = tag["id"].as_i64().unwrap() as i32;
    store.add_tag_to_post(1, tag_id).await.unwrap();
    store.add_tag_to_post(3, tag_id).await.unwrap();

    let req = test::TestRequest::get().uri("/api/tags").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/api/tags/web-development").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["name"], "Web Development");

    let req = test::TestRequest::get().uri("/api/tags/web-development/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(slugs(&body), vec!["post-3", "post-1"]);
    assert_eq!(body[0]["tags"][0]["slug"], "web-development");

    for uri in ["/api/tags/nope", "/api/tags/nope/posts"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .set_json(json!({ "name": "Web Development", "slug": "webdev" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_subscribe_rejects_duplicates() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/api/subscribe")
        .set_json(json!({ "email": " Reader@Example.com " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "reader@example.com");
    assert!(body["createdAt"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/subscribe")
        .set_json(json!({ "email": "reader@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Email already subscribed");

    let req = test::TestRequest::post()
        .uri("/api/subscribe")
        .set_json(json!({ "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Invalid email address");
}

#[actix_web::test]
async fn test_rss_feed() {
    let store = store_with_posts(2).await;
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/rss.xml").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("application/xml"));

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.starts_with("<?xml"));
    assert_eq!(body.matches("<item>").count(), 2);
    assert!(body.contains("<link>https://blog.example.com/posts/post-2</link>"));
    assert!(body.find("post-2").unwrap() < body.find("post-1").unwrap());
}

#[actix_web::test]
async fn test_rss_feed_empty_store() {
    let store = Arc::new(InMemoryStore::new());
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/rss.xml").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("<channel>"));
    assert!(!body.contains("<item>"));
}

#[actix_web::test]
async fn test_rss_links_use_host_header_without_site_url() {
    let store = store_with_posts(1).await;
    let app = init_app!(store, SiteConfig::default());

    let req = test::TestRequest::get()
        .uri("/rss.xml")
        .insert_header((header::HOST, "example.org"))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = String::from_utf8(body.to_vec()).unwrap();

    assert!(body.contains("<link>http://example.org</link>"));
    assert!(body.contains("<link>http://example.org/posts/post-1</link>"));
    assert!(body.contains("<title>Inkwell</title>"));
}

#[actix_web::test]
async fn test_list_posts_rejects_unaddressable_page() {
    let store = store_with_posts(2).await;
    let app = init_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/posts?page=18446744073709551615&limit=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "page is out of range");
}
