mod common;

use actix_web::{http::StatusCode, test};
use httpmock::prelude::*;
use serde_json::{json, Value};

fn rows() -> Value {
    json!([
        {
            "id": 101,
            "title": "Bài mới từ bảng dữ liệu",
            "content": "**Nội dung** thật",
            "excerpt": "Tóm tắt thật",
            "author": "Thắng Phạm",
            "category": "Marketing",
            "views": 3,
            "date": "18/10/2026",
            "image_url": null,
            "type": "video"
        }
    ])
}

#[actix_web::test]
async fn feed_in_mock_mode_shows_fallback_posts() {
    let app = test_app!(common::state(None, None));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = common::body_text(resp).await;
    assert!(body.contains("Mua Tim Tiktok"));
    assert!(body.contains("Share theme Flatsome"));
    assert!(body.contains("Đang hiển thị dữ liệu mẫu."));
}

#[actix_web::test]
async fn search_filters_the_feed() {
    let app = test_app!(common::state(None, None));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/?q=flatsome").to_request()).await;
    let body = common::body_text(resp).await;
    assert!(body.contains("Share theme Flatsome"));
    assert!(!body.contains("Mua Tim Tiktok"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?q=khong-co-gi").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::body_text(resp).await;
    assert!(body.contains("Không tìm thấy bài viết nào"));
}

#[actix_web::test]
async fn detail_page_renders_body_and_unknown_id_is_404() {
    let app = test_app!(common::state(None, None));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::body_text(resp).await.contains("Full content here..."));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/does-not-exist").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn json_api_uses_camel_case_and_filters() {
    let app = test_app!(common::state(None, None));
    let req = test::TestRequest::get().uri("/api/posts?q=WordPress").to_request();
    let posts: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(!posts.is_empty());
    for post in &posts {
        assert!(post.get("imageUrl").is_some());
        assert!(post.get("image_url").is_none());
    }

    let req = test::TestRequest::get().uri("/api/posts/s4").to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["type"], "share-code");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts/zzz").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn feed_reads_from_the_backend_when_configured() {
    let server = MockServer::start_async().await;
    let read = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/posts")
                .query_param("select", "*")
                .query_param("order", "date.desc")
                .header("apikey", common::ANON_KEY);
            then.status(200).json_body(rows());
        })
        .await;

    let app = test_app!(common::state(Some(&server.base_url()), None));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let body = common::body_text(resp).await;
    assert!(body.contains("Bài mới từ bảng dữ liệu"));
    assert!(!body.contains("Mua Tim Tiktok"));
    assert!(!body.contains("Đang hiển thị dữ liệu mẫu."));

    let req = test::TestRequest::get().uri("/api/posts/101").to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["id"], "101");
    assert_eq!(post["imageUrl"], "");
    assert_eq!(post["type"], "video");

    read.assert_hits_async(2).await;
}

#[actix_web::test]
async fn backend_failure_falls_back_to_static_posts() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/posts");
            then.status(500).json_body(json!({ "message": "boom" }));
        })
        .await;

    let app = test_app!(common::state(Some(&server.base_url()), None));
    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let posts: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), blogshare::models::mock_data::fallback_posts().len());
}

#[actix_web::test]
async fn empty_table_falls_back_to_static_posts() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/posts");
            then.status(200).json_body(json!([]));
        })
        .await;

    let app = test_app!(common::state(Some(&server.base_url()), None));
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(common::body_text(resp).await.contains("Mua Tim Tiktok"));
}

#[actix_web::test]
async fn chat_forwards_text_and_returns_model_reply() {
    let server = MockServer::start_async().await;
    let completion = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-3-flash-preview:generateContent")
                .header("x-goog-api-key", common::CHAT_KEY)
                .body_contains("WordPress là gì?");
            then.status(200).json_body(json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": "WordPress là một CMS." }] } }]
            }));
        })
        .await;

    let app = test_app!(common::state(None, Some(&server.base_url())));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({ "message": "WordPress là gì?" }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["role"], "ai");
    assert_eq!(reply["text"], "WordPress là một CMS.");
    completion.assert_async().await;
}

#[actix_web::test]
async fn chat_failures_become_canned_replies() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/models/gemini-3-flash-preview:generateContent");
            then.status(503).body("overloaded");
        })
        .await;

    let app = test_app!(common::state(None, Some(&server.base_url())));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({ "message": "Xin chào" }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["text"], blogshare::helper::chat_helpers::BUSY_FALLBACK);
}

#[actix_web::test]
async fn chat_with_empty_model_text_uses_trouble_reply() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/models/gemini-3-flash-preview:generateContent");
            then.status(200).json_body(json!({ "candidates": [] }));
        })
        .await;

    let app = test_app!(common::state(None, Some(&server.base_url())));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({ "message": "Xin chào" }))
        .to_request();
    let reply: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reply["text"], blogshare::helper::chat_helpers::EMPTY_REPLY_FALLBACK);
}

#[actix_web::test]
async fn blank_chat_message_is_a_bad_request() {
    let app = test_app!(common::state(None, None));
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({ "message": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
