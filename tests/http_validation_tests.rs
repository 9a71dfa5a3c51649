//! Request-shape validation over real HTTP routing.
//!
//! The pool is lazy and never connects; every request in this file is
//! rejected by input validation before any query runs, so the tests need
//! no infrastructure.

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use vidtube::config::JwtConfig;
use vidtube::middleware::JwtAuth;
use vidtube::routes;
use vidtube::security::jwt::JwtKeys;

fn test_keys() -> JwtKeys {
    JwtKeys::from_config(&JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_ttl_secs: 900,
        refresh_ttl_secs: 3600,
    })
}

fn bearer(keys: &JwtKeys, user_id: Uuid) -> String {
    let issued = keys.issue_access_token(user_id).expect("issue access");
    format!("Bearer {}", issued.token)
}

macro_rules! test_app {
    () => {{
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/vidtube_test")
            .expect("lazy pool");
        let keys = test_keys();
        let shared = Arc::new(keys.clone());
        test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(keys))
                .service(routes::auth_scope(JwtAuth::new(shared.clone())))
                .service(routes::api_scope(JwtAuth::new(shared))),
        )
        .await
    }};
}

#[actix_web::test]
async fn register_rejects_invalid_email() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": "not-an-email",
            "username": "carol",
            "full_name": "Carol",
            "password": "sufficient1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn register_rejects_weak_password() {
    let app = test_app!();

    // Long enough but no digit.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": "carol@example.com",
            "username": "carol",
            "full_name": "Carol",
            "password": "letters-only-here",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn register_rejects_malformed_username() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": "carol@example.com",
            "username": "-starts-with-dash",
            "full_name": "Carol",
            "password": "sufficient1",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn refresh_rejects_blank_token() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn refresh_rejects_garbage_token() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": "not.a.jwt" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn catalog_requires_a_search_query() {
    let app = test_app!();
    let keys = test_keys();

    let req = test::TestRequest::get()
        .uri("/api/v1/videos?query=%20%20")
        .insert_header(("Authorization", bearer(&keys, Uuid::new_v4())))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn blank_comment_is_rejected() {
    let app = test_app!();
    let keys = test_keys();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/videos/{}/comments", Uuid::new_v4()))
        .insert_header(("Authorization", bearer(&keys, Uuid::new_v4())))
        .set_json(json!({ "content": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn oversized_comment_is_rejected() {
    let app = test_app!();
    let keys = test_keys();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/comments/{}", Uuid::new_v4()))
        .insert_header(("Authorization", bearer(&keys, Uuid::new_v4())))
        .set_json(json!({ "content": "x".repeat(1001) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn self_subscription_is_a_bad_request() {
    let app = test_app!();
    let keys = test_keys();
    let user_id = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/subscriptions/channel/{user_id}/toggle"))
        .insert_header(("Authorization", bearer(&keys, user_id)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn error_envelope_has_the_uniform_shape() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": "bad",
            "username": "u",
            "full_name": "",
            "password": "short",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);
    assert!(body["message"].is_string());
    assert!(body["error"].is_string());
}
