//! Bearer-middleware behavior over real HTTP routing.
//!
//! These tests use a lazy pool that never opens a connection; every
//! request here is rejected (or validated) before any database round-trip.

use std::sync::Arc;

use actix_web::{test, web, App};
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
async fn protected_route_without_header_is_401_with_envelope() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/v1/users/me").to_request();
    let resp = test::call_service(&app, req).await;

    // Middleware rejections carry the same JSON envelope as handler errors.
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "AUTHENTICATION_ERROR");
    assert_eq!(body["status"], 401);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn protected_route_with_wrong_scheme_is_401() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(("Authorization", "Token abc123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn protected_route_with_garbage_token_is_401() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "AUTHENTICATION_ERROR");
}

#[actix_web::test]
async fn refresh_token_is_rejected_as_bearer_credential() {
    let app = test_app!();

    let refresh = test_keys()
        .issue_refresh_token(Uuid::new_v4())
        .expect("issue refresh");

    let req = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(("Authorization", format!("Bearer {}", refresh.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn valid_bearer_reaches_the_handler() {
    let app = test_app!();

    let access = test_keys()
        .issue_access_token(Uuid::new_v4())
        .expect("issue access");

    // No `query` parameter: the catalog handler rejects the request with a
    // 400 before touching the database. A 401 here would mean the token
    // never made it past the middleware.
    let req = test::TestRequest::get()
        .uri("/api/v1/videos")
        .insert_header(("Authorization", format!("Bearer {}", access.token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn auth_routes_are_public() {
    let app = test_app!();

    // No Authorization header; a 400 (validation) proves the request was
    // routed to the handler instead of being bounced by the middleware.
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": "not-an-email", "password": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn logout_requires_authentication() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}
