//! Integration tests for the banner and health endpoints and general HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, FixedIndex, ScriptedLlm, TestServices};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn banner_lists_endpoints(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "online");
    assert_eq!(json["service"], "IPL Auction Insights Agent");
    assert_eq!(json["endpoints"]["webhook"], "/whatsapp/webhook");
    assert_eq!(json["endpoints"]["health"], "/health");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_unconfigured_services(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["services"]["database"], true);
    assert_eq!(json["services"]["vector_store"], false);
    assert_eq!(json["services"]["llm"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_configured_services(pool: PgPool) {
    let services = TestServices {
        llm: Some(ScriptedLlm::new("SELECT 1;", "ok")),
        index: Some(Arc::new(FixedIndex(vec![]))),
        sender: None,
    };
    let app = common::build_test_app_with(pool, common::test_config(), services);
    let json = body_json(get(app, "/health").await).await;

    assert_eq!(json["services"]["vector_store"], true);
    assert_eq!(json["services"]["llm"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
