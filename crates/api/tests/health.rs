//! Tests for the health endpoint, general HTTP behaviour, and the
//! dashboard counts.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, post_json_auth, seed_user};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_reports_database(pool: PgPool) {
    let response = get(build_test_app(pool), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_carries_request_id(pool: PgPool) {
    let response = get(build_test_app(pool), "/health").await;
    let id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header must be set")
        .to_str()
        .unwrap();
    assert_eq!(id.len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_scopes_counts_to_the_caller(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, ada_token) = seed_user(&pool, "ada@example.com", "user").await;

    for (title, assignees) in [("A", vec![ada.id]), ("B", vec![])] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/tasks",
            json!({ "title": title, "assignee_ids": assignees }),
            &admin,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(
        get_auth(build_test_app(pool.clone()), "/api/v1/dashboard/stats", &admin).await,
    )
    .await;
    assert_eq!(json["data"]["total_tasks"], 2);
    assert_eq!(json["data"]["users"], 2);
    assert_eq!(json["data"]["pending_edit_requests"], 0);
    assert_eq!(json["data"]["minutes_logged_this_week"], 0);

    let json = body_json(
        get_auth(build_test_app(pool), "/api/v1/dashboard/stats", &ada_token).await,
    )
    .await;
    assert_eq!(json["data"]["total_tasks"], 1);
    assert!(json["data"].get("users").is_none());
    assert!(json["data"].get("pending_edit_requests").is_none());
}
