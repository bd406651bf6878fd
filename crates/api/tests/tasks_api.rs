//! HTTP-level tests for tasks: assignment, visibility, lifecycle, time
//! logs, and comments.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get_auth, post_json_auth, put_json_auth, seed_user,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use taskflow_db::repositories::ProfileRepo;

async fn create_task(pool: &PgPool, admin: &str, body: Value) -> (StatusCode, Value) {
    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/v1/tasks", body, admin).await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn set_status(pool: &PgPool, token: &str, task_id: &str, status: &str) -> (StatusCode, Value) {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}/status"),
        json!({ "status": status }),
        token,
    )
    .await;
    let code = response.status();
    (code, body_json(response).await)
}

async fn admin_action(pool: &PgPool, admin: &str, task_id: &str, action: &str) -> (StatusCode, Value) {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}/{action}"),
        json!({}),
        admin,
    )
    .await;
    let code = response.status();
    (code, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_task_and_assignees_are_notified(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, _) = seed_user(&pool, "ada@example.com", "user").await;

    let (status, json) = create_task(
        &pool,
        &admin,
        json!({ "title": "  Write docs ", "assignee_ids": [ada.id, ada.id], "due_date": "2026-11-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["title"], "Write docs");
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["priority"], "medium");
    assert_eq!(json["data"]["assignee_ids"].as_array().unwrap().len(), 1);
    assert_eq!(json["notification"]["attempted"], 1);
    assert_eq!(json["notification"]["simulated"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_assignee_is_rejected(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;

    let (status, json) = create_task(
        &pool,
        &admin,
        json!({ "title": "Ghost work", "assignee_ids": [uuid::Uuid::new_v4()] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_assignee_is_rejected(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (jane, _) = seed_user(&pool, "jane@example.com", "user").await;
    ProfileRepo::deactivate(&pool, jane.id).await.unwrap();

    let (status, json) =
        create_task(&pool, &admin, json!({ "title": "Handover", "assignee_ids": [jane.id] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains(&jane.id.to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn existing_assignee_survives_deactivation(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (jane, _) = seed_user(&pool, "jane@example.com", "user").await;
    let (ada, _) = seed_user(&pool, "ada@example.com", "user").await;

    let (_, json) =
        create_task(&pool, &admin, json!({ "title": "Handover", "assignee_ids": [jane.id] })).await;
    let task_id = json["data"]["id"].as_str().unwrap().to_string();
    ProfileRepo::deactivate(&pool, jane.id).await.unwrap();

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}"),
        json!({ "assignee_ids": [jane.id, ada.id] }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["assignee_ids"].as_array().unwrap().len(), 2);
    assert_eq!(json["notification"]["attempted"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn null_clears_due_date_but_omission_keeps_it(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (_, json) = create_task(
        &pool,
        &admin,
        json!({ "title": "Ship", "description": "v1", "due_date": "2026-11-01" }),
    )
    .await;
    let task_id = json["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/tasks/{task_id}");

    let response =
        put_json_auth(build_test_app(pool.clone()), &uri, json!({ "priority": "high" }), &admin).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["due_date"], "2026-11-01");
    assert_eq!(json["data"]["description"], "v1");

    let response =
        put_json_auth(build_test_app(pool.clone()), &uri, json!({ "due_date": null }), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["due_date"].is_null());
    assert_eq!(json["data"]["description"], "v1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_priority_is_rejected(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (status, _) =
        create_task(&pool, &admin, json!({ "title": "X", "priority": "whenever" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_cannot_create_tasks(pool: PgPool) {
    let (_, user) = seed_user(&pool, "ada@example.com", "user").await;
    let (status, _) = create_task(&pool, &user, json!({ "title": "Mine" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn users_only_see_their_assignments(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, ada_token) = seed_user(&pool, "ada@example.com", "user").await;
    let (bob, _) = seed_user(&pool, "bob@example.com", "user").await;

    let (_, json) = create_task(&pool, &admin, json!({ "title": "A", "assignee_ids": [ada.id] })).await;
    let ada_task = json["data"]["id"].as_str().unwrap().to_string();
    let (_, json) = create_task(&pool, &admin, json!({ "title": "B", "assignee_ids": [bob.id] })).await;
    let bob_task = json["data"]["id"].as_str().unwrap().to_string();

    // The assignee_id filter is ignored for non-admins.
    let json = body_json(
        get_auth(
            build_test_app(pool.clone()),
            &format!("/api/v1/tasks?assignee_id={}", bob.id),
            &ada_token,
        )
        .await,
    )
    .await;
    let tasks = json["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], ada_task.as_str());

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{bob_task}"),
        &ada_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(get_auth(build_test_app(pool), "/api/v1/tasks", &admin).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_status_filter_is_400(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let response = get_auth(build_test_app(pool), "/api/v1/tasks?status=done", &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_notifies_only_new_assignees(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, _) = seed_user(&pool, "ada@example.com", "user").await;
    let (bob, _) = seed_user(&pool, "bob@example.com", "user").await;

    let (_, json) = create_task(&pool, &admin, json!({ "title": "A", "assignee_ids": [ada.id] })).await;
    let task_id = json["data"]["id"].as_str().unwrap().to_string();

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}"),
        json!({ "assignee_ids": [ada.id, bob.id], "priority": "high" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["priority"], "high");
    assert_eq!(json["notification"]["attempted"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_task(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (_, json) = create_task(&pool, &admin, json!({ "title": "Temp" })).await;
    let task_id = json["data"]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/tasks/{task_id}");
    let response = delete_auth(build_test_app(pool.clone()), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(build_test_app(pool), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_lifecycle_with_rework(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, ada_token) = seed_user(&pool, "ada@example.com", "user").await;
    let (_, json) = create_task(&pool, &admin, json!({ "title": "A", "assignee_ids": [ada.id] })).await;
    let task_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = set_status(&pool, &ada_token, &task_id, "in_progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "in_progress");

    let (status, _) = set_status(&pool, &ada_token, &task_id, "completed").await;
    assert_eq!(status, StatusCode::OK);

    // Approval belongs to admins.
    let (status, _) = set_status(&pool, &ada_token, &task_id, "approved").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = admin_action(&pool, &admin, &task_id, "reject").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "in_progress");

    set_status(&pool, &ada_token, &task_id, "completed").await;
    let (status, json) = admin_action(&pool, &admin, &task_id, "approve").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "approved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transitions_outside_the_graph_conflict(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, ada_token) = seed_user(&pool, "ada@example.com", "user").await;
    let (_, json) = create_task(&pool, &admin, json!({ "title": "A", "assignee_ids": [ada.id] })).await;
    let task_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = set_status(&pool, &ada_token, &task_id, "completed").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");

    let (status, _) = admin_action(&pool, &admin, &task_id, "approve").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = set_status(&pool, &ada_token, &task_id, "finished").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_assignee_cannot_move_task(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (_, bob_token) = seed_user(&pool, "bob@example.com", "user").await;
    let (_, json) = create_task(&pool, &admin, json!({ "title": "A" })).await;
    let task_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = set_status(&pool, &bob_token, &task_id, "in_progress").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Logs and comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn assignee_logs_time_and_comments(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, ada_token) = seed_user(&pool, "ada@example.com", "user").await;
    let (_, json) = create_task(&pool, &admin, json!({ "title": "A", "assignee_ids": [ada.id] })).await;
    let task_id = json["data"]["id"].as_str().unwrap().to_string();

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}/logs"),
        json!({ "minutes": 45, "note": "research" }),
        &ada_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}/logs"),
        json!({ "minutes": 0 }),
        &ada_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}/comments"),
        json!({ "body": "Halfway there" }),
        &ada_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let logs = body_json(
        get_auth(
            build_test_app(pool.clone()),
            &format!("/api/v1/tasks/{task_id}/logs"),
            &admin,
        )
        .await,
    )
    .await;
    assert_eq!(logs["data"][0]["minutes"], 45);

    let comments = body_json(
        get_auth(
            build_test_app(pool),
            &format!("/api/v1/tasks/{task_id}/comments"),
            &ada_token,
        )
        .await,
    )
    .await;
    assert_eq!(comments["data"][0]["body"], "Halfway there");
}
