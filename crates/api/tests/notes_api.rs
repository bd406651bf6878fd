//! HTTP-level tests for the admin note surface and the recipient view.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_auth, post_json_auth, put_json_auth, seed_user};
use serde_json::{json, Value};
use sqlx::PgPool;
use taskflow_db::repositories::ProfileRepo;

async fn create_note(pool: &PgPool, admin: &str, body: Value) -> (StatusCode, Value) {
    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/v1/admin/notes", body, admin).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_applies_defaults_and_lists_with_author(pool: PgPool) {
    let (root, admin) = seed_user(&pool, "root@example.com", "admin").await;

    let (status, json) = create_note(
        &pool,
        &admin,
        json!({ "title": "Standup", "content": "<p>Notes</p>" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["category"], "general");
    assert_eq!(json["data"]["visibility"], "recipients");

    let json = body_json(
        get_auth(build_test_app(pool), "/api/v1/admin/notes", &admin).await,
    )
    .await;
    let notes = json["data"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Standup");
    assert_eq!(notes[0]["author"]["id"], root.id.to_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validates_fields(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;

    let (status, _) = create_note(&pool, &admin, json!({ "title": " ", "content": "<p>x</p>" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = create_note(
        &pool,
        &admin,
        json!({ "title": "T", "content": "<p>x</p>", "visibility": "everyone" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = create_note(
        &pool,
        &admin,
        json!({ "title": "T", "content": "<p>x</p>", "recipient_user_ids": [uuid::Uuid::new_v4()] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_via_post_and_put(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (_, json) = create_note(&pool, &admin, json!({ "title": "T", "content": "<p>x</p>" })).await;
    let note_id = json["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/admin/notes/{note_id}");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "title": "Renamed" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "category": "ops", "visibility": "public" }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(build_test_app(pool), &uri, &admin).await).await;
    assert_eq!(json["data"]["title"], "Renamed");
    assert_eq!(json["data"]["category"], "ops");
    assert_eq!(json["data"]["visibility"], "public");
    assert_eq!(json["data"]["content"], "<p>x</p>");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_emails_each_recipient(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, _) = seed_user(&pool, "ada@example.com", "user").await;
    let (bob, _) = seed_user(&pool, "bob@example.com", "user").await;

    let (_, json) = create_note(
        &pool,
        &admin,
        json!({ "title": "T", "content": "<p>x</p>", "recipient_user_ids": [ada.id, bob.id] }),
    )
    .await;
    let note_id = json["data"]["id"].as_str().unwrap().to_string();

    let response = post_json_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/notes/{note_id}/send"),
        json!({}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["notification"]["attempted"], 2);
    assert_eq!(json["notification"]["simulated"], 2);
    assert!(json["notification"]["warning"].is_string());
    assert_eq!(json["data"]["recipients"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_skips_deactivated_recipients(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, _) = seed_user(&pool, "ada@example.com", "user").await;
    let (bob, _) = seed_user(&pool, "bob@example.com", "user").await;

    let (_, json) = create_note(
        &pool,
        &admin,
        json!({ "title": "T", "content": "<p>x</p>", "recipient_user_ids": [ada.id, bob.id] }),
    )
    .await;
    let note_id = json["data"]["id"].as_str().unwrap().to_string();
    ProfileRepo::deactivate(&pool, bob.id).await.unwrap();

    let response = post_json_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/notes/{note_id}/send"),
        json!({}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["notification"]["attempted"], 1);
    assert_eq!(json["data"]["recipients"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_recipient_is_rejected(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (bob, _) = seed_user(&pool, "bob@example.com", "user").await;
    ProfileRepo::deactivate(&pool, bob.id).await.unwrap();

    let (status, json) = create_note(
        &pool,
        &admin,
        json!({ "title": "T", "content": "<p>x</p>", "recipient_user_ids": [bob.id] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_without_recipients_is_rejected(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (_, json) = create_note(&pool, &admin, json!({ "title": "T", "content": "<p>x</p>" })).await;
    let note_id = json["data"]["id"].as_str().unwrap().to_string();

    let response = post_json_auth(
        build_test_app(pool),
        &format!("/api/v1/admin/notes/{note_id}/send"),
        json!({}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recipients_see_their_notes_and_public_ones(pool: PgPool) {
    let (_, admin) = seed_user(&pool, "root@example.com", "admin").await;
    let (ada, ada_token) = seed_user(&pool, "ada@example.com", "user").await;

    let (_, json) = create_note(
        &pool,
        &admin,
        json!({ "title": "For Ada", "content": "<p>a</p>", "recipient_user_ids": [ada.id] }),
    )
    .await;
    let for_ada = json["data"]["id"].as_str().unwrap().to_string();
    create_note(
        &pool,
        &admin,
        json!({ "title": "Everyone", "content": "<p>b</p>", "visibility": "public" }),
    )
    .await;
    let (_, json) = create_note(
        &pool,
        &admin,
        json!({ "title": "Private", "content": "<p>c</p>", "visibility": "private" }),
    )
    .await;
    let private = json["data"]["id"].as_str().unwrap().to_string();

    let json = body_json(get_auth(build_test_app(pool.clone()), "/api/v1/notes", &ada_token).await).await;
    let mut titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["Everyone", "For Ada"]);

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/notes/{for_ada}"),
        &ada_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/notes/{private}"),
        &ada_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(build_test_app(pool), "/api/v1/admin/notes", &ada_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
