//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use mindrepo_core::db::Database;
use mindrepo_core::models::NewCommit;
use tower::ServiceExt;

fn setup_test_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router(db.clone(), None, ServerConfig::default());
    (app, db)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn seed_coding_streak(db: &Database) -> Vec<i64> {
    let now = Utc::now();
    (1..=3)
        .rev()
        .map(|h| {
            db.create_commit(
                &NewCommit::new(format!("Task {}", h), "Coding")
                    .at((now - Duration::hours(h)).fixed_offset()),
            )
            .unwrap()
            .id
        })
        .collect()
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let (app, _db) = setup_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

// ========== Commit API Tests ==========

#[tokio::test]
async fn test_create_and_get_commit() {
    let (app, _db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/commits",
            serde_json::json!({
                "title": "Morning run",
                "category": "Health",
                "effort": 3,
                "timestamp": "2024-05-01T07:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = get_body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["effort"], 3);

    let response = app
        .oneshot(get(&format!("/api/commits/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["title"], "Morning run");
    assert_eq!(json["category"], "Health");
}

#[tokio::test]
async fn test_create_commit_validation_error() {
    let (app, db) = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/commits",
            serde_json::json!({ "title": "  ", "category": "Coding" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("title"));
    assert_eq!(db.count_commits().unwrap(), 0);
}

#[tokio::test]
async fn test_create_commit_bad_body_is_bad_request() {
    let (app, db) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/commits",
            serde_json::json!({
                "title": "Run",
                "category": "Health",
                "timestamp": "not a date"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("invalid timestamp"));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/commits",
            serde_json::json!({ "title": "Run", "category": "Health", "effort": "lots" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(get_body_json(response).await["error"].is_string());
    assert_eq!(db.count_commits().unwrap(), 0);
}

#[tokio::test]
async fn test_update_commit_bad_body_is_bad_request() {
    let (app, db) = setup_test_app();
    let id = db.create_commit(&NewCommit::new("Read", "Learning")).unwrap().id;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/commits/{}", id))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(get_body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_update_commit_null_description_clears_it() {
    let (app, db) = setup_test_app();
    let id = db
        .create_commit(&NewCommit::new("Run", "Health").with_description("tired"))
        .unwrap()
        .id;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/commits/{}", id),
            serde_json::json!({ "effort": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(get_body_json(response).await["description"], "tired");

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/commits/{}", id),
            serde_json::json!({ "description": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(get_body_json(response).await["description"].is_null());
    assert!(db.get_commit(id).unwrap().unwrap().description.is_none());
}

#[tokio::test]
async fn test_get_missing_commit() {
    let (app, _db) = setup_test_app();

    let response = app.oneshot(get("/api/commits/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_commits_with_filters() {
    let (app, db) = setup_test_app();
    seed_coding_streak(&db);
    db.create_commit(&NewCommit::new("Yoga", "Health")).unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/commits?category=Coding&limit=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let commits = json.as_array().unwrap();
    assert_eq!(commits.len(), 2);
    // Newest first
    assert_eq!(commits[0]["title"], "Task 1");

    let response = app
        .oneshot(get("/api/commits?search=yog"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_commits_bad_date() {
    let (app, _db) = setup_test_app();

    let response = app
        .oneshot(get("/api/commits?from=yesterday"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_commit() {
    let (app, db) = setup_test_app();
    let id = db.create_commit(&NewCommit::new("Read", "Learning")).unwrap().id;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/commits/{}", id),
            serde_json::json!({ "category": "Coding" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["category"], "Coding");
    assert_eq!(json["title"], "Read");

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/commits/999",
            serde_json::json!({ "title": "x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_commit() {
    let (app, db) = setup_test_app();
    let id = db.create_commit(&NewCommit::new("Read", "Learning")).unwrap().id;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/commits/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["success"], true);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/commits/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Insight API Tests ==========

#[tokio::test]
async fn test_current_insight_without_data() {
    let (app, _db) = setup_test_app();

    let response = app.oneshot(get("/api/insights")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Not enough data to generate insights");
}

#[tokio::test]
async fn test_current_insight_generates_once() {
    let (app, db) = setup_test_app();
    let ids = seed_coding_streak(&db);

    let response = app.clone().oneshot(get("/api/insights")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let first = get_body_json(response).await;
    assert_eq!(first["summary"], "Locked In: Coding");
    assert_eq!(first["severity"], "medium");
    assert_eq!(first["related_commits"].as_array().unwrap().len(), ids.len());

    let response = app.oneshot(get("/api/insights")).await.unwrap();
    let second = get_body_json(response).await;
    assert_eq!(second["id"], first["id"]);
    assert_eq!(db.count_insights().unwrap(), 1);
}

#[tokio::test]
async fn test_refresh_insight_appends() {
    let (app, db) = setup_test_app();
    db.create_commit(
        &NewCommit::new("Felt exhausted", "Coding")
            .at((Utc::now() - Duration::days(10)).fixed_offset()),
    )
    .unwrap();

    let response = app
        .clone()
        .oneshot(post_empty("/api/insights/refresh"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["summary"], "Rust Detected");
    assert_eq!(json["severity"], "high");

    app.clone()
        .oneshot(post_empty("/api/insights/refresh"))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/api/insights/history?limit=10"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_refresh_without_data() {
    let (app, _db) = setup_test_app();

    let response = app
        .oneshot(post_empty("/api/insights/refresh"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ========== Configuration ==========

#[test]
fn test_parse_allowed_origins() {
    let origins = parse_allowed_origins(" http://localhost:5173 , ,https://example.com");
    assert_eq!(
        origins,
        vec![
            "http://localhost:5173".to_string(),
            "https://example.com".to_string()
        ]
    );
    assert!(parse_allowed_origins("").is_empty());
}

#[test]
fn test_internal_errors_are_sanitized() {
    let err = AppError::from(mindrepo_core::Error::Encryption("bad key material".into()));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.message, "An internal error occurred");
}
