//! Integration tests for reporting and listing stone sightings.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL or use the default local test database.

mod common;

use axum::http::StatusCode;
use common::{
    count_locations, create_active_stone, create_authenticated_user, get_request,
    insert_location, multipart_request, parse_response_body, seed_stone, setup, unique_qr_token,
    Part, TestUser,
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// Reporting
// ============================================================================

#[tokio::test]
async fn test_report_location_without_photo() {
    let (pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let stone = create_active_stone(&app, &pool, &auth).await;

    let response = app
        .oneshot(multipart_request(
            &format!("/api/stones/{}/locations", stone),
            &[
                Part::Text("latitude", "48.1486"),
                Part::Text("longitude", "17.1077"),
                Part::Text("note", "Under the bridge"),
            ],
            Some(&auth.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["stone_id"], stone.to_string());
    assert_eq!(body["user_id"], auth.user_id.to_string());
    assert_eq!(body["latitude"], 48.1486);
    assert_eq!(body["longitude"], 17.1077);
    assert_eq!(body["note"], "Under the bridge");
    assert!(body["photo_url"].is_null());
    assert_eq!(count_locations(&pool, stone).await, 1);
}

#[tokio::test]
async fn test_report_location_with_photo_is_served() {
    let (pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let stone = create_active_stone(&app, &pool, &auth).await;
    let photo = b"\x89PNG fake image bytes";

    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/api/stones/{}/locations", stone),
            &[
                Part::Text("latitude", "1.5"),
                Part::Text("longitude", "2.5"),
                Part::File {
                    name: "photo",
                    file_name: "stone.PNG",
                    data: photo,
                },
            ],
            Some(&auth.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let photo_url = body["photo_url"].as_str().unwrap().to_string();
    assert!(photo_url.starts_with("/uploads/"));
    assert!(photo_url.ends_with(".png"));

    let response = app.oneshot(get_request(&photo_url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&served[..], &photo[..]);
}

#[tokio::test]
async fn test_report_location_empty_photo_part_is_ignored() {
    let (pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let stone = create_active_stone(&app, &pool, &auth).await;

    let response = app
        .oneshot(multipart_request(
            &format!("/api/stones/{}/locations", stone),
            &[
                Part::Text("latitude", "1"),
                Part::Text("longitude", "2"),
                Part::File {
                    name: "photo",
                    file_name: "",
                    data: b"",
                },
            ],
            Some(&auth.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(parse_response_body(response).await["photo_url"].is_null());
}

#[tokio::test]
async fn test_report_location_on_inactive_stone_is_allowed() {
    let (pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let stone = seed_stone(&pool, &unique_qr_token()).await;

    let response = app
        .oneshot(multipart_request(
            &format!("/api/stones/{}/locations", stone),
            &[Part::Text("latitude", "0"), Part::Text("longitude", "0")],
            Some(&auth.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(count_locations(&pool, stone).await, 1);
}

#[tokio::test]
async fn test_report_location_missing_latitude_writes_nothing() {
    let (pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let stone = create_active_stone(&app, &pool, &auth).await;

    let response = app
        .oneshot(multipart_request(
            &format!("/api/stones/{}/locations", stone),
            &[Part::Text("longitude", "17.1")],
            Some(&auth.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count_locations(&pool, stone).await, 0);
}

#[tokio::test]
async fn test_report_location_out_of_range_is_bad_request() {
    let (pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let stone = create_active_stone(&app, &pool, &auth).await;

    let response = app
        .oneshot(multipart_request(
            &format!("/api/stones/{}/locations", stone),
            &[Part::Text("latitude", "91"), Part::Text("longitude", "0")],
            Some(&auth.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(count_locations(&pool, stone).await, 0);
}

#[tokio::test]
async fn test_report_location_unknown_stone_is_not_found() {
    let (_pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let response = app
        .oneshot(multipart_request(
            &format!("/api/stones/{}/locations", Uuid::new_v4()),
            &[Part::Text("latitude", "1"), Part::Text("longitude", "2")],
            Some(&auth.token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_location_requires_auth() {
    let (pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let stone = create_active_stone(&app, &pool, &auth).await;

    let response = app
        .oneshot(multipart_request(
            &format!("/api/stones/{}/locations", stone),
            &[Part::Text("latitude", "1"), Part::Text("longitude", "2")],
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(count_locations(&pool, stone).await, 0);
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_location_history_is_complete_and_newest_first() {
    let (pool, app) = setup().await;
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let stone = create_active_stone(&app, &pool, &auth).await;

    let mut inserted = Vec::new();
    for i in 0..7i64 {
        inserted.push(insert_location(&pool, stone, auth.user_id, 1.0, 1.0, 100 - i * 10).await);
    }

    let response = app
        .oneshot(get_request(&format!("/api/stones/{}/locations", stone)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let listed: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = inserted.iter().rev().map(Uuid::to_string).collect();
    assert_eq!(listed, expected);
    assert!(body[0]["user_nickname"].is_string());
}

#[tokio::test]
async fn test_location_history_unknown_stone_is_empty() {
    let (_pool, app) = setup().await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/stones/{}/locations", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await, json!([]));

    let response = app
        .oneshot(get_request("/api/stones/not-a-uuid/locations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await, json!([]));
}
