use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use complaint_cell::router::complaint_routes;
use complaint_cell::store::MemoryComplaintStore;
use complaint_cell::ComplaintCellState;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn create_test_app() -> (Router, TestConfig) {
    let config = TestConfig::default();
    let state = ComplaintCellState::new(config.to_arc(), Arc::new(MemoryComplaintStore::new()));
    (complaint_routes(state), config)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn request(method: &str, uri: &str, auth: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, auth);
    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn complaint(description: &str) -> Value {
    json!({
        "hospitalName": "City Clinic",
        "doctorName": "Dr. Richard James",
        "department": "General",
        "complaintType": "Waiting time",
        "description": description,
        "status": "Resolved"
    })
}

#[tokio::test]
async fn users_file_and_list_their_own_complaints() {
    let (app, config) = create_test_app();
    let alice = JwtTestUtils::bearer(&TestUser::patient("alice@example.com"), &config.jwt_secret);
    let bob = JwtTestUtils::bearer(&TestUser::patient("bob@example.com"), &config.jwt_secret);

    let (status, filed) = send(&app, request("POST", "/user", &alice, Some(complaint("Waited two hours.")))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filed["complaint"]["status"], "Pending");
    assert_eq!(filed["complaint"]["adminResponse"], "");

    tokio::time::sleep(Duration::from_millis(5)).await;
    send(&app, request("POST", "/user", &alice, Some(complaint("Rude reception.")))).await;
    send(&app, request("POST", "/user", &bob, Some(complaint("Lost records.")))).await;

    let (status, mine) = send(&app, request("GET", "/user", &alice, None)).await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine["complaints"].as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0]["description"], "Rude reception.");
}

#[tokio::test]
async fn incomplete_complaints_are_rejected() {
    let (app, config) = create_test_app();
    let auth = JwtTestUtils::bearer(&TestUser::patient("alice@example.com"), &config.jwt_secret);

    let (status, body) = send(
        &app,
        request("POST", "/user", &auth, Some(json!({ "hospitalName": "City Clinic" }))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn admins_review_and_respond() {
    let (app, config) = create_test_app();
    let patient = JwtTestUtils::bearer(&TestUser::patient("alice@example.com"), &config.jwt_secret);
    let admin = JwtTestUtils::bearer(&TestUser::admin("admin@example.com"), &config.jwt_secret);

    let (_, filed) = send(&app, request("POST", "/user", &patient, Some(complaint("Billing mix-up.")))).await;
    let id = filed["complaint"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, request("GET", "/", &patient, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, all) = send(&app, request("GET", "/", &admin, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["complaints"].as_array().unwrap().len(), 1);

    let changes = json!({ "status": "In Progress", "adminResponse": "Looking into it." });
    let (status, _) = send(&app, request("PUT", &format!("/{}", id), &patient, Some(changes.clone()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(&app, request("PUT", &format!("/{}", id), &admin, Some(changes.clone()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["complaint"]["status"], "In Progress");
    assert_eq!(updated["complaint"]["adminResponse"], "Looking into it.");

    let (status, _) = send(
        &app,
        request("PUT", &format!("/{}", Uuid::new_v4()), &admin, Some(changes)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn complaints_need_a_token() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(Request::get("/user").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
