use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use complaint_cell::{router::complaint_routes, ComplaintCellState};
use doctor_cell::{router::doctor_routes, DoctorCellState};
use review_cell::{router::review_routes, ReviewCellState};
use shared_config::AppConfig;
use shared_utils::clock::Clock;

use crate::stores::Stores;

pub fn create_router(config: Arc<AppConfig>, stores: Stores, clock: Arc<dyn Clock>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest(
            "/doctors",
            doctor_routes(DoctorCellState::new(config.clone(), stores.doctors, clock)),
        )
        .nest(
            "/reviews",
            review_routes(ReviewCellState::new(config.clone(), stores.reviews)),
        )
        .nest(
            "/complaints",
            complaint_routes(ComplaintCellState::new(config, stores.complaints)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use shared_utils::clock::FixedClock;
    use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

    fn app(config: &TestConfig) -> Router {
        let now = NaiveDate::from_ymd_opt(2025, 6, 15)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap();
        create_router(config.to_arc(), Stores::in_memory(), Arc::new(FixedClock(now)))
    }

    async fn call(app: &Router, method: &str, uri: &str, auth: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn root_reports_running() {
        let config = TestConfig::default();
        let response = app(&config)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn reviews_and_bookings_land_on_the_same_doctor() {
        let config = TestConfig::default();
        let app = app(&config);
        let admin = JwtTestUtils::bearer(&TestUser::admin("admin@example.com"), &config.jwt_secret);
        let patient = JwtTestUtils::bearer(&TestUser::patient("patient@example.com"), &config.jwt_secret);

        let (status, created) = call(
            &app,
            "POST",
            "/doctors",
            Some(&admin),
            Some(json!({
                "name": "Dr. Zoe Kelly",
                "speciality": "Neurologist",
                "degree": "MBBS",
                "experience": "4 Years",
                "about": "",
                "fees": 50
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let doctor_id = created["doctor"]["id"].as_str().unwrap().to_string();

        let (status, _) = call(
            &app,
            "POST",
            "/doctors/book-appointment",
            Some(&patient),
            Some(json!({ "docId": doctor_id, "slotDate": "15_6_2025", "slotTime": "10:30 AM" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &app,
            "POST",
            "/reviews",
            Some(&patient),
            Some(json!({ "doctorId": doctor_id, "rating": 5, "review": "Thorough and kind." })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, fetched) = call(&app, "GET", &format!("/doctors/{}", doctor_id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["doctor"]["averageRating"], 5.0);
        assert_eq!(fetched["doctor"]["totalReviews"], 1);
        assert_eq!(fetched["doctor"]["bookedSlots"]["15_6_2025"], json!(["10:30 AM"]));
    }
}
