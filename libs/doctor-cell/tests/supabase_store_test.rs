use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::{ReservationOutcome, SlotReservation};
use doctor_cell::store::{DoctorStore, SupabaseDoctorStore};
use doctor_cell::DoctorError;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn store(server: &MockServer) -> SupabaseDoctorStore {
    SupabaseDoctorStore::new(&TestConfig::with_supabase(&server.uri()).to_app_config())
}

fn reservation(doctor_id: Uuid) -> SlotReservation {
    SlotReservation {
        doctor_id,
        date: "15_6_2025".parse().unwrap(),
        time: "10:30 AM".parse().unwrap(),
        patient_id: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn get_doctor_combines_row_and_booked_slots() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_row(&doctor_id.to_string(), "Dr. Richard James", 4.5, 2)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_booked_slots"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booked_slot_row(&doctor_id.to_string(), "15_6_2025", "10:30 AM"),
            MockSupabaseResponses::booked_slot_row(&doctor_id.to_string(), "15_6_2025", "11:00 AM"),
        ])))
        .mount(&mock_server)
        .await;

    let doctor = store(&mock_server).get_doctor(doctor_id).await.unwrap().unwrap();

    assert_eq!(doctor.name, "Dr. Richard James");
    assert_eq!(doctor.rating.average_rating, 4.5);
    assert_eq!(doctor.rating.total_reviews, 2);
    assert_eq!(doctor.booked_slots.len(), 2);
    assert!(doctor.booked_slots.contains(&"15_6_2025".parse().unwrap(), &"11:00 AM".parse().unwrap()));
}

#[tokio::test]
async fn missing_doctor_row_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let found = store(&mock_server).get_doctor(Uuid::new_v4()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn list_attaches_each_doctors_slots() {
    let mock_server = MockServer::start().await;
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_row(&first.to_string(), "Dr. Christopher Davis", 0.0, 0),
            MockSupabaseResponses::doctor_row(&second.to_string(), "Dr. Emily Larson", 3.7, 3),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_booked_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booked_slot_row(&second.to_string(), "16_6_2025", "01:00 PM"),
        ])))
        .mount(&mock_server)
        .await;

    let doctors = store(&mock_server).list_doctors().await.unwrap();

    assert_eq!(doctors.len(), 2);
    assert!(doctors[0].booked_slots.is_empty());
    assert_eq!(doctors[1].booked_slots.len(), 1);
}

#[tokio::test]
async fn reservation_insert_sends_wire_keys() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_booked_slots"))
        .and(body_partial_json(json!({
            "doctor_id": doctor_id,
            "slot_date": "15_6_2025",
            "slot_time": "10:30 AM"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::booked_slot_row(&doctor_id.to_string(), "15_6_2025", "10:30 AM")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = store(&mock_server).reserve_slot(&reservation(doctor_id)).await.unwrap();
    assert_eq!(outcome, ReservationOutcome::Reserved);
}

#[tokio::test]
async fn unique_violation_means_already_taken() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_booked_slots"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("23505", "duplicate key value violates unique constraint"),
        ))
        .mount(&mock_server)
        .await;

    let outcome = store(&mock_server)
        .reserve_slot(&reservation(Uuid::new_v4()))
        .await
        .unwrap();
    assert_eq!(outcome, ReservationOutcome::AlreadyTaken);
}

#[tokio::test]
async fn foreign_key_violation_means_unknown_doctor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_booked_slots"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("23503", "insert or update violates foreign key constraint"),
        ))
        .mount(&mock_server)
        .await;

    let result = store(&mock_server).reserve_slot(&reservation(Uuid::new_v4())).await;
    assert_matches!(result, Err(DoctorError::DoctorNotFound));
}

#[tokio::test]
async fn other_failures_surface_as_database_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_booked_slots"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let result = store(&mock_server).reserve_slot(&reservation(Uuid::new_v4())).await;
    assert_matches!(result, Err(DoctorError::DatabaseError(_)));
}
