use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use futures::future::join_all;
use tokio_test::assert_ok;
use uuid::Uuid;

use doctor_cell::models::{BookSlotRequest, CreateDoctorRequest, Doctor};
use doctor_cell::services::{BookingCommitter, DoctorService};
use doctor_cell::store::{DoctorStore, MemoryDoctorStore};
use doctor_cell::DoctorError;
use shared_utils::clock::FixedClock;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 15)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .unwrap()
}

fn doctor(name: &str) -> Doctor {
    CreateDoctorRequest {
        name: name.to_string(),
        speciality: "General physician".to_string(),
        degree: "MBBS".to_string(),
        experience: "4 Years".to_string(),
        about: String::new(),
        fees: 50.0,
        available: Some(true),
        image: None,
    }
    .into_doctor(Utc::now())
}

fn request(doctor_id: Uuid, date: &str, time: &str) -> BookSlotRequest {
    BookSlotRequest {
        doc_id: Some(doctor_id.to_string()),
        slot_date: Some(date.to_string()),
        slot_time: Some(time.to_string()),
    }
}

fn setup(now: NaiveDateTime) -> (Arc<MemoryDoctorStore>, BookingCommitter, Uuid) {
    let doc = doctor("Dr. Richard James");
    let id = doc.id;
    let store = Arc::new(MemoryDoctorStore::with_doctors([doc]));
    let committer = BookingCommitter::new(store.clone(), Arc::new(FixedClock(now)));
    (store, committer, id)
}

#[tokio::test]
async fn booked_slot_disappears_from_the_plan() {
    let (store, committer, doctor_id) = setup(at(9, 0));

    let confirmation = committer
        .commit(Uuid::new_v4(), request(doctor_id, "15_6_2025", "10:30 AM"))
        .await
        .expect("first booking succeeds");
    assert_eq!(confirmation.slot_date.to_string(), "15_6_2025");
    assert_eq!(confirmation.slot_time.to_string(), "10:30 AM");

    let service = DoctorService::new(store.clone(), Arc::new(FixedClock(at(9, 0))));
    let slots = service.available_slots(doctor_id).await.unwrap();
    let today: Vec<String> = slots.days[0].slots.iter().map(|s| s.time.to_string()).collect();

    assert_eq!(today.len(), 21);
    assert!(!today.contains(&"10:30 AM".to_string()));
}

#[tokio::test]
async fn second_booking_of_a_slot_is_rejected() {
    let (store, committer, doctor_id) = setup(at(9, 0));

    committer
        .commit(Uuid::new_v4(), request(doctor_id, "15_6_2025", "10:30 AM"))
        .await
        .unwrap();
    let second = committer
        .commit(Uuid::new_v4(), request(doctor_id, "15_6_2025", "10:30 AM"))
        .await;

    assert_matches!(second, Err(DoctorError::SlotUnavailable { ref date, ref time }) if date == "15_6_2025" && time == "10:30 AM");

    let stored = store.get_doctor(doctor_id).await.unwrap().unwrap();
    assert_eq!(stored.booked_slots.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_of_one_slot_admit_exactly_one() {
    let (store, committer, doctor_id) = setup(at(9, 0));
    let committer = Arc::new(committer);

    let attempts = (0..16).map(|_| {
        let committer = committer.clone();
        tokio::spawn(async move {
            committer
                .commit(Uuid::new_v4(), request(doctor_id, "15_6_2025", "10:30 AM"))
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    let losers = results
        .iter()
        .filter(|r| matches!(r, Err(DoctorError::SlotUnavailable { .. })))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(losers, 15);

    let stored = store.get_doctor(doctor_id).await.unwrap().unwrap();
    assert_eq!(stored.booked_slots.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_of_different_slots_all_land() {
    let (store, committer, doctor_id) = setup(at(9, 0));
    let committer = Arc::new(committer);
    let times = ["10:00 AM", "10:30 AM", "11:00 AM", "02:30 PM", "08:30 PM"];

    let attempts = times.iter().map(|time| {
        let committer = committer.clone();
        let time = time.to_string();
        tokio::spawn(async move {
            committer
                .commit(Uuid::new_v4(), request(doctor_id, "16_6_2025", &time))
                .await
        })
    });

    for joined in join_all(attempts).await {
        assert_ok!(joined.unwrap());
    }

    let stored = store.get_doctor(doctor_id).await.unwrap().unwrap();
    assert_eq!(stored.booked_slots.len(), times.len());
}

#[tokio::test]
async fn unknown_doctor_is_not_found() {
    let (_, committer, _) = setup(at(9, 0));

    let result = committer
        .commit(Uuid::new_v4(), request(Uuid::new_v4(), "15_6_2025", "10:30 AM"))
        .await;

    assert_matches!(result, Err(DoctorError::DoctorNotFound));
}

#[tokio::test]
async fn malformed_requests_leave_no_trace() {
    let (store, committer, doctor_id) = setup(at(9, 0));

    for bad in [
        request(doctor_id, "15-6-2025", "10:30 AM"),
        request(doctor_id, "15_6_2025", "10:30"),
        request(doctor_id, "31_2_2025", "10:30 AM"),
        BookSlotRequest {
            doc_id: Some("not-a-uuid".to_string()),
            ..request(doctor_id, "15_6_2025", "10:30 AM")
        },
        BookSlotRequest {
            slot_time: None,
            ..request(doctor_id, "15_6_2025", "10:30 AM")
        },
    ] {
        let result = committer.commit(Uuid::new_v4(), bad).await;
        assert_matches!(result, Err(DoctorError::ValidationError(_)));
    }

    let stored = store.get_doctor(doctor_id).await.unwrap().unwrap();
    assert!(stored.booked_slots.is_empty());
}

#[tokio::test]
async fn off_grid_and_past_slots_are_rejected() {
    let (_, committer, doctor_id) = setup(at(12, 0));

    let off_grid = committer
        .commit(Uuid::new_v4(), request(doctor_id, "16_6_2025", "10:15 AM"))
        .await;
    assert_matches!(off_grid, Err(DoctorError::ValidationError(_)));

    let after_closing = committer
        .commit(Uuid::new_v4(), request(doctor_id, "16_6_2025", "09:00 PM"))
        .await;
    assert_matches!(after_closing, Err(DoctorError::ValidationError(_)));

    let past = committer
        .commit(Uuid::new_v4(), request(doctor_id, "15_6_2025", "10:30 AM"))
        .await;
    assert_matches!(past, Err(DoctorError::ValidationError(_)));

    let later_today = committer
        .commit(Uuid::new_v4(), request(doctor_id, "15_6_2025", "01:00 PM"))
        .await;
    assert!(later_today.is_ok());
}
