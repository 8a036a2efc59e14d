use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::models::{
    Appointment, AppointmentKind, AppointmentStatus, AttendanceRecord, ClinicalRecordEntry,
    NotificationRecord,
};
use appointment_cell::router::appointment_routes;
use shared_models::auth::Role;
use shared_models::records::{ProfessionalRecord, UserRecord};
use shared_store::{AppState, Collection};
use shared_utils::test_utils::{test_state, TestUser};

const PATIENT_ANA: u64 = 1;
const PROFESSIONAL: u64 = 2;
const PATIENT_BRUNO: u64 = 5;
const ADMIN: u64 = 9;

fn user(id: u64, name: &str, email: &str, role: Role) -> UserRecord {
    UserRecord {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "unused".to_string(),
        role,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}

async fn seed_directory(state: &Arc<AppState>) {
    let users = vec![
        user(PATIENT_ANA, "Ana", "ana@example.com", Role::Patient),
        user(PROFESSIONAL, "Dr. Souza", "souza@example.com", Role::Professional),
        user(PATIENT_BRUNO, "Bruno", "bruno@example.com", Role::Patient),
        user(ADMIN, "Root", "root@example.com", Role::Admin),
    ];
    state.store.save(Collection::Users, &users).await.unwrap();

    let professionals = vec![ProfessionalRecord {
        id: PROFESSIONAL,
        name: "Dr. Souza".to_string(),
        specialty: "Cardiologia".to_string(),
        license_number: "CRM-1234".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }];
    state
        .store
        .save(Collection::Professionals, &professionals)
        .await
        .unwrap();
}

fn seeded_appointment(id: u64, patient_id: u64, at: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id,
        patient_id,
        professional_id: PROFESSIONAL,
        scheduled_at: at.parse::<DateTime<Utc>>().unwrap(),
        status,
        kind: AppointmentKind::InPerson,
        remote_link: String::new(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
        created_by: patient_id,
    }
}

async fn test_app() -> (tempfile::TempDir, Arc<AppState>, Router) {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path());
    seed_directory(&state).await;
    let app = appointment_routes(state.clone());
    (dir, state, app)
}

fn json_request(method: &str, uri: &str, user: &TestUser, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", user.bearer())
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, user: &TestUser) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", user.bearer())
        .body(Body::empty())
        .unwrap()
}

fn delete_request(uri: &str, user: &TestUser) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", user.bearer())
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_body(hour: u32) -> Value {
    json!({
        "professional_id": PROFESSIONAL,
        "scheduled_at": format!("2030-01-15T{hour:02}:00:00Z"),
        "kind": "IN_PERSON"
    })
}

// ==============================================================================
// CREATE
// ==============================================================================

#[tokio::test]
async fn patient_create_pins_patient_id_to_caller() {
    let (_dir, state, app) = test_app().await;
    let ana = TestUser::patient(PATIENT_ANA);

    // Any patient_id smuggled into the body is ignored for PATIENT callers.
    let mut body = create_body(10);
    body["patient_id"] = json!(PATIENT_BRUNO);

    let response = app.oneshot(json_request("POST", "/", &ana, body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["appointment"]["patient_id"], PATIENT_ANA);
    assert_eq!(created["appointment"]["status"], "SCHEDULED");

    let notifications: Vec<NotificationRecord> =
        state.store.load(Collection::Notifications).await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].recipient_id, PATIENT_ANA);
    assert!(notifications[0].message.starts_with("Consulta agendada para"));
}

#[tokio::test]
async fn create_then_list_round_trips() {
    let (_dir, _state, app) = test_app().await;
    let ana = TestUser::patient(PATIENT_ANA);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/", &ana, create_body(10)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get_request("/", &ana)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["patient_id"], PATIENT_ANA);
    assert_eq!(listed[0]["professional_id"], PROFESSIONAL);
    assert_eq!(listed[0]["scheduled_at"], "2030-01-15T10:00:00Z");
    assert_eq!(listed[0]["status"], "SCHEDULED");
}

#[tokio::test]
async fn duplicate_slot_is_rejected() {
    let (_dir, _state, app) = test_app().await;
    let ana = TestUser::patient(PATIENT_ANA);
    let bruno = TestUser::patient(PATIENT_BRUNO);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/", &ana, create_body(10)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request("POST", "/", &bruno, create_body(10)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn canceled_slot_can_be_rebooked() {
    let (_dir, state, app) = test_app().await;
    let appointments = vec![seeded_appointment(
        1,
        PATIENT_BRUNO,
        "2030-01-15T10:00:00Z",
        AppointmentStatus::Canceled,
    )];
    state.store.save(Collection::Appointments, &appointments).await.unwrap();

    let ana = TestUser::patient(PATIENT_ANA);
    let response = app
        .oneshot(json_request("POST", "/", &ana, create_body(10)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn professional_may_only_book_own_calendar() {
    let (_dir, _state, app) = test_app().await;
    let other_professional = TestUser::professional(77);

    let mut body = create_body(10);
    body["patient_id"] = json!(PATIENT_ANA);

    let response = app
        .oneshot(json_request("POST", "/", &other_professional, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_create_requires_patient_id() {
    let (_dir, _state, app) = test_app().await;
    let admin = TestUser::admin(ADMIN);

    let response = app
        .oneshot(json_request("POST", "/", &admin, create_body(10)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Patient id is required");
}

#[tokio::test]
async fn create_requires_professional_and_time_and_kind() {
    let (_dir, _state, app) = test_app().await;
    let ana = TestUser::patient(PATIENT_ANA);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            &ana,
            json!({"scheduled_at": "2030-01-15T10:00:00Z", "kind": "IN_PERSON"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required field: professional_id");

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            &ana,
            json!({"professional_id": PROFESSIONAL, "scheduled_at": "2030-01-15T10:00:00Z"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required field: kind");
}

#[tokio::test]
async fn remote_appointment_gets_deterministic_link() {
    let (_dir, _state, app) = test_app().await;
    let ana = TestUser::patient(PATIENT_ANA);

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            &ana,
            json!({
                "professional_id": PROFESSIONAL,
                "scheduled_at": "2030-01-15T10:00:00Z",
                "kind": "REMOTE"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["appointment"]["kind"], "REMOTE");
    assert_eq!(
        created["appointment"]["remote_link"],
        "https://telemed.local/consulta/1"
    );
}

// ==============================================================================
// LIST
// ==============================================================================

#[tokio::test]
async fn listing_is_role_filtered_and_name_enriched() {
    let (_dir, state, app) = test_app().await;
    let appointments = vec![
        seeded_appointment(1, PATIENT_ANA, "2030-01-15T10:00:00Z", AppointmentStatus::Scheduled),
        seeded_appointment(2, PATIENT_BRUNO, "2030-01-15T11:00:00Z", AppointmentStatus::Scheduled),
    ];
    state.store.save(Collection::Appointments, &appointments).await.unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/", &TestUser::patient(PATIENT_ANA)))
        .await
        .unwrap();
    let mine = body_json(response).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["patient_name"], "Ana");
    assert_eq!(mine[0]["professional_name"], "Dr. Souza");

    let response = app
        .clone()
        .oneshot(get_request("/", &TestUser::professional(PROFESSIONAL)))
        .await
        .unwrap();
    let theirs = body_json(response).await;
    assert_eq!(theirs.as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get_request("/", &TestUser::admin(ADMIN)))
        .await
        .unwrap();
    let all = body_json(response).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn listing_leaves_names_absent_when_directory_lookup_misses() {
    let (_dir, state, app) = test_app().await;
    // Patient 404 has no user record; only the professional name resolves.
    let appointments = vec![seeded_appointment(
        1,
        404,
        "2030-01-15T10:00:00Z",
        AppointmentStatus::Scheduled,
    )];
    state.store.save(Collection::Appointments, &appointments).await.unwrap();

    let response = app
        .oneshot(get_request("/", &TestUser::admin(ADMIN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed = body_json(response).await;
    assert!(listed[0].get("patient_name").is_none());
    assert_eq!(listed[0]["professional_name"], "Dr. Souza");
}

#[tokio::test]
async fn listing_requires_token() {
    let (_dir, _state, app) = test_app().await;

    let response = app
        .oneshot(Request::builder().method("GET").uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ==============================================================================
// UPDATE
// ==============================================================================

async fn seed_one_scheduled(state: &Arc<AppState>) {
    let appointments = vec![seeded_appointment(
        1,
        PATIENT_ANA,
        "2030-01-15T10:00:00Z",
        AppointmentStatus::Scheduled,
    )];
    state.store.save(Collection::Appointments, &appointments).await.unwrap();
}

#[tokio::test]
async fn reschedule_checks_conflicts_excluding_self() {
    let (_dir, state, app) = test_app().await;
    let appointments = vec![
        seeded_appointment(1, PATIENT_ANA, "2030-01-15T10:00:00Z", AppointmentStatus::Scheduled),
        seeded_appointment(2, PATIENT_BRUNO, "2030-01-15T11:00:00Z", AppointmentStatus::Scheduled),
    ];
    state.store.save(Collection::Appointments, &appointments).await.unwrap();
    let ana = TestUser::patient(PATIENT_ANA);

    // Moving onto another SCHEDULED slot of the same professional: conflict.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/1",
            &ana,
            json!({"scheduled_at": "2030-01-15T11:00:00Z"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Re-asserting its own slot is not a conflict with itself.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/1",
            &ana,
            json!({"scheduled_at": "2030-01-15T10:00:00Z"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/1",
            &ana,
            json!({"scheduled_at": "2030-01-15T14:00:00Z"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["appointment"]["scheduled_at"], "2030-01-15T14:00:00Z");

    let notifications: Vec<NotificationRecord> =
        state.store.load(Collection::Notifications).await;
    assert!(notifications
        .iter()
        .any(|n| n.recipient_id == PATIENT_ANA
            && n.message == "Consulta reagendada para 2030-01-15T14:00:00Z"));
}

#[tokio::test]
async fn update_rejects_unrelated_patient_without_ownership_field() {
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/1",
            &TestUser::patient(PATIENT_BRUNO),
            json!({"status": "CANCELED"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_with_patient_id_field_bypasses_ownership_check() {
    // Known permissive behavior, kept on purpose: supplying patient_id in
    // the body skips the ownership test, and the field is never applied.
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/1",
            &TestUser::patient(PATIENT_BRUNO),
            json!({"patient_id": PATIENT_BRUNO, "status": "CANCELED"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let appointments: Vec<Appointment> = state.store.load(Collection::Appointments).await;
    assert_eq!(appointments[0].status, AppointmentStatus::Canceled);
    // Ownership never moves.
    assert_eq!(appointments[0].patient_id, PATIENT_ANA);
}

#[tokio::test]
async fn unknown_status_values_are_silently_ignored() {
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/1",
            &TestUser::patient(PATIENT_ANA),
            json!({"status": "NO_SHOW"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let appointments: Vec<Appointment> = state.store.load(Collection::Appointments).await;
    assert_eq!(appointments[0].status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn cancel_via_update_notifies_patient() {
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/1",
            &TestUser::admin(ADMIN),
            json!({"status": "CANCELED"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let notifications: Vec<NotificationRecord> =
        state.store.load(Collection::Notifications).await;
    assert!(notifications
        .iter()
        .any(|n| n.recipient_id == PATIENT_ANA && n.message == "Consulta cancelada"));
}

#[tokio::test]
async fn update_unknown_appointment_is_404() {
    let (_dir, _state, app) = test_app().await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/99",
            &TestUser::admin(ADMIN),
            json!({"status": "CANCELED"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==============================================================================
// DELETE
// ==============================================================================

#[tokio::test]
async fn delete_by_owner_reports_the_authorizing_rule() {
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;

    let response = app
        .oneshot(delete_request("/1", &TestUser::patient(PATIENT_ANA)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let deleted = body_json(response).await;
    assert_eq!(deleted["success"], true);
    assert_eq!(deleted["deleted_id"], 1);
    assert_eq!(deleted["reason"], "Patients may delete their own appointments");

    let appointments: Vec<Appointment> = state.store.load(Collection::Appointments).await;
    assert!(appointments.is_empty());

    // Both parties are notified.
    let notifications: Vec<NotificationRecord> =
        state.store.load(Collection::Notifications).await;
    assert!(notifications
        .iter()
        .any(|n| n.recipient_id == PATIENT_ANA && n.message.contains("foi removida do sistema")));
    assert!(notifications
        .iter()
        .any(|n| n.recipient_id == PROFESSIONAL && n.message.contains("foi removida")));
}

#[tokio::test]
async fn delete_by_unrelated_caller_is_forbidden() {
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;

    let response = app
        .clone()
        .oneshot(delete_request("/1", &TestUser::patient(PATIENT_BRUNO)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(delete_request("/1", &TestUser::professional(77)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn completed_appointments_cannot_be_deleted_by_anyone() {
    let (_dir, state, app) = test_app().await;
    let appointments = vec![seeded_appointment(
        1,
        PATIENT_ANA,
        "2030-01-15T10:00:00Z",
        AppointmentStatus::Completed,
    )];
    state.store.save(Collection::Appointments, &appointments).await.unwrap();

    for caller in [
        TestUser::admin(ADMIN),
        TestUser::professional(PROFESSIONAL),
        TestUser::patient(PATIENT_ANA),
    ] {
        let response = app
            .clone()
            .oneshot(delete_request("/1", &caller))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let appointments: Vec<Appointment> = state.store.load(Collection::Appointments).await;
    assert_eq!(appointments.len(), 1);
}

#[tokio::test]
async fn canceled_appointments_can_still_be_deleted() {
    let (_dir, state, app) = test_app().await;
    let appointments = vec![seeded_appointment(
        1,
        PATIENT_ANA,
        "2030-01-15T10:00:00Z",
        AppointmentStatus::Canceled,
    )];
    state.store.save(Collection::Appointments, &appointments).await.unwrap();

    let response = app
        .oneshot(delete_request("/1", &TestUser::admin(ADMIN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let deleted = body_json(response).await;
    assert_eq!(deleted["reason"], "Admin role grants full access");
}

#[tokio::test]
async fn delete_unknown_appointment_is_404() {
    let (_dir, _state, app) = test_app().await;

    let response = app
        .oneshot(delete_request("/99", &TestUser::admin(ADMIN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==============================================================================
// COMPLETE
// ==============================================================================

#[tokio::test]
async fn completing_writes_attendance_and_clinical_record_once() {
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;
    let professional = TestUser::professional(PROFESSIONAL);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/1/complete", &professional, json!({"notes": "ok"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let completed = body_json(response).await;
    assert_eq!(completed["attendance"]["appointment_id"], 1);
    assert_eq!(completed["attendance"]["notes"], "ok");

    let appointments: Vec<Appointment> = state.store.load(Collection::Appointments).await;
    assert_eq!(appointments[0].status, AppointmentStatus::Completed);

    let attendances: Vec<AttendanceRecord> = state.store.load(Collection::Attendances).await;
    assert_eq!(attendances.len(), 1);
    assert_eq!(attendances[0].appointment_id, 1);
    assert_eq!(attendances[0].patient_id, PATIENT_ANA);

    let records: Vec<ClinicalRecordEntry> = state.store.load(Collection::Records).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].appointment_id, 1);
    assert_eq!(records[0].description, "ok");
    assert_eq!(records[0].timestamp, attendances[0].timestamp);

    let notifications: Vec<NotificationRecord> =
        state.store.load(Collection::Notifications).await;
    assert!(notifications
        .iter()
        .any(|n| n.recipient_id == PATIENT_ANA && n.message == "Atendimento realizado"));

    // Completing twice is an invalid transition; nothing new is written.
    let response = app
        .oneshot(json_request("POST", "/1/complete", &professional, json!({"notes": "de novo"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let attendances: Vec<AttendanceRecord> = state.store.load(Collection::Attendances).await;
    assert_eq!(attendances.len(), 1);
}

#[tokio::test]
async fn complete_requires_notes_even_for_unknown_ids() {
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;
    let professional = TestUser::professional(PROFESSIONAL);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/1/complete", &professional, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Notes are validated before the lookup.
    let response = app
        .oneshot(json_request("POST", "/99/complete", &professional, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn complete_is_gated_to_staff_and_the_owning_professional() {
    let (_dir, state, app) = test_app().await;
    seed_one_scheduled(&state).await;

    // Patients never reach the handler.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/1/complete",
            &TestUser::patient(PATIENT_ANA),
            json!({"notes": "ok"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Another professional passes the role guard but fails ownership.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/1/complete",
            &TestUser::professional(77),
            json!({"notes": "ok"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admins pass the guard but are still bound to the ownership rule.
    let response = app
        .oneshot(json_request(
            "POST",
            "/1/complete",
            &TestUser::admin(ADMIN),
            json!({"notes": "ok"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn complete_unknown_appointment_is_404() {
    let (_dir, _state, app) = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/99/complete",
            &TestUser::professional(PROFESSIONAL),
            json!({"notes": "ok"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==============================================================================
// END-TO-END WALKTHROUGH
// ==============================================================================

#[tokio::test]
async fn schedule_complete_then_delete_walkthrough() {
    let (_dir, _state, app) = test_app().await;
    let ana = TestUser::patient(PATIENT_ANA);
    let professional = TestUser::professional(PROFESSIONAL);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/", &ana, create_body(9)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["appointment"]["status"], "SCHEDULED");

    // Same professional, same slot: taken.
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", &ana, create_body(9)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/1/complete", &professional, json!({"notes": "ok"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(delete_request("/1", &ana))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
