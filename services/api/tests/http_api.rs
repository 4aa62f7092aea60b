//! Drives the full axum router against the in-memory database.

use api_lib::{
    config::Config,
    web::{build_router, state::AppState},
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use care_booking_core::{
    testing::{sample_booking, sample_caregiver_input, InMemoryDatabase},
    AuthSession, BookingStatus, ContentType, DatabaseService, Gender, PaymentStatus, Profile, Role,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    db: Arc<InMemoryDatabase>,
    router: Router,
}

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused/care".to_string()),
        "COOKIE_SECURE" => Some("false".to_string()),
        _ => None,
    })
    .unwrap()
}

fn app() -> TestApp {
    let db = Arc::new(InMemoryDatabase::new());
    let state = Arc::new(AppState::new(db.clone(), Arc::new(test_config())));
    TestApp {
        db,
        router: build_router(state),
    }
}

impl TestApp {
    /// Opens an auth session for `profile` and returns the matching `Cookie` header value.
    async fn cookie_for(&self, profile: &Profile) -> String {
        let session = AuthSession {
            id: Uuid::new_v4().to_string(),
            user_id: profile.id,
            expires_at: Utc::now() + Duration::days(1),
        };
        self.db.create_auth_session(&session).await.unwrap();
        format!("session={}", session.id)
    }

    async fn send(&self, method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, value) = self.send_raw(method, uri, cookie, body).await;
        (status, value)
    }

    async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, set_cookie, value)
    }
}

fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}

//=========================================================================================
// Authentication
//=========================================================================================

#[tokio::test]
async fn signup_login_and_logout_round_trip() {
    let app = app();
    let signup = json!({
        "email": "Jo@Example.com",
        "password": "correct horse",
        "full_name": "Jo Patient",
        "role": "patient"
    });

    let (status, set_cookie, body) = app.send_raw("POST", "/auth/signup", None, Some(signup.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "jo@example.com");
    assert_eq!(body["role"], "patient");
    let set_cookie = set_cookie.expect("signup sets the session cookie");
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = cookie_pair(&set_cookie);

    let (status, me) = app.send("GET", "/auth/me", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["full_name"], "Jo Patient");

    let (status, _) = app.send("POST", "/auth/signup", None, Some(signup)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "jo@example.com", "password": "wrong password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, set_cookie, body) = app
        .send_raw(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "jo@example.com", "password": "correct horse" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "patient");
    let second_cookie = cookie_pair(&set_cookie.unwrap());

    let (status, set_cookie, _) = app.send_raw("POST", "/auth/logout", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(set_cookie.unwrap().contains("Max-Age=0"));

    let (status, _) = app.send("GET", "/auth/me", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.send("GET", "/auth/me", Some(&second_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn signup_rejects_unknown_roles_and_short_passwords() {
    let app = app();
    let (status, _) = app
        .send(
            "POST",
            "/auth/signup",
            None,
            Some(json!({ "email": "a@b.c", "password": "long enough", "full_name": "A", "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            "/auth/signup",
            None,
            Some(json!({ "email": "a@b.c", "password": "123", "full_name": "A", "role": "patient" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_valid_session() {
    let app = app();
    let (status, _) = app.send("GET", "/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("GET", "/bookings", Some("session=forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let orphan = AuthSession {
        id: Uuid::new_v4().to_string(),
        user_id: Uuid::new_v4(),
        expires_at: Utc::now() + Duration::days(1),
    };
    app.db.create_auth_session(&orphan).await.unwrap();
    let cookie = format!("session={}", orphan.id);
    let (status, _) = app.send("GET", "/bookings", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_tabs_follow_the_role() {
    let app = app();
    let caregiver = app.db.seed_profile(Role::Caregiver, "Cara");
    let cookie = app.cookie_for(&caregiver).await;

    let (status, body) = app.send("GET", "/me/dashboard", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "caregiver");
    assert_eq!(body["tabs"], json!(["bookings", "training", "profile"]));
}

//=========================================================================================
// Bookings
//=========================================================================================

#[tokio::test]
async fn booking_request_is_priced_confirmed_and_notified() {
    let app = app();
    let caregiver = app
        .db
        .seed_caregiver("Cara Giver", sample_caregiver_input(&["dementia care"], 40.0));
    let caregiver_profile = app.db.get_profile(caregiver.user_id).await.unwrap();
    let patient = app.db.seed_profile(Role::Patient, "Pat Ient");
    let patient_cookie = app.cookie_for(&patient).await;
    let caregiver_cookie = app.cookie_for(&caregiver_profile).await;

    let (status, created) = app
        .send(
            "POST",
            "/bookings",
            Some(&patient_cookie),
            Some(json!({
                "caregiver_id": caregiver.user_id,
                "service_type": "companionship",
                "start_time": "2026-11-02T09:00:00Z",
                "total_hours": 3.0,
                "address": "4 Mill Lane",
                "hourly_rate": 1.0
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["total_cost"], 120.0);
    assert_eq!(created["end_time"], "2026-11-02T12:00:00Z");
    let booking_id = created["id"].as_str().unwrap().to_string();

    let (status, listing) = app.send("GET", "/bookings", Some(&caregiver_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["pending"].as_array().unwrap().len(), 1);
    assert_eq!(listing["other"].as_array().unwrap().len(), 0);
    assert_eq!(listing["pending"][0]["counterpart_name"], "Pat Ient");

    let (status, updated) = app
        .send(
            "POST",
            &format!("/bookings/{booking_id}/status"),
            Some(&caregiver_cookie),
            Some(json!({ "status": "confirmed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "confirmed");

    let (status, inbox) = app.send("GET", "/notifications", Some(&patient_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox["unread"], 1);
    assert_eq!(inbox["notifications"][0]["title"], "Booking confirmed");
    assert_eq!(inbox["notifications"][0]["type"], "booking");
    assert_eq!(inbox["notifications"][0]["related_booking_id"], booking_id.as_str());

    let (status, caregiver_inbox) = app.send("GET", "/notifications", Some(&caregiver_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(caregiver_inbox["notifications"][0]["title"], "New booking request");

    let (status, patient_listing) = app.send("GET", "/bookings", Some(&patient_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(patient_listing.get("pending").is_none());
    assert_eq!(patient_listing["bookings"][0]["counterpart_name"], "Cara Giver");
}

#[tokio::test]
async fn booking_rules_surface_as_client_errors() {
    let app = app();
    let caregiver = app.db.seed_profile(Role::Caregiver, "Cara");
    let patient = app.db.seed_profile(Role::Patient, "Pat");
    let booking = app
        .db
        .seed_booking(sample_booking(patient.id, caregiver.id, BookingStatus::Pending));
    let patient_cookie = app.cookie_for(&patient).await;
    let caregiver_cookie = app.cookie_for(&caregiver).await;
    let status_uri = format!("/bookings/{}/status", booking.id);

    let (status, _) = app
        .send("POST", &status_uri, Some(&patient_cookie), Some(json!({ "status": "confirmed" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("POST", &status_uri, Some(&caregiver_cookie), Some(json!({ "status": "completed" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send("POST", &status_uri, Some(&caregiver_cookie), Some(json!({ "status": "finished" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            &format!("/bookings/{}/status", Uuid::new_v4()),
            Some(&caregiver_cookie),
            Some(json!({ "status": "confirmed" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Caregivers cannot book.
    let (status, _) = app
        .send(
            "POST",
            "/bookings",
            Some(&caregiver_cookie),
            Some(json!({
                "caregiver_id": caregiver.id,
                "service_type": "care",
                "start_time": "2026-11-02T09:00:00Z",
                "total_hours": 2.0,
                "address": "Somewhere"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("POST", &status_uri, Some(&patient_cookie), Some(json!({ "status": "cancelled" })))
        .await;
    assert_eq!(status, StatusCode::OK);
}

//=========================================================================================
// Reviews
//=========================================================================================

#[tokio::test]
async fn completed_booking_can_be_reviewed_once() {
    let app = app();
    let caregiver = app.db.seed_caregiver("Cara", sample_caregiver_input(&["nursing"], 30.0));
    let patient = app.db.seed_profile(Role::Patient, "Pat");
    let booking = app
        .db
        .seed_booking(sample_booking(patient.id, caregiver.user_id, BookingStatus::Completed));
    let cookie = app.cookie_for(&patient).await;
    let review_uri = format!("/bookings/{}/review", booking.id);

    let (status, _) = app
        .send("POST", &review_uri, Some(&cookie), Some(json!({ "rating": 9 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, review) = app
        .send("POST", &review_uri, Some(&cookie), Some(json!({ "rating": 4, "comment": " Kind " })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(review["caregiver_id"], caregiver.user_id.to_string());
    assert_eq!(review["comment"], "Kind");

    let (status, _) = app
        .send("POST", &review_uri, Some(&cookie), Some(json!({ "rating": 5 })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, reviews) = app
        .send("GET", &format!("/caregivers/{}/reviews", caregiver.user_id), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 1);

    let stored = app.db.caregiver_profile_of(caregiver.user_id).unwrap();
    assert_eq!(stored.total_reviews, 1);
    assert_eq!(stored.rating_average, 4.0);
}

//=========================================================================================
// Search, profile editor, training, payments
//=========================================================================================

#[tokio::test]
async fn caregiver_search_filters_by_term_and_gender() {
    let app = app();
    let mut dementia = sample_caregiver_input(&["Dementia care"], 35.0);
    dementia.gender = Some(Gender::Male);
    app.db.seed_caregiver("Sam Carer", dementia);
    app.db.seed_caregiver("Alex Helper", sample_caregiver_input(&["cooking"], 25.0));
    let mut away = sample_caregiver_input(&["dementia support"], 30.0);
    away.is_available = false;
    app.db.seed_caregiver("Robin Away", away);
    let patient = app.db.seed_profile(Role::Patient, "Pat");
    let cookie = app.cookie_for(&patient).await;

    let (status, all) = app.send("GET", "/caregivers", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, found) = app.send("GET", "/caregivers?q=DEMENTIA", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["full_name"], "Sam Carer");

    let (status, found) = app
        .send("GET", "/caregivers?q=dementia&available_only=false", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (status, found) = app.send("GET", "/caregivers?gender=male", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, _) = app.send("GET", "/caregivers?gender=robot", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn caregiver_profile_editor_starts_from_defaults_and_upserts() {
    let app = app();
    let caregiver = app.db.seed_profile(Role::Caregiver, "Cara");
    let patient = app.db.seed_profile(Role::Patient, "Pat");
    let cookie = app.cookie_for(&caregiver).await;

    let (status, form) = app.send("GET", "/me/caregiver-profile", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["saved"], false);
    assert_eq!(form["hourly_rate"], 50.0);

    let (status, saved) = app
        .send(
            "PUT",
            "/me/caregiver-profile",
            Some(&cookie),
            Some(json!({
                "gender": "other",
                "age": 41,
                "years_of_experience": 12,
                "skills": [" first aid ", "first aid", ""],
                "hourly_rate": 45.5,
                "is_available": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["saved"], true);
    assert_eq!(saved["skills"], json!(["first aid"]));

    let (status, _) = app
        .send(
            "PUT",
            "/me/caregiver-profile",
            Some(&cookie),
            Some(json!({ "hourly_rate": 60.0, "is_available": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let stored = app.db.caregiver_profile_of(caregiver.id).unwrap();
    assert_eq!(stored.hourly_rate, 60.0);
    assert!(!stored.is_available);

    let (status, _) = app
        .send(
            "PUT",
            "/me/caregiver-profile",
            Some(&cookie),
            Some(json!({ "hourly_rate": -1.0, "is_available": true })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let patient_cookie = app.cookie_for(&patient).await;
    let (status, _) = app.send("GET", "/me/caregiver-profile", Some(&patient_cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn contact_details_update_keeps_the_role() {
    let app = app();
    let patient = app.db.seed_profile(Role::Patient, "Pat");
    let cookie = app.cookie_for(&patient).await;

    let (status, updated) = app
        .send(
            "PUT",
            "/me/profile",
            Some(&cookie),
            Some(json!({ "full_name": " Patricia ", "phone": "555-0101", "role": "caregiver" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["full_name"], "Patricia");
    assert_eq!(updated["role"], "patient");

    let (status, _) = app
        .send("PUT", "/me/profile", Some(&cookie), Some(json!({ "full_name": "  " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn training_browser_is_for_caregivers() {
    let app = app();
    let now = Utc::now();
    app.db
        .seed_training_resource("Safe lifting", "mobility", ContentType::Video, now - Duration::days(2));
    app.db
        .seed_training_resource("Medication basics", "health", ContentType::Document, now);
    let caregiver = app.db.seed_profile(Role::Caregiver, "Cara");
    let patient = app.db.seed_profile(Role::Patient, "Pat");
    let cookie = app.cookie_for(&caregiver).await;

    let (status, catalog) = app.send("GET", "/training-resources", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(catalog["categories"], json!(["all", "health", "mobility"]));
    assert_eq!(catalog["resources"][0]["title"], "Medication basics");

    let (status, catalog) = app
        .send("GET", "/training-resources?category=mobility", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(catalog["resources"].as_array().unwrap().len(), 1);
    assert_eq!(catalog["resources"][0]["content_type"], "video");

    let patient_cookie = app.cookie_for(&patient).await;
    let (status, _) = app.send("GET", "/training-resources", Some(&patient_cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn notifications_can_be_marked_read() {
    let app = app();
    let caregiver = app.db.seed_profile(Role::Caregiver, "Cara");
    let patient = app.db.seed_profile(Role::Patient, "Pat");
    let booking = app
        .db
        .seed_booking(sample_booking(patient.id, caregiver.id, BookingStatus::Pending));
    let caregiver_cookie = app.cookie_for(&caregiver).await;
    let patient_cookie = app.cookie_for(&patient).await;

    for status in ["confirmed", "in_progress"] {
        let (code, _) = app
            .send(
                "POST",
                &format!("/bookings/{}/status", booking.id),
                Some(&caregiver_cookie),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(code, StatusCode::OK);
    }

    let (_, inbox) = app.send("GET", "/notifications", Some(&patient_cookie), None).await;
    assert_eq!(inbox["unread"], 2);
    let first = inbox["notifications"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send("POST", &format!("/notifications/{first}/read"), Some(&caregiver_cookie), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send("POST", &format!("/notifications/{first}/read"), Some(&patient_cookie), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send("POST", "/notifications/read-all", Some(&patient_cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, inbox) = app.send("GET", "/notifications", Some(&patient_cookie), None).await;
    assert_eq!(inbox["unread"], 0);
}

#[tokio::test]
async fn payments_are_listed_for_the_owning_patient() {
    let app = app();
    let caregiver = app.db.seed_profile(Role::Caregiver, "Cara");
    let patient = app.db.seed_profile(Role::Patient, "Pat");
    let booking = app
        .db
        .seed_booking(sample_booking(patient.id, caregiver.id, BookingStatus::Completed));
    app.db
        .seed_payment(&booking, 200.0, PaymentStatus::Completed);
    let cookie = app.cookie_for(&patient).await;

    let (status, payments) = app.send("GET", "/payments", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payments[0]["amount"], 200.0);
    assert_eq!(payments[0]["payment_status"], "completed");

    let caregiver_cookie = app.cookie_for(&caregiver).await;
    let (status, _) = app.send("GET", "/payments", Some(&caregiver_cookie), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let (status, doc) = app.send("GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/bookings/{id}/review"].is_object());
}
