//! services/api/src/web/bookings.rs
//!
//! Booking endpoints: creation by patients, role-aware listing, status changes and reviews.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use care_booking_core::{
    booking::{self, BookingRequest},
    review, Booking, BookingStatus, BookingWithCounterpart, Role, Session,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::caregivers::ReviewResponse;
use crate::web::rest::{parse_text, service_error_response};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// The caregiver's user id.
    pub caregiver_id: Uuid,
    pub service_type: String,
    pub start_time: DateTime<Utc>,
    pub total_hours: f64,
    pub address: String,
    pub special_requirements: Option<String>,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            caregiver_id: req.caregiver_id,
            service_type: req.service_type,
            start_time: req.start_time,
            total_hours: req.total_hours,
            address: req.address,
            special_requirements: req.special_requirements,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub caregiver_id: Uuid,
    pub service_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub total_cost: f64,
    pub status: String,
    pub special_requirements: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// The other party's name. Only set in listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterpart_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterpart_phone: Option<String>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            patient_id: b.patient_id,
            caregiver_id: b.caregiver_id,
            service_type: b.service_type,
            start_time: b.start_time,
            end_time: b.end_time,
            total_hours: b.total_hours,
            hourly_rate: b.hourly_rate,
            total_cost: b.total_cost,
            status: b.status.as_str().to_string(),
            special_requirements: b.special_requirements,
            address: b.address,
            created_at: b.created_at,
            updated_at: b.updated_at,
            counterpart_name: None,
            counterpart_phone: None,
        }
    }
}

impl From<BookingWithCounterpart> for BookingResponse {
    fn from(row: BookingWithCounterpart) -> Self {
        Self {
            counterpart_name: Some(row.counterpart_name),
            counterpart_phone: row.counterpart_phone,
            ..row.booking.into()
        }
    }
}

/// Patients get `bookings`, newest first. Caregivers additionally get the
/// `pending` requests split from every `other` booking, earliest first.
#[derive(Serialize, ToSchema)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<Vec<BookingResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<Vec<BookingResponse>>,
}

#[derive(Deserialize, ToSchema)]
pub struct StatusChangeRequest {
    /// One of `confirmed`, `in_progress`, `completed`, `cancelled`.
    pub status: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

fn to_responses(rows: Vec<BookingWithCounterpart>) -> Vec<BookingResponse> {
    rows.into_iter().map(BookingResponse::from).collect()
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /bookings - Request a caregiver
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created as pending", body = BookingResponse),
        (status = 400, description = "Invalid booking request"),
        (status = 403, description = "Caller is not a patient"),
        (status = 404, description = "Caregiver not found")
    )
)]
pub async fn create_booking_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let request = BookingRequest::from(req);
    let created = booking::create_booking(state.db.as_ref(), &session, &request)
        .await
        .map_err(|e| service_error_response("create booking", e))?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(created))))
}

/// GET /bookings - The caller's bookings
#[utoipa::path(
    get,
    path = "/bookings",
    responses(
        (status = 200, description = "Bookings of the caller", body = BookingListResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_bookings_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<BookingListResponse>, (StatusCode, String)> {
    let rows = booking::list_bookings(state.db.as_ref(), &session)
        .await
        .map_err(|e| service_error_response("load bookings", e))?;

    let response = match session.role {
        Role::Patient => BookingListResponse {
            bookings: to_responses(rows),
            pending: None,
            other: None,
        },
        Role::Caregiver => {
            let all = to_responses(rows.clone());
            let (pending, other) = booking::partition_pending(rows);
            BookingListResponse {
                bookings: all,
                pending: Some(to_responses(pending)),
                other: Some(to_responses(other)),
            }
        }
    };
    Ok(Json(response))
}

/// POST /bookings/{id}/status - Move a booking along its lifecycle
#[utoipa::path(
    post,
    path = "/bookings/{id}/status",
    params(("id" = Uuid, Path, description = "The booking id.")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = BookingResponse),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Caller may not make this change"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Transition not allowed or booking changed meanwhile")
    )
)]
pub async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<BookingResponse>, (StatusCode, String)> {
    let target = parse_text::<BookingStatus>(&req.status)?;
    let updated = booking::transition_booking(state.db.as_ref(), &session, id, target)
        .await
        .map_err(|e| service_error_response("update booking status", e))?;
    Ok(Json(updated.into()))
}

/// POST /bookings/{id}/review - Review a completed booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/review",
    params(("id" = Uuid, Path, description = "The booking id.")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review recorded", body = ReviewResponse),
        (status = 400, description = "Rating out of range"),
        (status = 403, description = "Caller is not the booking's patient"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking not completed or already reviewed")
    )
)]
pub async fn submit_review_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let saved = review::submit_review(state.db.as_ref(), &session, id, req.rating, req.comment)
        .await
        .map_err(|e| service_error_response("submit review", e))?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(saved))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use care_booking_core::testing::sample_booking;

    #[test]
    fn listing_rows_carry_the_counterpart() {
        let booking = sample_booking(Uuid::new_v4(), Uuid::new_v4(), BookingStatus::InProgress);
        let response = BookingResponse::from(BookingWithCounterpart {
            booking,
            counterpart_name: "Ada".to_string(),
            counterpart_phone: Some("555-0100".to_string()),
        });
        assert_eq!(response.status, "in_progress");
        assert_eq!(response.counterpart_name.as_deref(), Some("Ada"));
        assert_eq!(response.total_cost, 200.0);
    }

    #[test]
    fn bare_booking_omits_counterpart_fields() {
        let booking = sample_booking(Uuid::new_v4(), Uuid::new_v4(), BookingStatus::Pending);
        let json = serde_json::to_value(BookingResponse::from(booking)).unwrap();
        assert!(json.get("counterpart_name").is_none());
        assert_eq!(json["status"], "pending");
    }
}
