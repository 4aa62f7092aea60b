//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, plus the pieces shared
//! by every REST handler: error mapping, enum parsing and the profile payload.

use axum::http::StatusCode;
use care_booking_core::{ParseEnumError, Profile, ServiceError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::{account, auth, bookings, caregivers, notifications, training};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        account::dashboard_handler,
        account::update_profile_handler,
        account::list_payments_handler,
        caregivers::search_caregivers_handler,
        caregivers::list_reviews_handler,
        caregivers::get_caregiver_profile_handler,
        caregivers::save_caregiver_profile_handler,
        bookings::create_booking_handler,
        bookings::list_bookings_handler,
        bookings::update_status_handler,
        bookings::submit_review_handler,
        notifications::list_notifications_handler,
        notifications::mark_read_handler,
        notifications::mark_all_read_handler,
        training::list_training_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            ProfileResponse,
            account::DashboardResponse,
            account::UpdateProfileRequest,
            account::PaymentResponse,
            caregivers::CaregiverResponse,
            caregivers::CaregiverProfileRequest,
            caregivers::CaregiverProfileResponse,
            caregivers::ReviewResponse,
            bookings::CreateBookingRequest,
            bookings::BookingResponse,
            bookings::BookingListResponse,
            bookings::StatusChangeRequest,
            bookings::ReviewRequest,
            notifications::NotificationResponse,
            notifications::InboxResponse,
            notifications::MarkAllReadResponse,
            training::TrainingResourceResponse,
            training::TrainingCatalogResponse,
        )
    ),
    tags(
        (name = "Care Booking API", description = "Booking caregivers, managing bookings and caregiver profiles.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Shared Payloads
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub role: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            role: profile.role.as_str().to_string(),
            full_name: profile.full_name,
            phone: profile.phone,
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Maps a workflow error onto the HTTP status and message returned to the client.
///
/// Backend failures are logged with `context` and reported as a generic 500.
pub fn service_error_response(context: &str, err: ServiceError) -> (StatusCode, String) {
    match err {
        ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        ServiceError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        err @ ServiceError::InvalidTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        ServiceError::Port(care_booking_core::PortError::Unauthorized) => {
            (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
        }
        ServiceError::Port(e) => {
            error!("Failed to {}: {:?}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Operation failed".to_string())
        }
    }
}

/// Parses one of the text-backed enums sent by the client, rejecting unknown values with 400.
pub fn parse_text<T>(value: &str) -> Result<T, (StatusCode, String)>
where
    T: FromStr<Err = ParseEnumError>,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}
