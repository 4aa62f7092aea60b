//! services/api/src/web/account.rs
//!
//! Endpoints about the signed-in account: dashboard tabs, contact details and payments.

use axum::{extract::State, http::StatusCode, Extension, Json};
use care_booking_core::{notification, profile, session, PaymentRecord, ProfileUpdate, Session};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::rest::{service_error_response, ProfileResponse};
use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub user_id: Uuid,
    pub full_name: String,
    pub role: String,
    /// Tabs to show, in display order.
    pub tabs: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(record: PaymentRecord) -> Self {
        Self {
            id: record.id,
            booking_id: record.booking_id,
            amount: record.amount,
            payment_method: record.payment_method,
            payment_status: record.payment_status.as_str().to_string(),
            transaction_id: record.transaction_id,
            created_at: record.created_at,
        }
    }
}

/// GET /me/dashboard - The tabs available to the caller's role
#[utoipa::path(
    get,
    path = "/me/dashboard",
    responses(
        (status = 200, description = "Dashboard for the caller's role", body = DashboardResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn dashboard_handler(Extension(session): Extension<Session>) -> Json<DashboardResponse> {
    Json(DashboardResponse {
        user_id: session.user_id,
        role: session.role.as_str().to_string(),
        tabs: session::dashboard_tabs(session.role)
            .iter()
            .map(|tab| tab.to_string())
            .collect(),
        full_name: session.full_name,
    })
}

/// PUT /me/profile - Update the caller's contact details
#[utoipa::path(
    put,
    path = "/me/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Full name is blank"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    let update = ProfileUpdate {
        full_name: req.full_name,
        phone: req.phone,
        avatar_url: req.avatar_url,
    };
    let profile = profile::update_contact(state.db.as_ref(), &session, &update)
        .await
        .map_err(|e| service_error_response("update profile", e))?;
    Ok(Json(profile.into()))
}

/// GET /payments - The calling patient's payment records, newest first
#[utoipa::path(
    get,
    path = "/payments",
    responses(
        (status = 200, description = "Payment records", body = [PaymentResponse]),
        (status = 403, description = "Caller is not a patient")
    )
)]
pub async fn list_payments_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<PaymentResponse>>, (StatusCode, String)> {
    let records = notification::payment_history(state.db.as_ref(), &session)
        .await
        .map_err(|e| service_error_response("load payments", e))?;
    Ok(Json(records.into_iter().map(PaymentResponse::from).collect()))
}
