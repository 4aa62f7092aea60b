//! services/api/src/web/notifications.rs
//!
//! The caller's notification inbox.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use care_booking_core::{notification, Notification, Session};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::rest::service_error_response;
use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    /// `booking`, `payment`, `review` or `system`.
    #[serde(rename = "type")]
    pub kind: String,
    pub is_read: bool,
    pub related_booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            kind: n.kind.as_str().to_string(),
            is_read: n.is_read,
            related_booking_id: n.related_booking_id,
            created_at: n.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct InboxResponse {
    pub unread: usize,
    pub notifications: Vec<NotificationResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// GET /notifications - The caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Inbox with unread count", body = InboxResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_notifications_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<InboxResponse>, (StatusCode, String)> {
    let inbox = notification::inbox(state.db.as_ref(), &session)
        .await
        .map_err(|e| service_error_response("load notifications", e))?;
    Ok(Json(InboxResponse {
        unread: inbox.unread,
        notifications: inbox
            .notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    }))
}

/// POST /notifications/{id}/read - Mark one of the caller's notifications as read
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "The notification id.")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 404, description = "No such notification for the caller")
    )
)]
pub async fn mark_read_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    notification::mark_read(state.db.as_ref(), &session, id)
        .await
        .map_err(|e| service_error_response("mark notification read", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /notifications/read-all - Mark every notification of the caller as read
#[utoipa::path(
    post,
    path = "/notifications/read-all",
    responses(
        (status = 200, description = "Number of notifications changed", body = MarkAllReadResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn mark_all_read_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<MarkAllReadResponse>, (StatusCode, String)> {
    let updated = notification::mark_all_read(state.db.as_ref(), &session)
        .await
        .map_err(|e| service_error_response("mark notifications read", e))?;
    Ok(Json(MarkAllReadResponse { updated }))
}
