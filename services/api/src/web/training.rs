//! services/api/src/web/training.rs
//!
//! The training-resource browser for caregivers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use care_booking_core::{training, Session, TrainingResource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::rest::service_error_response;
use crate::web::state::AppState;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrainingQuery {
    /// A category name, or `all` for every resource.
    pub category: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TrainingResourceResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content_type: String,
    pub content_url: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<TrainingResource> for TrainingResourceResponse {
    fn from(r: TrainingResource) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            content_type: r.content_type.as_str().to_string(),
            content_url: r.content_url,
            category: r.category,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TrainingCatalogResponse {
    /// `all` first, then each category in first-seen order.
    pub categories: Vec<String>,
    pub resources: Vec<TrainingResourceResponse>,
}

/// GET /training-resources - Browse training material, newest first
#[utoipa::path(
    get,
    path = "/training-resources",
    params(TrainingQuery),
    responses(
        (status = 200, description = "Categories and matching resources", body = TrainingCatalogResponse),
        (status = 403, description = "Caller is not a caregiver")
    )
)]
pub async fn list_training_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(query): Query<TrainingQuery>,
) -> Result<Json<TrainingCatalogResponse>, (StatusCode, String)> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let catalog = training::browse_training(state.db.as_ref(), &session, category)
        .await
        .map_err(|e| service_error_response("load training resources", e))?;
    Ok(Json(TrainingCatalogResponse {
        categories: catalog.categories,
        resources: catalog
            .resources
            .into_iter()
            .map(TrainingResourceResponse::from)
            .collect(),
    }))
}
