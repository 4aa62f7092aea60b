//! services/api/src/web/caregivers.rs
//!
//! Caregiver search, caregiver reviews and the caregiver's own profile editor.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use care_booking_core::{
    profile, review, search::{self, CaregiverFilter}, CaregiverListing, CaregiverProfile,
    CaregiverProfileInput, Gender, Review, Session,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::rest::{parse_text, service_error_response};
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Matched against the caregiver's name and skills.
    pub q: Option<String>,
    /// `male`, `female`, `other` or `all`.
    pub gender: Option<String>,
    /// Defaults to `true`.
    pub available_only: Option<bool>,
}

impl SearchQuery {
    fn into_filter(self) -> Result<CaregiverFilter, (StatusCode, String)> {
        let gender = match self.gender.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(value) => Some(parse_text::<Gender>(value)?),
        };
        Ok(CaregiverFilter {
            term: self.q.unwrap_or_default(),
            gender,
            available_only: self.available_only.unwrap_or(true),
        })
    }
}

#[derive(Serialize, ToSchema)]
pub struct CaregiverResponse {
    pub user_id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub years_of_experience: i32,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub hourly_rate: f64,
    pub is_available: bool,
    pub rating_average: f64,
    pub total_reviews: i32,
    pub certifications: Vec<String>,
}

impl From<CaregiverListing> for CaregiverResponse {
    fn from(listing: CaregiverListing) -> Self {
        let p = listing.profile;
        Self {
            user_id: p.user_id,
            full_name: listing.full_name,
            avatar_url: listing.avatar_url,
            gender: p.gender.map(|g| g.as_str().to_string()),
            age: p.age,
            years_of_experience: p.years_of_experience,
            skills: p.skills,
            bio: p.bio,
            hourly_rate: p.hourly_rate,
            is_available: p.is_available,
            rating_average: p.rating_average,
            total_reviews: p.total_reviews,
            certifications: p.certifications,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CaregiverProfileRequest {
    pub gender: Option<String>,
    pub age: Option<i32>,
    #[serde(default)]
    pub years_of_experience: i32,
    #[serde(default)]
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub hourly_rate: f64,
    pub is_available: bool,
    #[serde(default)]
    pub certifications: Vec<String>,
}

impl CaregiverProfileRequest {
    fn into_input(self) -> Result<CaregiverProfileInput, (StatusCode, String)> {
        let gender = match self.gender.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(parse_text::<Gender>(value)?),
        };
        Ok(CaregiverProfileInput {
            gender,
            age: self.age,
            years_of_experience: self.years_of_experience,
            skills: self.skills,
            bio: self.bio,
            hourly_rate: self.hourly_rate,
            is_available: self.is_available,
            certifications: self.certifications,
        })
    }
}

/// The editor's view of a caregiver profile. `saved` is false while the
/// defaults are shown for a caregiver who has not saved a profile yet.
#[derive(Serialize, ToSchema)]
pub struct CaregiverProfileResponse {
    pub saved: bool,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub years_of_experience: i32,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub hourly_rate: f64,
    pub is_available: bool,
    pub certifications: Vec<String>,
    pub rating_average: f64,
    pub total_reviews: i32,
}

impl CaregiverProfileResponse {
    fn unsaved(input: CaregiverProfileInput) -> Self {
        Self {
            saved: false,
            gender: input.gender.map(|g| g.as_str().to_string()),
            age: input.age,
            years_of_experience: input.years_of_experience,
            skills: input.skills,
            bio: input.bio,
            hourly_rate: input.hourly_rate,
            is_available: input.is_available,
            certifications: input.certifications,
            rating_average: 0.0,
            total_reviews: 0,
        }
    }
}

impl From<CaregiverProfile> for CaregiverProfileResponse {
    fn from(p: CaregiverProfile) -> Self {
        Self {
            saved: true,
            gender: p.gender.map(|g| g.as_str().to_string()),
            age: p.age,
            years_of_experience: p.years_of_experience,
            skills: p.skills,
            bio: p.bio,
            hourly_rate: p.hourly_rate,
            is_available: p.is_available,
            certifications: p.certifications,
            rating_average: p.rating_average,
            total_reviews: p.total_reviews,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub caregiver_id: Uuid,
    pub patient_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            booking_id: review.booking_id,
            caregiver_id: review.caregiver_id,
            patient_id: review.patient_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /caregivers - Search caregivers, best rated first
#[utoipa::path(
    get,
    path = "/caregivers",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching caregivers", body = [CaregiverResponse]),
        (status = 400, description = "Unknown gender filter"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn search_caregivers_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CaregiverResponse>>, (StatusCode, String)> {
    let filter = query.into_filter()?;
    let listings = search::search_caregivers(state.db.as_ref(), &filter)
        .await
        .map_err(|e| service_error_response("search caregivers", e))?;
    Ok(Json(listings.into_iter().map(CaregiverResponse::from).collect()))
}

/// GET /caregivers/{user_id}/reviews - Reviews received by a caregiver, newest first
#[utoipa::path(
    get,
    path = "/caregivers/{user_id}/reviews",
    params(("user_id" = Uuid, Path, description = "The caregiver's user id.")),
    responses(
        (status = 200, description = "Reviews", body = [ReviewResponse]),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_reviews_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, (StatusCode, String)> {
    let reviews = review::list_reviews(state.db.as_ref(), user_id)
        .await
        .map_err(|e| service_error_response("load reviews", e))?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

/// GET /me/caregiver-profile - The caller's caregiver profile, or the editor defaults
#[utoipa::path(
    get,
    path = "/me/caregiver-profile",
    responses(
        (status = 200, description = "Stored profile or defaults", body = CaregiverProfileResponse),
        (status = 403, description = "Caller is not a caregiver")
    )
)]
pub async fn get_caregiver_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<CaregiverProfileResponse>, (StatusCode, String)> {
    let stored = profile::load_caregiver_profile(state.db.as_ref(), &session)
        .await
        .map_err(|e| service_error_response("load caregiver profile", e))?;
    let response = match stored {
        Some(p) => p.into(),
        None => CaregiverProfileResponse::unsaved(profile::default_caregiver_input()),
    };
    Ok(Json(response))
}

/// PUT /me/caregiver-profile - Create or update the caller's caregiver profile
#[utoipa::path(
    put,
    path = "/me/caregiver-profile",
    request_body = CaregiverProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = CaregiverProfileResponse),
        (status = 400, description = "Invalid profile"),
        (status = 403, description = "Caller is not a caregiver")
    )
)]
pub async fn save_caregiver_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(req): Json<CaregiverProfileRequest>,
) -> Result<Json<CaregiverProfileResponse>, (StatusCode, String)> {
    let input = req.into_input()?;
    let saved = profile::save_caregiver_profile(state.db.as_ref(), &session, &input)
        .await
        .map_err(|e| service_error_response("save caregiver profile", e))?;
    Ok(Json(saved.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_defaults_to_available_caregivers_of_any_gender() {
        let filter = SearchQuery {
            q: None,
            gender: Some("all".to_string()),
            available_only: None,
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter, CaregiverFilter::default());
    }

    #[test]
    fn unknown_gender_is_a_bad_request() {
        let err = SearchQuery {
            q: Some("nurse".to_string()),
            gender: Some("robot".to_string()),
            available_only: Some(false),
        }
        .into_filter()
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn defaults_are_reported_as_unsaved() {
        let response = CaregiverProfileResponse::unsaved(profile::default_caregiver_input());
        assert!(!response.saved);
        assert_eq!(response.gender.as_deref(), Some("female"));
        assert_eq!(response.hourly_rate, 50.0);
    }
}
