//! services/api/src/web/router.rs
//!
//! Assembles the complete axum application: public auth routes, session-protected
//! routes, CORS, request tracing and the Swagger UI.

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    account, auth, bookings, caregivers, middleware::require_auth, notifications, rest::ApiDoc,
    state::AppState, training,
};

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);
    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
            layer
        }
    }
}

/// Builds the router for `state`. Everything except sign-up, login and logout
/// requires a valid session cookie.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/me/dashboard", get(account::dashboard_handler))
        .route("/me/profile", put(account::update_profile_handler))
        .route(
            "/me/caregiver-profile",
            get(caregivers::get_caregiver_profile_handler)
                .put(caregivers::save_caregiver_profile_handler),
        )
        .route("/payments", get(account::list_payments_handler))
        .route("/caregivers", get(caregivers::search_caregivers_handler))
        .route("/caregivers/{user_id}/reviews", get(caregivers::list_reviews_handler))
        .route(
            "/bookings",
            get(bookings::list_bookings_handler).post(bookings::create_booking_handler),
        )
        .route("/bookings/{id}/status", post(bookings::update_status_handler))
        .route("/bookings/{id}/review", post(bookings::submit_review_handler))
        .route("/notifications", get(notifications::list_notifications_handler))
        .route("/notifications/read-all", post(notifications::mark_all_read_handler))
        .route("/notifications/{id}/read", post(notifications::mark_read_handler))
        .route("/training-resources", get(training::list_training_handler))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors_layer(&state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
