//! crates/care_booking_core/src/ports.rs
//!
//! Defines the service contract (trait) through which the core reaches the backend.
//! Every table read or write the application performs goes through `DatabaseService`,
//! so the core stays independent of the concrete store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AuthSession, Booking, BookingStatus, BookingWithCounterpart, CaregiverListing, CaregiverProfile,
    CaregiverProfileInput, NewBooking, NewNotification, NewReview, Notification, PaymentRecord,
    Profile, ProfileUpdate, Review, Role, TrainingResource, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflicting write: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Auth Methods ---
    /// Creates the credentials row and the matching profile in one step.
    async fn create_user_with_profile(
        &self,
        email: &str,
        hashed_password: &str,
        full_name: &str,
        role: Role,
    ) -> PortResult<Profile>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()>;

    /// Returns the owner of a live session. Expired or unknown ids are `Unauthorized`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Profiles ---
    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile>;

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> PortResult<Profile>;

    // --- Caregiver Profiles ---
    /// All caregiver profiles with their owner's name, best rated first.
    async fn list_caregivers(&self) -> PortResult<Vec<CaregiverListing>>;

    async fn find_caregiver_profile(&self, user_id: Uuid) -> PortResult<Option<CaregiverProfile>>;

    async fn insert_caregiver_profile(
        &self,
        user_id: Uuid,
        input: &CaregiverProfileInput,
    ) -> PortResult<CaregiverProfile>;

    async fn update_caregiver_profile(
        &self,
        user_id: Uuid,
        input: &CaregiverProfileInput,
    ) -> PortResult<CaregiverProfile>;

    // --- Bookings ---
    async fn insert_booking(&self, booking: &NewBooking) -> PortResult<Booking>;

    async fn get_booking(&self, booking_id: Uuid) -> PortResult<Booking>;

    /// A patient's bookings with the caregiver's name, latest start first.
    async fn list_bookings_for_patient(
        &self,
        patient_id: Uuid,
    ) -> PortResult<Vec<BookingWithCounterpart>>;

    /// A caregiver's bookings with the patient's name and phone, earliest start first.
    async fn list_bookings_for_caregiver(
        &self,
        caregiver_id: Uuid,
    ) -> PortResult<Vec<BookingWithCounterpart>>;

    /// Moves a booking from `from` to `to`.
    ///
    /// Fails with `Conflict` when the stored status is no longer `from`.
    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> PortResult<Booking>;

    // --- Reviews ---
    /// Inserts the review and refreshes the caregiver's rating aggregates.
    async fn insert_review(&self, review: &NewReview) -> PortResult<Review>;

    async fn find_review_for_booking(&self, booking_id: Uuid) -> PortResult<Option<Review>>;

    async fn list_reviews_for_caregiver(&self, caregiver_id: Uuid) -> PortResult<Vec<Review>>;

    // --- Notifications ---
    async fn insert_notification(&self, notification: &NewNotification)
        -> PortResult<Notification>;

    async fn list_notifications(&self, user_id: Uuid) -> PortResult<Vec<Notification>>;

    /// Marks one of the user's notifications as read. `NotFound` if it is not theirs.
    async fn mark_notification_read(&self, user_id: Uuid, notification_id: Uuid)
        -> PortResult<()>;

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> PortResult<u64>;

    // --- Training Resources & Payments ---
    /// Newest first.
    async fn list_training_resources(&self) -> PortResult<Vec<TrainingResource>>;

    async fn list_payment_records(&self, patient_id: Uuid) -> PortResult<Vec<PaymentRecord>>;
}
