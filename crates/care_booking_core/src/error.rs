//! crates/care_booking_core/src/error.rs
//!
//! The error returned by the workflow functions of the core.

use crate::domain::BookingStatus;
use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The submitted data is unusable (blank fields, out-of-range numbers).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The session's user may not perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Booking cannot move from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// The write clashes with existing state (duplicate review, concurrent status change).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Port(PortError),
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => ServiceError::NotFound(what),
            PortError::Conflict(what) => ServiceError::Conflict(what),
            other => ServiceError::Port(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
