//! crates/care_booking_core/src/booking.rs
//!
//! The booking lifecycle: pricing a request, creating the booking, listing it for
//! either party and moving it through its status graph.
//!
//! ```text
//! pending ──► confirmed ──► in_progress ──► completed
//!    │            │
//!    └──► cancelled ◄┘
//! ```

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    Booking, BookingStatus, BookingWithCounterpart, NewBooking, NewNotification,
    NotificationKind, Role,
};
use crate::error::{ServiceError, ServiceResult};
use crate::ports::DatabaseService;
use crate::session::Session;

//=========================================================================================
// Status Graph
//=========================================================================================

impl BookingStatus {
    /// Whether the graph has an edge from `self` to `next`.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

/// Whether `role` may move a booking it is party to from `from` to `to`.
///
/// Caregivers drive the whole lifecycle. Patients may only withdraw a booking
/// that has not started.
pub fn may_transition(role: Role, from: BookingStatus, to: BookingStatus) -> bool {
    if !from.can_transition_to(to) {
        return false;
    }
    match role {
        Role::Caregiver => true,
        Role::Patient => to == BookingStatus::Cancelled,
    }
}

//=========================================================================================
// Pricing and Requests
//=========================================================================================

/// Total price of `hours` at `hourly_rate`, rounded to cents.
pub fn total_cost(hours: f64, hourly_rate: f64) -> f64 {
    (hours * hourly_rate * 100.0).round() / 100.0
}

/// Bookable hours: at least one hour, at most one week, in half-hour steps.
pub const MIN_HOURS: f64 = 1.0;
pub const MAX_HOURS: f64 = 168.0;
pub const HOURS_STEP: f64 = 0.5;

/// What a patient submits when booking a caregiver.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    /// The caregiver's user (profile) id.
    pub caregiver_id: Uuid,
    pub service_type: String,
    pub start_time: DateTime<Utc>,
    pub total_hours: f64,
    pub address: String,
    pub special_requirements: Option<String>,
}

impl BookingRequest {
    /// Validates the request and prices it at `hourly_rate`.
    pub fn price(&self, patient_id: Uuid, hourly_rate: f64) -> ServiceResult<NewBooking> {
        let service_type = self.service_type.trim();
        if service_type.is_empty() {
            return Err(ServiceError::Validation("service type is required".to_string()));
        }
        let address = self.address.trim();
        if address.is_empty() {
            return Err(ServiceError::Validation("address is required".to_string()));
        }
        if !self.total_hours.is_finite()
            || !(MIN_HOURS..=MAX_HOURS).contains(&self.total_hours)
            || (self.total_hours / HOURS_STEP).fract() != 0.0
        {
            return Err(ServiceError::Validation(format!(
                "total hours must be between {MIN_HOURS} and {MAX_HOURS} in steps of {HOURS_STEP}"
            )));
        }

        let end_time = Duration::try_seconds((self.total_hours * 3600.0).round() as i64)
            .and_then(|duration| self.start_time.checked_add_signed(duration))
            .ok_or_else(|| ServiceError::Validation("booking ends out of range".to_string()))?;
        let cost = total_cost(self.total_hours, hourly_rate);
        if !cost.is_finite() {
            return Err(ServiceError::Validation("total cost is out of range".to_string()));
        }

        let special_requirements = self
            .special_requirements
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(NewBooking {
            patient_id,
            caregiver_id: self.caregiver_id,
            service_type: service_type.to_string(),
            start_time: self.start_time,
            end_time,
            total_hours: self.total_hours,
            hourly_rate,
            total_cost: cost,
            special_requirements,
            address: address.to_string(),
        })
    }
}

//=========================================================================================
// Workflow
//=========================================================================================

/// Creates a pending booking for the session's patient and notifies the caregiver.
///
/// The hourly rate is read from the caregiver's stored profile, never from the client.
pub async fn create_booking(
    db: &dyn DatabaseService,
    session: &Session,
    request: &BookingRequest,
) -> ServiceResult<Booking> {
    session.require_role(Role::Patient)?;

    let caregiver = db
        .find_caregiver_profile(request.caregiver_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("caregiver {} not found", request.caregiver_id))
        })?;

    let new_booking = request.price(session.user_id, caregiver.hourly_rate)?;
    let booking = db.insert_booking(&new_booking).await?;
    info!(
        booking_id = %booking.id,
        patient_id = %booking.patient_id,
        caregiver_id = %booking.caregiver_id,
        total_cost = booking.total_cost,
        "Booking created"
    );

    let notice = NewNotification {
        user_id: booking.caregiver_id,
        title: "New booking request".to_string(),
        message: format!(
            "You have received a new booking request for {}",
            booking.start_time.format("%Y-%m-%d %H:%M")
        ),
        kind: NotificationKind::Booking,
        related_booking_id: Some(booking.id),
    };
    notify(db, &notice).await;

    Ok(booking)
}

/// Moves a booking to `target` on behalf of one of its two parties.
///
/// The counterpart is notified, addressed by their profile id.
pub async fn transition_booking(
    db: &dyn DatabaseService,
    session: &Session,
    booking_id: Uuid,
    target: BookingStatus,
) -> ServiceResult<Booking> {
    let booking = db.get_booking(booking_id).await?;

    let counterpart_id = match session.role {
        Role::Caregiver if booking.caregiver_id == session.user_id => booking.patient_id,
        Role::Patient if booking.patient_id == session.user_id => booking.caregiver_id,
        _ => {
            return Err(ServiceError::Forbidden(format!(
                "booking {booking_id} belongs to someone else"
            )))
        }
    };

    if !booking.status.can_transition_to(target) {
        return Err(ServiceError::InvalidTransition {
            from: booking.status,
            to: target,
        });
    }
    if !may_transition(session.role, booking.status, target) {
        return Err(ServiceError::Forbidden(format!(
            "a {} cannot move a booking to {}",
            session.role, target
        )));
    }

    let updated = db
        .update_booking_status(booking_id, booking.status, target)
        .await?;
    info!(
        booking_id = %booking_id,
        from = %booking.status,
        to = %target,
        by = %session.user_id,
        "Booking status changed"
    );

    notify(db, &status_notification(&updated, counterpart_id)).await;

    Ok(updated)
}

/// The notice sent to `recipient` after `booking` reached its current status.
pub fn status_notification(booking: &Booking, recipient: Uuid) -> NewNotification {
    let (title, message) = match booking.status {
        BookingStatus::Confirmed => (
            "Booking confirmed",
            "Your booking request has been confirmed",
        ),
        BookingStatus::Cancelled => (
            "Booking cancelled",
            "Your booking request has been cancelled",
        ),
        BookingStatus::InProgress => ("Service started", "Your booked service has started"),
        BookingStatus::Completed => (
            "Service completed",
            "Your booked service is complete",
        ),
        BookingStatus::Pending => ("Booking pending", "Your booking is awaiting confirmation"),
    };
    NewNotification {
        user_id: recipient,
        title: title.to_string(),
        message: message.to_string(),
        kind: NotificationKind::Booking,
        related_booking_id: Some(booking.id),
    }
}

/// Notification writes are best effort: a failure is logged and swallowed.
async fn notify(db: &dyn DatabaseService, notice: &NewNotification) {
    if let Err(e) = db.insert_notification(notice).await {
        warn!(user_id = %notice.user_id, "Failed to create notification: {:?}", e);
    }
}

//=========================================================================================
// Listing
//=========================================================================================

/// The session user's bookings. Patients see newest first, caregivers earliest first.
pub async fn list_bookings(
    db: &dyn DatabaseService,
    session: &Session,
) -> ServiceResult<Vec<BookingWithCounterpart>> {
    let rows = match session.role {
        Role::Patient => db.list_bookings_for_patient(session.user_id).await?,
        Role::Caregiver => db.list_bookings_for_caregiver(session.user_id).await?,
    };
    Ok(rows)
}

/// Splits bookings into (`pending`, everything else), keeping order within each part.
pub fn partition_pending(
    rows: Vec<BookingWithCounterpart>,
) -> (Vec<BookingWithCounterpart>, Vec<BookingWithCounterpart>) {
    rows.into_iter()
        .partition(|row| row.booking.status == BookingStatus::Pending)
}
