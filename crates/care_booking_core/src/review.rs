//! crates/care_booking_core/src/review.rs
//!
//! Review submission. A patient rates a completed booking once.

use tracing::info;
use uuid::Uuid;

use crate::domain::{BookingStatus, NewReview, Review, Role};
use crate::error::{ServiceError, ServiceResult};
use crate::ports::DatabaseService;
use crate::session::Session;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Records the session patient's review of `booking_id`.
///
/// The booking is re-read so the review always carries its stored caregiver.
pub async fn submit_review(
    db: &dyn DatabaseService,
    session: &Session,
    booking_id: Uuid,
    rating: i32,
    comment: Option<String>,
) -> ServiceResult<Review> {
    session.require_role(Role::Patient)?;

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ServiceError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    let booking = db.get_booking(booking_id).await?;
    if booking.patient_id != session.user_id {
        return Err(ServiceError::Forbidden(format!(
            "booking {booking_id} belongs to someone else"
        )));
    }
    if booking.status != BookingStatus::Completed {
        return Err(ServiceError::Conflict(format!(
            "booking {booking_id} is {} and cannot be reviewed yet",
            booking.status
        )));
    }
    if db.find_review_for_booking(booking_id).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "booking {booking_id} has already been reviewed"
        )));
    }

    let review = db
        .insert_review(&NewReview {
            booking_id,
            caregiver_id: booking.caregiver_id,
            patient_id: session.user_id,
            rating,
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
        .await?;
    info!(booking_id = %booking_id, rating, "Review submitted");

    Ok(review)
}

pub async fn list_reviews(db: &dyn DatabaseService, caregiver_id: Uuid) -> ServiceResult<Vec<Review>> {
    Ok(db.list_reviews_for_caregiver(caregiver_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Booking;
    use crate::testing::{sample_booking, sample_caregiver_input, InMemoryDatabase};

    struct Fixture {
        db: InMemoryDatabase,
        patient: Session,
        caregiver_id: Uuid,
    }

    fn fixture() -> Fixture {
        let db = InMemoryDatabase::new();
        let caregiver = db.seed_caregiver("Mei", sample_caregiver_input(&[], 50.0));
        let patient = db.seed_profile(Role::Patient, "Ana");
        Fixture {
            patient: Session::from_profile(&patient),
            caregiver_id: caregiver.user_id,
            db,
        }
    }

    fn completed_booking(f: &Fixture) -> Booking {
        f.db.seed_booking(sample_booking(
            f.patient.user_id,
            f.caregiver_id,
            BookingStatus::Completed,
        ))
    }

    #[tokio::test]
    async fn review_uses_the_stored_caregiver_and_updates_rating() {
        let f = fixture();
        let booking = completed_booking(&f);

        let review = submit_review(&f.db, &f.patient, booking.id, 4, Some(" kind ".to_string()))
            .await
            .unwrap();
        assert_eq!(review.caregiver_id, booking.caregiver_id);
        assert_eq!(review.comment.as_deref(), Some("kind"));

        let caregiver = f.db.caregiver_profile_of(f.caregiver_id).unwrap();
        assert_eq!(caregiver.total_reviews, 1);
        assert_eq!(caregiver.rating_average, 4.0);
    }

    #[tokio::test]
    async fn second_review_for_same_booking_is_rejected() {
        let f = fixture();
        let booking = completed_booking(&f);
        submit_review(&f.db, &f.patient, booking.id, 5, None).await.unwrap();

        let err = submit_review(&f.db, &f.patient, booking.id, 3, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(list_reviews(&f.db, f.caregiver_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rating_outside_one_to_five_is_rejected() {
        let f = fixture();
        let booking = completed_booking(&f);
        for rating in [0, 6, -1] {
            let err = submit_review(&f.db, &f.patient, booking.id, rating, None)
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn unfinished_booking_cannot_be_reviewed() {
        let f = fixture();
        let booking = f.db.seed_booking(sample_booking(
            f.patient.user_id,
            f.caregiver_id,
            BookingStatus::Confirmed,
        ));
        let err = submit_review(&f.db, &f.patient, booking.id, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn only_the_booking_patient_may_review() {
        let f = fixture();
        let booking = completed_booking(&f);
        let stranger = Session::from_profile(&f.db.seed_profile(Role::Patient, "Eve"));

        let err = submit_review(&f.db, &stranger, booking.id, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let f = fixture();
        let err = submit_review(&f.db, &f.patient, Uuid::new_v4(), 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
