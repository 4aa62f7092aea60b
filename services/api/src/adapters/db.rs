//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use care_booking_core::domain::{
    AuthSession, Booking, BookingStatus, BookingWithCounterpart, CaregiverListing,
    CaregiverProfile, CaregiverProfileInput, Gender, NewBooking, NewNotification, NewReview, Notification,
    PaymentRecord, Profile, ProfileUpdate, Review, Role, TrainingResource, UserCredentials,
};
use care_booking_core::ports::{DatabaseService, PortError, PortResult};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// Maps a sqlx error onto the port's error vocabulary.
fn port_error(e: sqlx::Error, what: impl FnOnce() -> String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what()),
        sqlx::Error::Database(ref db) if db.is_unique_violation() => PortError::Conflict(what()),
        other => PortError::Unexpected(other.to_string()),
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn parse_column<T>(value: &str) -> PortResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PortError::Unexpected(format!("corrupt row: {e}")))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const PROFILE_COLUMNS: &str = "id, role, full_name, phone, avatar_url, created_at, updated_at";

#[derive(FromRow)]
struct ProfileRecord {
    id: Uuid,
    role: String,
    full_name: String,
    phone: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ProfileRecord {
    fn to_domain(self) -> PortResult<Profile> {
        Ok(Profile {
            id: self.id,
            role: parse_column(&self.role)?,
            full_name: self.full_name,
            phone: self.phone,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    hashed_password: String,
}

const CAREGIVER_COLUMNS: &str = "c.id, c.user_id, c.gender, c.age, c.years_of_experience, \
    c.skills, c.bio, c.hourly_rate, c.is_available, c.rating_average, c.total_reviews, \
    c.certifications, c.created_at, c.updated_at";

#[derive(FromRow)]
struct CaregiverRecord {
    id: Uuid,
    user_id: Uuid,
    gender: Option<String>,
    age: Option<i32>,
    years_of_experience: i32,
    skills: Vec<String>,
    bio: Option<String>,
    hourly_rate: f64,
    is_available: bool,
    rating_average: f64,
    total_reviews: i32,
    certifications: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl CaregiverRecord {
    fn to_domain(self) -> PortResult<CaregiverProfile> {
        Ok(CaregiverProfile {
            id: self.id,
            user_id: self.user_id,
            gender: self
                .gender
                .as_deref()
                .map(parse_column::<Gender>)
                .transpose()?,
            age: self.age,
            years_of_experience: self.years_of_experience,
            skills: self.skills,
            bio: self.bio,
            hourly_rate: self.hourly_rate,
            is_available: self.is_available,
            rating_average: self.rating_average,
            total_reviews: self.total_reviews,
            certifications: self.certifications,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CaregiverListingRecord {
    #[sqlx(flatten)]
    caregiver: CaregiverRecord,
    full_name: String,
    avatar_url: Option<String>,
}
impl CaregiverListingRecord {
    fn to_domain(self) -> PortResult<CaregiverListing> {
        Ok(CaregiverListing {
            profile: self.caregiver.to_domain()?,
            full_name: self.full_name,
            avatar_url: self.avatar_url,
        })
    }
}

const BOOKING_COLUMNS: &str = "b.id, b.patient_id, b.caregiver_id, b.service_type, \
    b.start_time, b.end_time, b.total_hours, b.hourly_rate, b.total_cost, b.status, \
    b.special_requirements, b.address, b.created_at, b.updated_at";

#[derive(FromRow)]
struct BookingRecord {
    id: Uuid,
    patient_id: Uuid,
    caregiver_id: Uuid,
    service_type: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    total_hours: f64,
    hourly_rate: f64,
    total_cost: f64,
    status: String,
    special_requirements: Option<String>,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl BookingRecord {
    fn to_domain(self) -> PortResult<Booking> {
        Ok(Booking {
            id: self.id,
            patient_id: self.patient_id,
            caregiver_id: self.caregiver_id,
            service_type: self.service_type,
            start_time: self.start_time,
            end_time: self.end_time,
            total_hours: self.total_hours,
            hourly_rate: self.hourly_rate,
            total_cost: self.total_cost,
            status: parse_column(&self.status)?,
            special_requirements: self.special_requirements,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct BookingListRecord {
    #[sqlx(flatten)]
    booking: BookingRecord,
    counterpart_name: String,
    counterpart_phone: Option<String>,
}
impl BookingListRecord {
    fn to_domain(self) -> PortResult<BookingWithCounterpart> {
        Ok(BookingWithCounterpart {
            booking: self.booking.to_domain()?,
            counterpart_name: self.counterpart_name,
            counterpart_phone: self.counterpart_phone,
        })
    }
}

const REVIEW_COLUMNS: &str =
    "id, booking_id, caregiver_id, patient_id, rating, comment, created_at";

#[derive(FromRow)]
struct ReviewRecord {
    id: Uuid,
    booking_id: Uuid,
    caregiver_id: Uuid,
    patient_id: Uuid,
    rating: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}
impl ReviewRecord {
    fn to_domain(self) -> Review {
        Review {
            id: self.id,
            booking_id: self.booking_id,
            caregiver_id: self.caregiver_id,
            patient_id: self.patient_id,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, message, type AS kind, is_read, related_booking_id, created_at";

#[derive(FromRow)]
struct NotificationRecord {
    id: Uuid,
    user_id: Uuid,
    title: String,
    message: String,
    kind: String,
    is_read: bool,
    related_booking_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}
impl NotificationRecord {
    fn to_domain(self) -> PortResult<Notification> {
        Ok(Notification {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            message: self.message,
            kind: parse_column(&self.kind)?,
            is_read: self.is_read,
            related_booking_id: self.related_booking_id,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct TrainingResourceRecord {
    id: Uuid,
    title: String,
    description: String,
    content_type: String,
    content_url: String,
    category: String,
    created_at: DateTime<Utc>,
}
impl TrainingResourceRecord {
    fn to_domain(self) -> PortResult<TrainingResource> {
        Ok(TrainingResource {
            id: self.id,
            title: self.title,
            description: self.description,
            content_type: parse_column(&self.content_type)?,
            content_url: self.content_url,
            category: self.category,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct PaymentRecordRow {
    id: Uuid,
    booking_id: Uuid,
    patient_id: Uuid,
    amount: f64,
    payment_method: String,
    payment_status: String,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
}
impl PaymentRecordRow {
    fn to_domain(self) -> PortResult<PaymentRecord> {
        Ok(PaymentRecord {
            id: self.id,
            booking_id: self.booking_id,
            patient_id: self.patient_id,
            amount: self.amount,
            payment_method: self.payment_method,
            payment_status: parse_column(&self.payment_status)?,
            transaction_id: self.transaction_id,
            created_at: self.created_at,
        })
    }
}

fn collect<R, T>(records: Vec<R>, to_domain: impl Fn(R) -> PortResult<T>) -> PortResult<Vec<T>> {
    records.into_iter().map(to_domain).collect()
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user_with_profile(
        &self,
        email: &str,
        hashed_password: &str,
        full_name: &str,
        role: Role,
    ) -> PortResult<Profile> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (email, hashed_password) VALUES ($1, $2) RETURNING id",
        )
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| port_error(e, || format!("email {email} already registered")))?;

        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "INSERT INTO profiles (id, role, full_name) VALUES ($1, $2, $3) RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(role.as_str())
        .bind(full_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        record.to_domain()
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, || format!("User {email} not found")))?;

        Ok(UserCredentials {
            user_id: record.id,
            email: record.email,
            hashed_password: record.hashed_password,
        })
    }

    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&session.id)
            .bind(session.user_id)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, || format!("Profile {user_id} not found")))?
        .to_domain()
    }

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> PortResult<Profile> {
        sqlx::query_as::<_, ProfileRecord>(&format!(
            "UPDATE profiles SET full_name = $2, phone = $3, avatar_url = $4, updated_at = now() \
             WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&update.full_name)
        .bind(&update.phone)
        .bind(&update.avatar_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, || format!("Profile {user_id} not found")))?
        .to_domain()
    }

    async fn list_caregivers(&self) -> PortResult<Vec<CaregiverListing>> {
        let records = sqlx::query_as::<_, CaregiverListingRecord>(&format!(
            "SELECT {CAREGIVER_COLUMNS}, p.full_name, p.avatar_url \
             FROM caregiver_profiles c JOIN profiles p ON p.id = c.user_id \
             ORDER BY c.rating_average DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        collect(records, CaregiverListingRecord::to_domain)
    }

    async fn find_caregiver_profile(&self, user_id: Uuid) -> PortResult<Option<CaregiverProfile>> {
        sqlx::query_as::<_, CaregiverRecord>(&format!(
            "SELECT {CAREGIVER_COLUMNS} FROM caregiver_profiles c WHERE c.user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(CaregiverRecord::to_domain)
        .transpose()
    }

    async fn insert_caregiver_profile(
        &self,
        user_id: Uuid,
        input: &CaregiverProfileInput,
    ) -> PortResult<CaregiverProfile> {
        sqlx::query_as::<_, CaregiverRecord>(&format!(
            "INSERT INTO caregiver_profiles AS c (user_id, gender, age, years_of_experience, \
             skills, bio, hourly_rate, is_available, certifications) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {CAREGIVER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(input.gender.map(|g| g.as_str()))
        .bind(input.age)
        .bind(input.years_of_experience)
        .bind(&input.skills)
        .bind(&input.bio)
        .bind(input.hourly_rate)
        .bind(input.is_available)
        .bind(&input.certifications)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, || format!("caregiver profile for {user_id} already exists")))?
        .to_domain()
    }

    async fn update_caregiver_profile(
        &self,
        user_id: Uuid,
        input: &CaregiverProfileInput,
    ) -> PortResult<CaregiverProfile> {
        sqlx::query_as::<_, CaregiverRecord>(&format!(
            "UPDATE caregiver_profiles AS c SET gender = $2, age = $3, years_of_experience = $4, \
             skills = $5, bio = $6, hourly_rate = $7, is_available = $8, certifications = $9, \
             updated_at = now() WHERE c.user_id = $1 RETURNING {CAREGIVER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(input.gender.map(|g| g.as_str()))
        .bind(input.age)
        .bind(input.years_of_experience)
        .bind(&input.skills)
        .bind(&input.bio)
        .bind(input.hourly_rate)
        .bind(input.is_available)
        .bind(&input.certifications)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, || format!("Caregiver profile {user_id} not found")))?
        .to_domain()
    }

    async fn insert_booking(&self, booking: &NewBooking) -> PortResult<Booking> {
        sqlx::query_as::<_, BookingRecord>(&format!(
            "INSERT INTO bookings AS b (patient_id, caregiver_id, service_type, start_time, \
             end_time, total_hours, hourly_rate, total_cost, status, special_requirements, address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking.patient_id)
        .bind(booking.caregiver_id)
        .bind(&booking.service_type)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.total_hours)
        .bind(booking.hourly_rate)
        .bind(booking.total_cost)
        .bind(BookingStatus::Pending.as_str())
        .bind(&booking.special_requirements)
        .bind(&booking.address)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain()
    }

    async fn get_booking(&self, booking_id: Uuid) -> PortResult<Booking> {
        sqlx::query_as::<_, BookingRecord>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = $1"
        ))
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, || format!("Booking {booking_id} not found")))?
        .to_domain()
    }

    async fn list_bookings_for_patient(
        &self,
        patient_id: Uuid,
    ) -> PortResult<Vec<BookingWithCounterpart>> {
        let records = sqlx::query_as::<_, BookingListRecord>(&format!(
            "SELECT {BOOKING_COLUMNS}, p.full_name AS counterpart_name, \
             NULL::TEXT AS counterpart_phone \
             FROM bookings b JOIN profiles p ON p.id = b.caregiver_id \
             WHERE b.patient_id = $1 ORDER BY b.start_time DESC"
        ))
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        collect(records, BookingListRecord::to_domain)
    }

    async fn list_bookings_for_caregiver(
        &self,
        caregiver_id: Uuid,
    ) -> PortResult<Vec<BookingWithCounterpart>> {
        let records = sqlx::query_as::<_, BookingListRecord>(&format!(
            "SELECT {BOOKING_COLUMNS}, p.full_name AS counterpart_name, \
             p.phone AS counterpart_phone \
             FROM bookings b JOIN profiles p ON p.id = b.patient_id \
             WHERE b.caregiver_id = $1 ORDER BY b.start_time ASC"
        ))
        .bind(caregiver_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        collect(records, BookingListRecord::to_domain)
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> PortResult<Booking> {
        let updated = sqlx::query_as::<_, BookingRecord>(&format!(
            "UPDATE bookings AS b SET status = $3, updated_at = now() \
             WHERE b.id = $1 AND b.status = $2 RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(booking_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        match updated {
            Some(record) => record.to_domain(),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM bookings WHERE id = $1)")
                        .bind(booking_id)
                        .fetch_one(&self.pool)
                        .await
                        .map_err(unexpected)?;
                if exists {
                    Err(PortError::Conflict(format!(
                        "booking {booking_id} is no longer {from}"
                    )))
                } else {
                    Err(PortError::NotFound(format!("Booking {booking_id} not found")))
                }
            }
        }
    }

    async fn insert_review(&self, review: &NewReview) -> PortResult<Review> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let record = sqlx::query_as::<_, ReviewRecord>(&format!(
            "INSERT INTO reviews (booking_id, caregiver_id, patient_id, rating, comment) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(review.booking_id)
        .bind(review.caregiver_id)
        .bind(review.patient_id)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| port_error(e, || format!("booking {} already reviewed", review.booking_id)))?;

        sqlx::query(
            "UPDATE caregiver_profiles SET \
             rating_average = (SELECT COALESCE(AVG(rating), 0)::FLOAT8 FROM reviews WHERE caregiver_id = $1), \
             total_reviews = (SELECT COUNT(*)::INT FROM reviews WHERE caregiver_id = $1), \
             updated_at = now() \
             WHERE user_id = $1",
        )
        .bind(review.caregiver_id)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn find_review_for_booking(&self, booking_id: Uuid) -> PortResult<Option<Review>> {
        let record = sqlx::query_as::<_, ReviewRecord>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.map(ReviewRecord::to_domain))
    }

    async fn list_reviews_for_caregiver(&self, caregiver_id: Uuid) -> PortResult<Vec<Review>> {
        let records = sqlx::query_as::<_, ReviewRecord>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE caregiver_id = $1 ORDER BY created_at DESC"
        ))
        .bind(caregiver_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(ReviewRecord::to_domain).collect())
    }

    async fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> PortResult<Notification> {
        sqlx::query_as::<_, NotificationRecord>(&format!(
            "INSERT INTO notifications (user_id, title, message, type, related_booking_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind.as_str())
        .bind(notification.related_booking_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain()
    }

    async fn list_notifications(&self, user_id: Uuid) -> PortResult<Vec<Notification>> {
        let records = sqlx::query_as::<_, NotificationRecord>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        collect(records, NotificationRecord::to_domain)
    }

    async fn mark_notification_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> PortResult<()> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(notification_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Notification {notification_id} not found"
            )));
        }
        Ok(())
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> PortResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(result.rows_affected())
    }

    async fn list_training_resources(&self) -> PortResult<Vec<TrainingResource>> {
        let records = sqlx::query_as::<_, TrainingResourceRecord>(
            "SELECT id, title, description, content_type, content_url, category, created_at \
             FROM training_resources ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        collect(records, TrainingResourceRecord::to_domain)
    }

    async fn list_payment_records(&self, patient_id: Uuid) -> PortResult<Vec<PaymentRecord>> {
        let records = sqlx::query_as::<_, PaymentRecordRow>(
            "SELECT id, booking_id, patient_id, amount, payment_method, payment_status, \
             transaction_id, created_at FROM payment_records WHERE patient_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        collect(records, PaymentRecordRow::to_domain)
    }
}
