//! crates/care_booking_core/src/testing.rs
//!
//! An in-memory `DatabaseService` for tests. It mirrors the ordering, filtering and
//! constraint behaviour of the PostgreSQL adapter closely enough for workflow and
//! HTTP tests to run without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::{
    AuthSession, Booking, BookingStatus, BookingWithCounterpart, CaregiverListing, CaregiverProfile,
    CaregiverProfileInput, ContentType, NewBooking, NewNotification, NewReview, Notification,
    PaymentRecord, PaymentStatus, Profile, ProfileUpdate, Review, Role, TrainingResource,
    UserCredentials,
};
use crate::ports::{DatabaseService, PortError, PortResult};

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    auth_sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    profiles: HashMap<Uuid, Profile>,
    caregiver_profiles: Vec<CaregiverProfile>,
    bookings: Vec<Booking>,
    reviews: Vec<Review>,
    notifications: Vec<Notification>,
    training_resources: Vec<TrainingResource>,
    payment_records: Vec<PaymentRecord>,
}

#[derive(Default)]
pub struct InMemoryDatabase {
    tables: Mutex<Tables>,
    fail_notification_writes: Mutex<bool>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every subsequent `insert_notification` fail.
    pub fn fail_notification_writes(&self) {
        *self
            .fail_notification_writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = true;
    }

    pub fn seed_profile(&self, role: Role, full_name: &str) -> Profile {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            role,
            full_name: full_name.to_string(),
            phone: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        self.tables().profiles.insert(profile.id, profile.clone());
        profile
    }

    /// Seeds a caregiver account together with its caregiver profile.
    pub fn seed_caregiver(&self, full_name: &str, input: CaregiverProfileInput) -> CaregiverProfile {
        let profile = self.seed_profile(Role::Caregiver, full_name);
        let record = caregiver_from_input(profile.id, &input);
        self.tables().caregiver_profiles.push(record.clone());
        record
    }

    pub fn seed_booking(&self, booking: Booking) -> Booking {
        self.tables().bookings.push(booking.clone());
        booking
    }

    pub fn seed_training_resource(
        &self,
        title: &str,
        category: &str,
        content_type: ContentType,
        created_at: DateTime<Utc>,
    ) -> TrainingResource {
        let resource = TrainingResource {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("About {title}"),
            content_type,
            content_url: format!("https://training.example/{}", title.replace(' ', "-")),
            category: category.to_string(),
            created_at,
        };
        self.tables().training_resources.push(resource.clone());
        resource
    }

    pub fn seed_payment(&self, booking: &Booking, amount: f64, status: PaymentStatus) -> PaymentRecord {
        let record = PaymentRecord {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            patient_id: booking.patient_id,
            amount,
            payment_method: "card".to_string(),
            payment_status: status,
            transaction_id: None,
            created_at: Utc::now(),
        };
        self.tables().payment_records.push(record.clone());
        record
    }

    pub fn notifications_for(&self, user_id: Uuid) -> Vec<Notification> {
        self.tables()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn all_notifications(&self) -> Vec<Notification> {
        self.tables().notifications.clone()
    }

    pub fn all_bookings(&self) -> Vec<Booking> {
        self.tables().bookings.clone()
    }

    pub fn caregiver_profile_of(&self, user_id: Uuid) -> Option<CaregiverProfile> {
        self.tables()
            .caregiver_profiles
            .iter()
            .find(|c| c.user_id == user_id)
            .cloned()
    }
}

/// A booking row with sensible defaults, for seeding.
pub fn sample_booking(patient_id: Uuid, caregiver_id: Uuid, status: BookingStatus) -> Booking {
    let start_time = Utc::now();
    Booking {
        id: Uuid::new_v4(),
        patient_id,
        caregiver_id,
        service_type: "home care".to_string(),
        start_time,
        end_time: start_time + chrono::Duration::hours(4),
        total_hours: 4.0,
        hourly_rate: 50.0,
        total_cost: 200.0,
        status,
        special_requirements: None,
        address: "12 Harbour Road".to_string(),
        created_at: start_time,
        updated_at: start_time,
    }
}

/// A caregiver profile input with sensible defaults, for seeding.
pub fn sample_caregiver_input(skills: &[&str], hourly_rate: f64) -> CaregiverProfileInput {
    CaregiverProfileInput {
        gender: None,
        age: Some(35),
        years_of_experience: 5,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        bio: None,
        hourly_rate,
        is_available: true,
        certifications: Vec::new(),
    }
}

fn caregiver_from_input(user_id: Uuid, input: &CaregiverProfileInput) -> CaregiverProfile {
    let now = Utc::now();
    CaregiverProfile {
        id: Uuid::new_v4(),
        user_id,
        gender: input.gender,
        age: input.age,
        years_of_experience: input.years_of_experience,
        skills: input.skills.clone(),
        bio: input.bio.clone(),
        hourly_rate: input.hourly_rate,
        is_available: input.is_available,
        rating_average: 0.0,
        total_reviews: 0,
        certifications: input.certifications.clone(),
        created_at: now,
        updated_at: now,
    }
}

fn with_counterpart(
    tables: &Tables,
    booking: &Booking,
    counterpart_id: Uuid,
) -> BookingWithCounterpart {
    let counterpart = tables.profiles.get(&counterpart_id);
    BookingWithCounterpart {
        booking: booking.clone(),
        counterpart_name: counterpart.map(|p| p.full_name.clone()).unwrap_or_default(),
        counterpart_phone: counterpart.and_then(|p| p.phone.clone()),
    }
}

#[async_trait]
impl DatabaseService for InMemoryDatabase {
    async fn create_user_with_profile(
        &self,
        email: &str,
        hashed_password: &str,
        full_name: &str,
        role: Role,
    ) -> PortResult<Profile> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == email) {
            return Err(PortError::Conflict(format!("email {email} already registered")));
        }
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            role,
            full_name: full_name.to_string(),
            phone: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(UserCredentials {
            user_id: profile.id,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        });
        tables.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.tables()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {email} not found")))
    }

    async fn create_auth_session(&self, session: &AuthSession) -> PortResult<()> {
        self.tables()
            .auth_sessions
            .insert(session.id.clone(), (session.user_id, session.expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        match self.tables().auth_sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok(*user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.tables().auth_sessions.remove(session_id);
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        self.tables()
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Profile {user_id} not found")))
    }

    async fn update_profile(&self, user_id: Uuid, update: &ProfileUpdate) -> PortResult<Profile> {
        let mut tables = self.tables();
        let profile = tables
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("Profile {user_id} not found")))?;
        profile.full_name = update.full_name.clone();
        profile.phone = update.phone.clone();
        profile.avatar_url = update.avatar_url.clone();
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn list_caregivers(&self) -> PortResult<Vec<CaregiverListing>> {
        let tables = self.tables();
        let mut listings: Vec<CaregiverListing> = tables
            .caregiver_profiles
            .iter()
            .filter_map(|c| {
                tables.profiles.get(&c.user_id).map(|p| CaregiverListing {
                    profile: c.clone(),
                    full_name: p.full_name.clone(),
                    avatar_url: p.avatar_url.clone(),
                })
            })
            .collect();
        listings.sort_by(|a, b| b.profile.rating_average.total_cmp(&a.profile.rating_average));
        Ok(listings)
    }

    async fn find_caregiver_profile(&self, user_id: Uuid) -> PortResult<Option<CaregiverProfile>> {
        Ok(self.caregiver_profile_of(user_id))
    }

    async fn insert_caregiver_profile(
        &self,
        user_id: Uuid,
        input: &CaregiverProfileInput,
    ) -> PortResult<CaregiverProfile> {
        let mut tables = self.tables();
        if tables.caregiver_profiles.iter().any(|c| c.user_id == user_id) {
            return Err(PortError::Conflict(format!(
                "caregiver profile for {user_id} already exists"
            )));
        }
        let record = caregiver_from_input(user_id, input);
        tables.caregiver_profiles.push(record.clone());
        Ok(record)
    }

    async fn update_caregiver_profile(
        &self,
        user_id: Uuid,
        input: &CaregiverProfileInput,
    ) -> PortResult<CaregiverProfile> {
        let mut tables = self.tables();
        let record = tables
            .caregiver_profiles
            .iter_mut()
            .find(|c| c.user_id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("Caregiver profile {user_id} not found")))?;
        record.gender = input.gender;
        record.age = input.age;
        record.years_of_experience = input.years_of_experience;
        record.skills = input.skills.clone();
        record.bio = input.bio.clone();
        record.hourly_rate = input.hourly_rate;
        record.is_available = input.is_available;
        record.certifications = input.certifications.clone();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn insert_booking(&self, booking: &NewBooking) -> PortResult<Booking> {
        let now = Utc::now();
        let record = Booking {
            id: Uuid::new_v4(),
            patient_id: booking.patient_id,
            caregiver_id: booking.caregiver_id,
            service_type: booking.service_type.clone(),
            start_time: booking.start_time,
            end_time: booking.end_time,
            total_hours: booking.total_hours,
            hourly_rate: booking.hourly_rate,
            total_cost: booking.total_cost,
            status: BookingStatus::Pending,
            special_requirements: booking.special_requirements.clone(),
            address: booking.address.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables().bookings.push(record.clone());
        Ok(record)
    }

    async fn get_booking(&self, booking_id: Uuid) -> PortResult<Booking> {
        self.tables()
            .bookings
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Booking {booking_id} not found")))
    }

    async fn list_bookings_for_patient(
        &self,
        patient_id: Uuid,
    ) -> PortResult<Vec<BookingWithCounterpart>> {
        let tables = self.tables();
        let mut rows: Vec<BookingWithCounterpart> = tables
            .bookings
            .iter()
            .filter(|b| b.patient_id == patient_id)
            .map(|b| {
                let mut row = with_counterpart(&tables, b, b.caregiver_id);
                row.counterpart_phone = None;
                row
            })
            .collect();
        rows.sort_by(|a, b| b.booking.start_time.cmp(&a.booking.start_time));
        Ok(rows)
    }

    async fn list_bookings_for_caregiver(
        &self,
        caregiver_id: Uuid,
    ) -> PortResult<Vec<BookingWithCounterpart>> {
        let tables = self.tables();
        let mut rows: Vec<BookingWithCounterpart> = tables
            .bookings
            .iter()
            .filter(|b| b.caregiver_id == caregiver_id)
            .map(|b| with_counterpart(&tables, b, b.patient_id))
            .collect();
        rows.sort_by(|a, b| a.booking.start_time.cmp(&b.booking.start_time));
        Ok(rows)
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> PortResult<Booking> {
        let mut tables = self.tables();
        let booking = tables
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| PortError::NotFound(format!("Booking {booking_id} not found")))?;
        if booking.status != from {
            return Err(PortError::Conflict(format!(
                "booking {booking_id} is no longer {from}"
            )));
        }
        booking.status = to;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn insert_review(&self, review: &NewReview) -> PortResult<Review> {
        let mut tables = self.tables();
        if tables.reviews.iter().any(|r| r.booking_id == review.booking_id) {
            return Err(PortError::Conflict(format!(
                "booking {} already reviewed",
                review.booking_id
            )));
        }
        let record = Review {
            id: Uuid::new_v4(),
            booking_id: review.booking_id,
            caregiver_id: review.caregiver_id,
            patient_id: review.patient_id,
            rating: review.rating,
            comment: review.comment.clone(),
            created_at: Utc::now(),
        };
        tables.reviews.push(record.clone());

        let ratings: Vec<i32> = tables
            .reviews
            .iter()
            .filter(|r| r.caregiver_id == review.caregiver_id)
            .map(|r| r.rating)
            .collect();
        if let Some(caregiver) = tables
            .caregiver_profiles
            .iter_mut()
            .find(|c| c.user_id == review.caregiver_id)
        {
            caregiver.total_reviews = ratings.len() as i32;
            caregiver.rating_average =
                f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64;
        }
        Ok(record)
    }

    async fn find_review_for_booking(&self, booking_id: Uuid) -> PortResult<Option<Review>> {
        Ok(self
            .tables()
            .reviews
            .iter()
            .find(|r| r.booking_id == booking_id)
            .cloned())
    }

    async fn list_reviews_for_caregiver(&self, caregiver_id: Uuid) -> PortResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .tables()
            .reviews
            .iter()
            .filter(|r| r.caregiver_id == caregiver_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> PortResult<Notification> {
        if *self
            .fail_notification_writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
        {
            return Err(PortError::Unexpected("notifications unavailable".to_string()));
        }
        let record = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            title: notification.title.clone(),
            message: notification.message.clone(),
            kind: notification.kind,
            is_read: false,
            related_booking_id: notification.related_booking_id,
            created_at: Utc::now(),
        };
        self.tables().notifications.push(record.clone());
        Ok(record)
    }

    async fn list_notifications(&self, user_id: Uuid) -> PortResult<Vec<Notification>> {
        let mut rows = self.notifications_for(user_id);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_notification_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> PortResult<()> {
        let mut tables = self.tables();
        let notification = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.user_id == user_id)
            .ok_or_else(|| {
                PortError::NotFound(format!("Notification {notification_id} not found"))
            })?;
        notification.is_read = true;
        Ok(())
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> PortResult<u64> {
        let mut tables = self.tables();
        let mut updated = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn list_training_resources(&self) -> PortResult<Vec<TrainingResource>> {
        let mut resources = self.tables().training_resources.clone();
        resources.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(resources)
    }

    async fn list_payment_records(&self, patient_id: Uuid) -> PortResult<Vec<PaymentRecord>> {
        let mut records: Vec<PaymentRecord> = self
            .tables()
            .payment_records
            .iter()
            .filter(|p| p.patient_id == patient_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
