//! crates/care_booking_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Text-backed Enumerations
//=========================================================================================

/// Returned when a stored or submitted string is not a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Declares an enum stored as lowercase text, with `as_str`, `Display` and `FromStr`.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum!(
    /// The role chosen at sign-up. It never changes afterwards.
    Role, "role", {
        Patient => "patient",
        Caregiver => "caregiver",
    }
);

text_enum!(Gender, "gender", {
    Male => "male",
    Female => "female",
    Other => "other",
});

text_enum!(
    /// Lifecycle of a booking. See `crate::booking` for the allowed transitions.
    BookingStatus, "booking status", {
        Pending => "pending",
        Confirmed => "confirmed",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

text_enum!(ContentType, "content type", {
    Video => "video",
    Article => "article",
    Document => "document",
});

text_enum!(NotificationKind, "notification type", {
    Booking => "booking",
    Payment => "payment",
    Review => "review",
    System => "system",
});

text_enum!(PaymentStatus, "payment status", {
    Pending => "pending",
    Completed => "completed",
    Failed => "failed",
    Refunded => "refunded",
});

//=========================================================================================
// Accounts
//=========================================================================================

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// The public profile every user has, keyed by the user id.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub role: Role,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable contact fields of a `Profile`. The role is deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

//=========================================================================================
// Caregivers
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CaregiverProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub years_of_experience: i32,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub hourly_rate: f64,
    pub is_available: bool,
    pub rating_average: f64,
    pub total_reviews: i32,
    pub certifications: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields a caregiver edits on their own profile.
///
/// Rating aggregates are maintained from the `reviews` table and are not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CaregiverProfileInput {
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub years_of_experience: i32,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub hourly_rate: f64,
    pub is_available: bool,
    pub certifications: Vec<String>,
}

/// A caregiver profile joined with the display fields of its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct CaregiverListing {
    pub profile: CaregiverProfile,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

//=========================================================================================
// Bookings
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub caregiver_id: Uuid,
    pub service_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub total_cost: f64,
    pub status: BookingStatus,
    pub special_requirements: Option<String>,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully priced booking ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub patient_id: Uuid,
    pub caregiver_id: Uuid,
    pub service_type: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_hours: f64,
    pub hourly_rate: f64,
    pub total_cost: f64,
    pub special_requirements: Option<String>,
    pub address: String,
}

/// A booking together with the display fields of the other party.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingWithCounterpart {
    pub booking: Booking,
    pub counterpart_name: String,
    pub counterpart_phone: Option<String>,
}

//=========================================================================================
// Reviews, Notifications, Training, Payments
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub caregiver_id: Uuid,
    pub patient_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub booking_id: Uuid,
    pub caregiver_id: Uuid,
    pub patient_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub related_booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub related_booking_id: Option<Uuid>,
}

/// Learning material for caregivers. Managed outside the application.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingResource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    pub content_url: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub patient_id: Uuid,
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
