pub mod booking;
pub mod domain;
pub mod error;
pub mod notification;
pub mod ports;
pub mod profile;
pub mod review;
pub mod search;
pub mod session;
pub mod training;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use domain::{
    AuthSession, Booking, BookingStatus, BookingWithCounterpart, CaregiverListing,
    CaregiverProfile, CaregiverProfileInput, ContentType, Gender, NewBooking, NewNotification,
    NewReview, Notification, NotificationKind, ParseEnumError, PaymentRecord, PaymentStatus,
    Profile, ProfileUpdate, Review, Role, TrainingResource, UserCredentials,
};
pub use error::{ServiceError, ServiceResult};
pub use ports::{DatabaseService, PortError, PortResult};
pub use session::Session;
