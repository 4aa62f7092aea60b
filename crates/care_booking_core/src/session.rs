//! crates/care_booking_core/src/session.rs
//!
//! The signed-in user as seen by every workflow function. It is built once per
//! request from the auth session and the user's profile, then passed down by reference.

use uuid::Uuid;

use crate::domain::{Profile, Role};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    pub full_name: String,
}

impl Session {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            user_id: profile.id,
            role: profile.role,
            full_name: profile.full_name.clone(),
        }
    }

    /// Fails with `Forbidden` unless the session holds `role`.
    pub fn require_role(&self, role: Role) -> ServiceResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "only a {} may do this",
                role.as_str()
            )))
        }
    }
}

/// The dashboard tabs offered to each role, in display order.
pub fn dashboard_tabs(role: Role) -> &'static [&'static str] {
    match role {
        Role::Patient => &["search", "bookings", "notifications", "profile"],
        Role::Caregiver => &["bookings", "training", "profile"],
    }
}
