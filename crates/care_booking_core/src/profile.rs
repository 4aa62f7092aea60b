//! crates/care_booking_core/src/profile.rs
//!
//! Profile editing: the caregiver profile editor and the contact details every
//! user can change on their own account.

use tracing::info;

use crate::domain::{CaregiverProfile, CaregiverProfileInput, Gender, Profile, ProfileUpdate, Role};
use crate::error::{ServiceError, ServiceResult};
use crate::ports::DatabaseService;
use crate::session::Session;

/// What the editor shows before a caregiver has saved anything.
pub fn default_caregiver_input() -> CaregiverProfileInput {
    CaregiverProfileInput {
        gender: Some(Gender::Female),
        age: Some(30),
        years_of_experience: 0,
        skills: Vec::new(),
        bio: None,
        hourly_rate: 50.0,
        is_available: true,
        certifications: Vec::new(),
    }
}

/// Trims entries, drops blanks and removes duplicates while keeping first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|seen| seen == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn normalize_caregiver_input(input: &CaregiverProfileInput) -> ServiceResult<CaregiverProfileInput> {
    if !input.hourly_rate.is_finite() || input.hourly_rate < 0.0 {
        return Err(ServiceError::Validation(
            "hourly rate must be zero or more".to_string(),
        ));
    }
    if input.years_of_experience < 0 {
        return Err(ServiceError::Validation(
            "years of experience cannot be negative".to_string(),
        ));
    }
    if let Some(age) = input.age {
        if !(0..=150).contains(&age) {
            return Err(ServiceError::Validation("age is out of range".to_string()));
        }
    }

    Ok(CaregiverProfileInput {
        skills: normalize_tags(&input.skills),
        certifications: normalize_tags(&input.certifications),
        bio: input
            .bio
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string),
        ..input.clone()
    })
}

/// The session caregiver's stored profile, if they have saved one.
pub async fn load_caregiver_profile(
    db: &dyn DatabaseService,
    session: &Session,
) -> ServiceResult<Option<CaregiverProfile>> {
    session.require_role(Role::Caregiver)?;
    Ok(db.find_caregiver_profile(session.user_id).await?)
}

/// Inserts or updates the session caregiver's profile.
pub async fn save_caregiver_profile(
    db: &dyn DatabaseService,
    session: &Session,
    input: &CaregiverProfileInput,
) -> ServiceResult<CaregiverProfile> {
    session.require_role(Role::Caregiver)?;
    let input = normalize_caregiver_input(input)?;

    let saved = match db.find_caregiver_profile(session.user_id).await? {
        Some(_) => db.update_caregiver_profile(session.user_id, &input).await?,
        None => db.insert_caregiver_profile(session.user_id, &input).await?,
    };
    info!(user_id = %session.user_id, "Caregiver profile saved");
    Ok(saved)
}

/// Updates the session user's own contact details.
pub async fn update_contact(
    db: &dyn DatabaseService,
    session: &Session,
    update: &ProfileUpdate,
) -> ServiceResult<Profile> {
    let full_name = update.full_name.trim();
    if full_name.is_empty() {
        return Err(ServiceError::Validation("full name is required".to_string()));
    }
    let blank_to_none = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let update = ProfileUpdate {
        full_name: full_name.to_string(),
        phone: blank_to_none(&update.phone),
        avatar_url: blank_to_none(&update.avatar_url),
    };
    Ok(db.update_profile(session.user_id, &update).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryDatabase;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn normalize_tags_trims_and_dedupes_in_order() {
        let out = normalize_tags(&tags(&[" Cooking", "", "Lifting ", "Cooking", "  "]));
        assert_eq!(out, tags(&["Cooking", "Lifting"]));
    }

    #[tokio::test]
    async fn first_save_inserts_then_updates() {
        let db = InMemoryDatabase::new();
        let caregiver = Session::from_profile(&db.seed_profile(Role::Caregiver, "Mei"));
        assert_eq!(load_caregiver_profile(&db, &caregiver).await.unwrap(), None);

        let mut input = default_caregiver_input();
        input.skills = tags(&["Dementia care", " Dementia care "]);
        let inserted = save_caregiver_profile(&db, &caregiver, &input).await.unwrap();
        assert_eq!(inserted.skills, tags(&["Dementia care"]));
        assert_eq!(inserted.hourly_rate, 50.0);

        input.hourly_rate = 65.0;
        let updated = save_caregiver_profile(&db, &caregiver, &input).await.unwrap();
        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.hourly_rate, 65.0);
    }

    #[tokio::test]
    async fn patients_cannot_edit_caregiver_profiles() {
        let db = InMemoryDatabase::new();
        let patient = Session::from_profile(&db.seed_profile(Role::Patient, "Ana"));
        let err = save_caregiver_profile(&db, &patient, &default_caregiver_input())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn negative_rate_is_rejected() {
        let db = InMemoryDatabase::new();
        let caregiver = Session::from_profile(&db.seed_profile(Role::Caregiver, "Mei"));
        let mut input = default_caregiver_input();
        input.hourly_rate = -5.0;
        let err = save_caregiver_profile(&db, &caregiver, &input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn contact_update_keeps_role_and_blanks_empty_fields() {
        let db = InMemoryDatabase::new();
        let profile = db.seed_profile(Role::Patient, "Ana");
        let session = Session::from_profile(&profile);

        let updated = update_contact(
            &db,
            &session,
            &ProfileUpdate {
                full_name: " Ana Silva ".to_string(),
                phone: Some("  ".to_string()),
                avatar_url: Some("https://img.example/ana.png".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.full_name, "Ana Silva");
        assert_eq!(updated.phone, None);
        assert_eq!(updated.role, Role::Patient);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let db = InMemoryDatabase::new();
        let session = Session::from_profile(&db.seed_profile(Role::Patient, "Ana"));
        let err = update_contact(
            &db,
            &session,
            &ProfileUpdate {
                full_name: " ".to_string(),
                phone: None,
                avatar_url: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
