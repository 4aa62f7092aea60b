//! crates/care_booking_core/src/search.rs
//!
//! Caregiver search. The full caregiver list is fetched and filtered in memory.

use crate::domain::{CaregiverListing, Gender};
use crate::error::ServiceResult;
use crate::ports::DatabaseService;

#[derive(Debug, Clone, PartialEq)]
pub struct CaregiverFilter {
    /// Matched case-insensitively against the name and every skill. Empty matches all.
    pub term: String,
    /// `None` means any gender.
    pub gender: Option<Gender>,
    pub available_only: bool,
}

impl Default for CaregiverFilter {
    fn default() -> Self {
        Self {
            term: String::new(),
            gender: None,
            available_only: true,
        }
    }
}

impl CaregiverFilter {
    pub fn matches(&self, listing: &CaregiverListing) -> bool {
        let term = self.term.trim().to_lowercase();
        let matches_term = term.is_empty()
            || listing.full_name.to_lowercase().contains(&term)
            || listing
                .profile
                .skills
                .iter()
                .any(|skill| skill.to_lowercase().contains(&term));
        let matches_gender = self
            .gender
            .map_or(true, |gender| listing.profile.gender == Some(gender));
        let matches_availability = !self.available_only || listing.profile.is_available;

        matches_term && matches_gender && matches_availability
    }
}

/// Keeps the listings that match `filter`, preserving their order.
pub fn filter_caregivers(
    listings: Vec<CaregiverListing>,
    filter: &CaregiverFilter,
) -> Vec<CaregiverListing> {
    listings
        .into_iter()
        .filter(|listing| filter.matches(listing))
        .collect()
}

pub async fn search_caregivers(
    db: &dyn DatabaseService,
    filter: &CaregiverFilter,
) -> ServiceResult<Vec<CaregiverListing>> {
    let listings = db.list_caregivers().await?;
    Ok(filter_caregivers(listings, filter))
}
