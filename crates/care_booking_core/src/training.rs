//! crates/care_booking_core/src/training.rs
//!
//! The training-resource browser for caregivers.

use crate::domain::{Role, TrainingResource};
use crate::error::ServiceResult;
use crate::ports::DatabaseService;
use crate::session::Session;

/// The category value that disables filtering.
pub const ALL_CATEGORIES: &str = "all";

/// `all` followed by each distinct category in first-seen order.
pub fn categories(resources: &[TrainingResource]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for resource in resources {
        if !out.iter().any(|c| c == &resource.category) {
            out.push(resource.category.clone());
        }
    }
    out
}

/// Resources in `category`, or every resource for `None` / `all`.
pub fn filter_by_category(
    resources: Vec<TrainingResource>,
    category: Option<&str>,
) -> Vec<TrainingResource> {
    match category {
        None | Some(ALL_CATEGORIES) => resources,
        Some(category) => resources
            .into_iter()
            .filter(|r| r.category == category)
            .collect(),
    }
}

/// A page of the browser: the category list and the resources shown under it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCatalog {
    pub categories: Vec<String>,
    pub resources: Vec<TrainingResource>,
}

pub async fn browse_training(
    db: &dyn DatabaseService,
    session: &Session,
    category: Option<&str>,
) -> ServiceResult<TrainingCatalog> {
    session.require_role(Role::Caregiver)?;
    let resources = db.list_training_resources().await?;
    Ok(TrainingCatalog {
        categories: categories(&resources),
        resources: filter_by_category(resources, category),
    })
}
