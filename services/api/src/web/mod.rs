pub mod account;
pub mod auth;
pub mod bookings;
pub mod caregivers;
pub mod middleware;
pub mod notifications;
pub mod rest;
pub mod router;
pub mod state;
pub mod training;

pub use middleware::require_auth;
pub use router::build_router;
