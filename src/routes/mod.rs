pub mod admin;

pub mod auth;

pub mod catalog;

pub mod enrollments;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use catalog::configure_catalog_routes;
pub use enrollments::configure_enrollment_routes;
