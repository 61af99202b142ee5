pub mod admins;
pub mod auth;
pub mod courses;
pub mod health;
pub mod instructors;
pub mod resource;
pub mod sponsors;
pub mod students;
pub mod users;

use crate::utils::ApiError;

/// Router fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no route for this path".into())
}

/// Router fallback for a known path hit with the wrong method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
