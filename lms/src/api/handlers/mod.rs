//! HTTP request handlers for all API endpoints.
//!
//! Each handler validates its input, resolves the caller through the
//! [`CurrentUser`](crate::api::models::users::CurrentUser) extractor, applies
//! the checks in [`crate::auth::permissions`] and then talks to the
//! [`Store`](crate::db::Store) held in [`AppState`](crate::AppState).
//!
//! # Handler Modules
//!
//! - [`users`]: registration and login
//! - [`courses`]: course CRUD and the role-dependent catalogue
//! - [`enrollments`]: enrolling and the two enrollment listings
//! - [`recommendations`]: AI course recommendations
//!
//! Handlers return [`crate::errors::Error`], which converts to the matching
//! status code and a `{"message": ...}` body.

pub mod courses;
pub mod enrollments;
pub mod recommendations;
pub mod users;

use crate::errors::Error;
use uuid::Uuid;

/// Parse a path segment as a UUID, mapping failure to `on_invalid`.
pub(crate) fn parse_id(raw: &str, on_invalid: impl FnOnce() -> Error) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| on_invalid())
}
