//! API request and response data models.
//!
//! These structures define the public JSON contract and are kept separate
//! from the database models in [`crate::db::models`]. Response bodies use
//! camelCase keys; every model is annotated with `utoipa` for the OpenAPI document.
//!
//! - [`users`]: roles, registration/login payloads and public profiles
//! - [`courses`]: course payloads and listings
//! - [`enrollments`]: enrollment records and the two joined listings
//! - [`recommendations`]: the prompt and the model's structured or fallback reply

pub mod courses;
pub mod enrollments;
pub mod recommendations;
pub mod users;
