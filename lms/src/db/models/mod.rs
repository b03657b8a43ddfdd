//! Database record models matching table schemas.
//!
//! These structs correspond to table rows (or join projections) and are
//! returned by every [`crate::db::Store`] implementation. They are distinct
//! from the API models so storage and wire representations can evolve
//! independently; handlers convert with `From` impls.
//!
//! - [`users`]: user accounts and credentials
//! - [`courses`]: courses and partial updates
//! - [`enrollments`]: enrollment rows and their joined projections

pub mod courses;
pub mod enrollments;
pub mod users;
