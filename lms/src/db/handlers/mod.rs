//! Repository implementations for database access.
//!
//! Each repository wraps a borrowed `PgConnection` (or transaction) and
//! returns models from [`crate::db::models`].
//!
//! - [`Users`]: accounts and credential lookup
//! - [`Courses`]: the course catalogue, implements [`Repository`]
//! - [`Enrollments`]: student/course pairs and their joined listings
//! - [`UsageCounters`]: per-API call counters
//!
//! ```ignore
//! use lms::db::handlers::{Courses, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Courses::new(&mut conn);
//!     let course = repo.get_by_id(uuid::Uuid::new_v4()).await?;
//!     Ok(())
//! }
//! ```

pub mod courses;
pub mod enrollments;
pub mod repository;
pub mod usage_counters;
pub mod users;

pub use courses::{CourseFilter, Courses};
pub use enrollments::Enrollments;
pub use repository::Repository;
pub use usage_counters::UsageCounters;
pub use users::Users;
