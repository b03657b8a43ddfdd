//! Database layer for data persistence and access.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │    Store    │  (Arc<dyn Store>: PgStore or InMemoryStore)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries against one table each)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//! - [`postgres`]: [`Store`] backed by a connection pool
//! - [`in_memory`]: [`Store`] backed by process memory, for tests and local runs
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator:
//!
//! ```ignore
//! lms::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod in_memory;
pub mod models;
pub mod postgres;

use crate::types::{CourseId, UserId};
use errors::Result;
use handlers::CourseFilter;
use models::{
    courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest},
    enrollments::{CourseEnrollmentDBResponse, EnrollmentCreateDBRequest, EnrollmentDBResponse, StudentEnrollmentDBResponse},
    users::{UserCreateDBRequest, UserDBResponse},
};

pub use in_memory::InMemoryStore;
pub use postgres::PgStore;

/// Persistence operations the API depends on.
///
/// Implementations must enforce username uniqueness and `(student, course)`
/// uniqueness atomically, reporting both as [`errors::DbError::UniqueViolation`]
/// with the table set to `users` or `enrollments` respectively.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Insert a user. Fails with a unique violation on `users` if the username is taken.
    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserDBResponse>>;

    async fn create_course(&self, request: &CourseCreateDBRequest) -> Result<CourseDBResponse>;

    async fn get_course(&self, id: CourseId) -> Result<Option<CourseDBResponse>>;

    /// List courses, newest first.
    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<CourseDBResponse>>;

    /// Titles of every course, oldest first.
    async fn list_course_titles(&self) -> Result<Vec<String>>;

    /// Apply the non-`None` fields of `request`. Fails with `NotFound` if the course is gone.
    async fn update_course(&self, id: CourseId, request: &CourseUpdateDBRequest) -> Result<CourseDBResponse>;

    /// Delete a course and all enrollments referencing it. Returns false if nothing was deleted.
    async fn delete_course(&self, id: CourseId) -> Result<bool>;

    /// Insert an enrollment. Fails with a unique violation on `enrollments` for a repeat pair.
    async fn create_enrollment(&self, request: &EnrollmentCreateDBRequest) -> Result<EnrollmentDBResponse>;

    async fn get_enrollment(&self, student_id: UserId, course_id: CourseId) -> Result<Option<EnrollmentDBResponse>>;

    /// Course ids the student is enrolled in, whether or not the course still exists.
    async fn list_enrolled_course_ids(&self, student_id: UserId) -> Result<Vec<CourseId>>;

    /// The student's enrollments joined with their courses, newest first. Dangling rows are skipped.
    async fn list_enrollments_for_student(&self, student_id: UserId) -> Result<Vec<StudentEnrollmentDBResponse>>;

    /// A course's enrollments joined with their students, newest first.
    async fn list_enrollments_for_course(&self, course_id: CourseId) -> Result<Vec<CourseEnrollmentDBResponse>>;

    /// Bump the named usage counter and return its new value.
    async fn increment_usage(&self, api_name: &str) -> Result<i64>;
}
