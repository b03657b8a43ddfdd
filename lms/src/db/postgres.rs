//! [`Store`] implementation over a PostgreSQL pool.

use super::{
    Store,
    errors::Result,
    handlers::{CourseFilter, Courses, Enrollments, Repository, UsageCounters, Users},
    models::{
        courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest},
        enrollments::{CourseEnrollmentDBResponse, EnrollmentCreateDBRequest, EnrollmentDBResponse, StudentEnrollmentDBResponse},
        users::{UserCreateDBRequest, UserDBResponse},
    },
};
use crate::types::{CourseId, UserId};
use sqlx::PgPool;

/// Acquires a pooled connection per call and hands it to the matching repository.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).create(request).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_user_by_username(username).await
    }

    async fn create_course(&self, request: &CourseCreateDBRequest) -> Result<CourseDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Courses::new(&mut conn).create(request).await
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<CourseDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Courses::new(&mut conn).get_by_id(id).await
    }

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<CourseDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Courses::new(&mut conn).list(filter).await
    }

    async fn list_course_titles(&self) -> Result<Vec<String>> {
        let mut conn = self.pool.acquire().await?;
        Courses::new(&mut conn).list_titles().await
    }

    async fn update_course(&self, id: CourseId, request: &CourseUpdateDBRequest) -> Result<CourseDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Courses::new(&mut conn).update(id, request).await
    }

    async fn delete_course(&self, id: CourseId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        Courses::new(&mut conn).delete(id).await
    }

    async fn create_enrollment(&self, request: &EnrollmentCreateDBRequest) -> Result<EnrollmentDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Enrollments::new(&mut conn).create(request).await
    }

    async fn get_enrollment(&self, student_id: UserId, course_id: CourseId) -> Result<Option<EnrollmentDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Enrollments::new(&mut conn).get(student_id, course_id).await
    }

    async fn list_enrolled_course_ids(&self, student_id: UserId) -> Result<Vec<CourseId>> {
        let mut conn = self.pool.acquire().await?;
        Enrollments::new(&mut conn).list_course_ids(student_id).await
    }

    async fn list_enrollments_for_student(&self, student_id: UserId) -> Result<Vec<StudentEnrollmentDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Enrollments::new(&mut conn).list_for_student(student_id).await
    }

    async fn list_enrollments_for_course(&self, course_id: CourseId) -> Result<Vec<CourseEnrollmentDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Enrollments::new(&mut conn).list_for_course(course_id).await
    }

    async fn increment_usage(&self, api_name: &str) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        UsageCounters::new(&mut conn).increment(api_name).await
    }
}
