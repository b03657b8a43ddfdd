//! Database repository for enrollments.
//!
//! `enrollments.course_id` carries no foreign key, so rows may outlive their
//! course. The joined listings use inner joins and therefore never return such rows.

use crate::db::{
    errors::Result,
    models::enrollments::{
        CourseEnrollmentDBResponse, EnrollmentCreateDBRequest, EnrollmentDBResponse, StudentEnrollmentDBResponse,
    },
};
use crate::types::{CourseId, UserId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

const ENROLLMENT_COLUMNS: &str = "id, student_id, course_id, enrolled_at, progress";

pub struct Enrollments<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Enrollments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Record an enrollment. A repeat pair surfaces as a unique violation on `enrollments`.
    #[instrument(skip(self, request), fields(student_id = %abbrev_uuid(&request.student_id), course_id = %abbrev_uuid(&request.course_id)), err)]
    pub async fn create(&mut self, request: &EnrollmentCreateDBRequest) -> Result<EnrollmentDBResponse> {
        let enrollment = sqlx::query_as::<_, EnrollmentDBResponse>(&format!(
            "INSERT INTO enrollments (id, student_id, course_id) VALUES ($1, $2, $3) RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(request.student_id)
        .bind(request.course_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(enrollment)
    }

    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id), course_id = %abbrev_uuid(&course_id)), err)]
    pub async fn get(&mut self, student_id: UserId, course_id: CourseId) -> Result<Option<EnrollmentDBResponse>> {
        let enrollment = sqlx::query_as::<_, EnrollmentDBResponse>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE student_id = $1 AND course_id = $2"
        ))
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(enrollment)
    }

    /// Ids of every course the student is enrolled in, including dangling ones.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn list_course_ids(&mut self, student_id: UserId) -> Result<Vec<CourseId>> {
        let ids = sqlx::query_scalar::<_, CourseId>("SELECT course_id FROM enrollments WHERE student_id = $1")
            .bind(student_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(ids)
    }

    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn list_for_student(&mut self, student_id: UserId) -> Result<Vec<StudentEnrollmentDBResponse>> {
        let rows = sqlx::query_as::<_, StudentEnrollmentDBResponse>(
            r#"
            SELECT e.course_id, c.title, c.description, e.enrolled_at, e.progress
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            WHERE e.student_id = $1
            ORDER BY e.enrolled_at DESC, e.id DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }

    #[instrument(skip(self), fields(course_id = %abbrev_uuid(&course_id)), err)]
    pub async fn list_for_course(&mut self, course_id: CourseId) -> Result<Vec<CourseEnrollmentDBResponse>> {
        let rows = sqlx::query_as::<_, CourseEnrollmentDBResponse>(
            r#"
            SELECT e.student_id, u.name, u.username, e.enrolled_at
            FROM enrollments e
            JOIN users u ON u.id = e.student_id
            WHERE e.course_id = $1
            ORDER BY e.enrolled_at DESC, e.id DESC
            "#,
        )
        .bind(course_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }
}
