//! Database models for enrollments.

use crate::types::{CourseId, EnrollmentId, UserId};
use chrono::{DateTime, Utc};

/// Database request for enrolling a student in a course
#[derive(Debug, Clone)]
pub struct EnrollmentCreateDBRequest {
    pub student_id: UserId,
    pub course_id: CourseId,
}

/// Database response for an enrollment row
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EnrollmentDBResponse {
    pub id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
    pub progress: i32,
}

/// An enrollment joined with its course, as seen by the enrolled student.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StudentEnrollmentDBResponse {
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub enrolled_at: DateTime<Utc>,
    pub progress: i32,
}

/// An enrollment joined with its student, as listed for a course.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CourseEnrollmentDBResponse {
    pub student_id: UserId,
    pub name: String,
    pub username: String,
    pub enrolled_at: DateTime<Utc>,
}
