//! API request/response models for enrollments.

use crate::db::models::enrollments::{CourseEnrollmentDBResponse, EnrollmentDBResponse, StudentEnrollmentDBResponse};
use crate::types::{CourseId, EnrollmentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: EnrollmentId,
    #[schema(value_type = String, format = "uuid")]
    pub student: UserId,
    #[schema(value_type = String, format = "uuid")]
    pub course: CourseId,
    pub enrolled_at: DateTime<Utc>,
    /// Completion percentage, 0-100
    pub progress: i32,
}

impl From<EnrollmentDBResponse> for EnrollmentResponse {
    fn from(db: EnrollmentDBResponse) -> Self {
        Self {
            id: db.id,
            student: db.student_id,
            course: db.course_id,
            enrolled_at: db.enrolled_at,
            progress: db.progress,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollResponse {
    pub message: String,
    pub enrollment: EnrollmentResponse,
}

/// One of the caller's enrolled courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    #[schema(value_type = String, format = "uuid")]
    pub course_id: CourseId,
    pub title: String,
    pub description: String,
    pub enrolled_at: DateTime<Utc>,
    pub progress: i32,
}

impl From<StudentEnrollmentDBResponse> for EnrolledCourse {
    fn from(db: StudentEnrollmentDBResponse) -> Self {
        Self {
            course_id: db.course_id,
            title: db.title,
            description: db.description,
            enrolled_at: db.enrolled_at,
            progress: db.progress,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrolledCoursesResponse {
    pub courses: Vec<EnrolledCourse>,
}

/// A student enrolled in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudent {
    #[schema(value_type = String, format = "uuid")]
    pub student_id: UserId,
    pub name: String,
    pub username: String,
    pub enrolled_at: DateTime<Utc>,
}

impl From<CourseEnrollmentDBResponse> for EnrolledStudent {
    fn from(db: CourseEnrollmentDBResponse) -> Self {
        Self {
            student_id: db.student_id,
            name: db.name,
            username: db.username,
            enrolled_at: db.enrolled_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrolledStudentsResponse {
    pub students: Vec<EnrolledStudent>,
}
