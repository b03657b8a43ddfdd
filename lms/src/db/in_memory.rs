//! In-memory [`Store`] implementation.
//!
//! All tables live behind a single lock so the uniqueness checks and the
//! course-delete cascade happen atomically. Suitable for tests and local
//! runs; everything is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{
    Store,
    errors::{DbError, Result},
    handlers::CourseFilter,
    models::{
        courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest},
        enrollments::{CourseEnrollmentDBResponse, EnrollmentCreateDBRequest, EnrollmentDBResponse, StudentEnrollmentDBResponse},
        users::{UserCreateDBRequest, UserDBResponse},
    },
};
use crate::types::{CourseId, UserId};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, UserDBResponse>,
    // Insertion order doubles as creation order.
    courses: Vec<CourseDBResponse>,
    enrollments: Vec<EnrollmentDBResponse>,
    usage_counters: HashMap<String, i64>,
}

fn unique_violation(table: &str, constraint: &str) -> DbError {
    DbError::UniqueViolation {
        constraint: Some(constraint.to_string()),
        table: Some(table.to_string()),
        message: format!("duplicate key value violates unique constraint \"{constraint}\""),
    }
}

/// Process-local store. Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for InMemoryStore {
    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.username == request.username) {
            return Err(unique_violation("users", "users_username_key"));
        }

        let user = UserDBResponse {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            username: request.username.clone(),
            password_hash: request.password_hash.clone(),
            role: request.role,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserDBResponse>> {
        Ok(self.tables.read().users.values().find(|u| u.username == username).cloned())
    }

    async fn create_course(&self, request: &CourseCreateDBRequest) -> Result<CourseDBResponse> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&request.instructor_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: Some("courses_instructor_id_fkey".to_string()),
                table: Some("courses".to_string()),
                message: "instructor does not exist".to_string(),
            });
        }

        let now = Utc::now();
        let course = CourseDBResponse {
            id: Uuid::new_v4(),
            title: request.title.clone(),
            description: request.description.clone(),
            content: request.content.clone(),
            instructor_id: request.instructor_id,
            created_at: now,
            updated_at: now,
        };
        tables.courses.push(course.clone());
        Ok(course)
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<CourseDBResponse>> {
        Ok(self.tables.read().courses.iter().find(|c| c.id == id).cloned())
    }

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<CourseDBResponse>> {
        let tables = self.tables.read();
        Ok(tables
            .courses
            .iter()
            .rev()
            .filter(|c| filter.instructor_id.is_none_or(|id| c.instructor_id == id))
            .cloned()
            .collect())
    }

    async fn list_course_titles(&self) -> Result<Vec<String>> {
        Ok(self.tables.read().courses.iter().map(|c| c.title.clone()).collect())
    }

    async fn update_course(&self, id: CourseId, request: &CourseUpdateDBRequest) -> Result<CourseDBResponse> {
        let mut tables = self.tables.write();
        let course = tables.courses.iter_mut().find(|c| c.id == id).ok_or(DbError::NotFound)?;

        if let Some(title) = &request.title {
            course.title = title.clone();
        }
        if let Some(description) = &request.description {
            course.description = description.clone();
        }
        if let Some(content) = &request.content {
            course.content = Some(content.clone());
        }
        course.updated_at = Utc::now();

        Ok(course.clone())
    }

    async fn delete_course(&self, id: CourseId) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.courses.len();
        tables.courses.retain(|c| c.id != id);
        if tables.courses.len() == before {
            return Ok(false);
        }
        tables.enrollments.retain(|e| e.course_id != id);
        Ok(true)
    }

    async fn create_enrollment(&self, request: &EnrollmentCreateDBRequest) -> Result<EnrollmentDBResponse> {
        let mut tables = self.tables.write();
        // Unknown course ids are accepted
        if !tables.users.contains_key(&request.student_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: Some("enrollments_student_id_fkey".to_string()),
                table: Some("enrollments".to_string()),
                message: "student does not exist".to_string(),
            });
        }
        if tables
            .enrollments
            .iter()
            .any(|e| e.student_id == request.student_id && e.course_id == request.course_id)
        {
            return Err(unique_violation("enrollments", "enrollments_student_id_course_id_key"));
        }

        let enrollment = EnrollmentDBResponse {
            id: Uuid::new_v4(),
            student_id: request.student_id,
            course_id: request.course_id,
            enrolled_at: Utc::now(),
            progress: 0,
        };
        tables.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn get_enrollment(&self, student_id: UserId, course_id: CourseId) -> Result<Option<EnrollmentDBResponse>> {
        Ok(self
            .tables
            .read()
            .enrollments
            .iter()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned())
    }

    async fn list_enrolled_course_ids(&self, student_id: UserId) -> Result<Vec<CourseId>> {
        Ok(self
            .tables
            .read()
            .enrollments
            .iter()
            .filter(|e| e.student_id == student_id)
            .map(|e| e.course_id)
            .collect())
    }

    async fn list_enrollments_for_student(&self, student_id: UserId) -> Result<Vec<StudentEnrollmentDBResponse>> {
        let tables = self.tables.read();
        Ok(tables
            .enrollments
            .iter()
            .rev()
            .filter(|e| e.student_id == student_id)
            .filter_map(|e| {
                let course = tables.courses.iter().find(|c| c.id == e.course_id)?;
                Some(StudentEnrollmentDBResponse {
                    course_id: e.course_id,
                    title: course.title.clone(),
                    description: course.description.clone(),
                    enrolled_at: e.enrolled_at,
                    progress: e.progress,
                })
            })
            .collect())
    }

    async fn list_enrollments_for_course(&self, course_id: CourseId) -> Result<Vec<CourseEnrollmentDBResponse>> {
        let tables = self.tables.read();
        Ok(tables
            .enrollments
            .iter()
            .rev()
            .filter(|e| e.course_id == course_id)
            .filter_map(|e| {
                let student = tables.users.get(&e.student_id)?;
                Some(CourseEnrollmentDBResponse {
                    student_id: e.student_id,
                    name: student.name.clone(),
                    username: student.username.clone(),
                    enrolled_at: e.enrolled_at,
                })
            })
            .collect())
    }

    async fn increment_usage(&self, api_name: &str) -> Result<i64> {
        let mut tables = self.tables.write();
        let count = tables.usage_counters.entry(api_name.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }
}
