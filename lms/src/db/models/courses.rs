//! Database models for courses.

use crate::types::{CourseId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new course
#[derive(Debug, Clone)]
pub struct CourseCreateDBRequest {
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub instructor_id: UserId,
}

/// Database request for updating a course. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseUpdateDBRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl CourseUpdateDBRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.content.is_none()
    }
}

/// Database response for a course
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CourseDBResponse {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub instructor_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
