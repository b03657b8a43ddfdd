//! API request/response models for courses.

use crate::db::models::courses::{CourseDBResponse, CourseUpdateDBRequest};
use crate::types::{CourseId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a course.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseCreate {
    #[serde(default)]
    #[schema(example = "Intro to Rust")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Ownership, borrowing and traits")]
    pub description: String,
    /// Optional free-text course material
    pub content: Option<String>,
}

/// Request body for updating a course. Absent or empty fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl From<CourseUpdate> for CourseUpdateDBRequest {
    fn from(update: CourseUpdate) -> Self {
        // An empty string means "not provided", so a field can be replaced but never cleared
        let present = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
        Self {
            title: present(update.title),
            description: present(update.description),
            content: present(update.content),
        }
    }
}

/// A course as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    /// Id of the owning instructor
    #[schema(value_type = String, format = "uuid")]
    pub instructor: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Whether the calling student is enrolled; only present in a student's catalogue listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enrolled: Option<bool>,
}

impl From<CourseDBResponse> for CourseResponse {
    fn from(db: CourseDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            description: db.description,
            content: db.content,
            instructor: db.instructor_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
            is_enrolled: None,
        }
    }
}

impl CourseResponse {
    pub fn with_enrollment(mut self, is_enrolled: bool) -> Self {
        self.is_enrolled = Some(is_enrolled);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseEnvelope {
    pub course: CourseResponse,
}

/// Response for create and update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseMutationResponse {
    pub message: String,
    pub course: CourseResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseListResponse {
    pub courses: Vec<CourseResponse>,
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_fields_are_absent() {
        let update = CourseUpdate {
            title: Some("New title".to_string()),
            description: Some("".to_string()),
            content: Some("   ".to_string()),
        };
        let db = CourseUpdateDBRequest::from(update);
        assert_eq!(db.title.as_deref(), Some("New title"));
        assert!(db.description.is_none());
        assert!(db.content.is_none());

        assert!(CourseUpdateDBRequest::from(CourseUpdate::default()).is_empty());
    }

    #[test]
    fn test_course_response_uses_camel_case() {
        let now = Utc::now();
        let response = CourseResponse::from(CourseDBResponse {
            id: uuid::Uuid::new_v4(),
            title: "Rust".to_string(),
            description: "Systems".to_string(),
            content: None,
            instructor_id: uuid::Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("instructor").is_some());
        assert!(json.get("isEnrolled").is_none());

        let json = serde_json::to_value(response.with_enrollment(true)).unwrap();
        assert_eq!(json["isEnrolled"], true);
    }
}
