//! Role and ownership checks.
//!
//! Both checks are pure functions over the already-authenticated caller; the
//! handlers call them in route order (role gate first, then lookup, then ownership).

use crate::{
    api::models::users::{CurrentUser, Role},
    db::models::courses::CourseDBResponse,
    errors::{Error, Result},
    types::{Operation, Resource},
};

/// Whether `user` holds exactly `role`.
pub fn has_role(user: &CurrentUser, role: Role) -> bool {
    user.role == role
}

/// Fail with `InsufficientPermissions` unless the caller holds `role`.
pub fn require_role(user: &CurrentUser, role: Role, action: Operation, resource: Resource) -> Result<()> {
    if has_role(user, role) {
        return Ok(());
    }

    let reason = match role {
        Role::Instructor => "Access denied. Only instructors have the permission.",
        Role::Student => "Access denied. Only students have the permission.",
    };
    Err(Error::InsufficientPermissions {
        action,
        resource,
        reason: reason.to_string(),
    })
}

/// Fail with `InsufficientPermissions` unless the caller authored `course`.
pub fn require_ownership(user: &CurrentUser, course: &CourseDBResponse, action: Operation) -> Result<()> {
    if course.instructor_id == user.id {
        return Ok(());
    }

    Err(Error::InsufficientPermissions {
        action,
        resource: Resource::Courses,
        reason: "You are not authorized to update this course".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> CurrentUser {
        CurrentUser { id: Uuid::new_v4(), role }
    }

    fn course_owned_by(instructor_id: Uuid) -> CourseDBResponse {
        CourseDBResponse {
            id: Uuid::new_v4(),
            title: "Rust".to_string(),
            description: "Systems programming".to_string(),
            content: None,
            instructor_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_role() {
        let instructor = user(Role::Instructor);
        let student = user(Role::Student);

        assert!(require_role(&instructor, Role::Instructor, Operation::Create, Resource::Courses).is_ok());

        let err = require_role(&student, Role::Instructor, Operation::Create, Resource::Courses).unwrap_err();
        assert_eq!(err.user_message(), "Access denied. Only instructors have the permission.");
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);

        assert!(require_role(&instructor, Role::Student, Operation::Create, Resource::Enrollments).is_err());
    }

    #[test]
    fn test_require_ownership() {
        let owner = user(Role::Instructor);
        let other = user(Role::Instructor);
        let course = course_owned_by(owner.id);

        assert!(require_ownership(&owner, &course, Operation::Update).is_ok());

        let err = require_ownership(&other, &course, Operation::Delete).unwrap_err();
        assert_eq!(err.user_message(), "You are not authorized to update this course");

        // A student sharing no id with the owner is rejected the same way
        assert!(require_ownership(&user(Role::Student), &course, Operation::Update).is_err());
    }
}
