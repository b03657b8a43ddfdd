use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::collections::HashSet;

use super::parse_id;
use crate::{
    AppState,
    api::models::{
        courses::{CourseCreate, CourseEnvelope, CourseListResponse, CourseMutationResponse, CourseResponse, CourseUpdate, MessageResponse},
        users::{CurrentUser, Role},
    },
    auth::permissions,
    db::{
        handlers::CourseFilter,
        models::courses::{CourseCreateDBRequest, CourseDBResponse, CourseUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{CourseId, Operation, Resource},
};

async fn find_course(state: &AppState, raw_id: &str) -> Result<CourseDBResponse> {
    let id: CourseId = parse_id(raw_id, Error::course_not_found)?;
    state.store.get_course(id).await?.ok_or_else(Error::course_not_found)
}

fn require_non_empty(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::BadRequest {
            message: format!("{field} is required"),
        });
    }
    Ok(value.to_string())
}

/// Create a course owned by the calling instructor
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseCreate,
    tag = "courses",
    responses(
        (status = 201, description = "Course created", body = CourseMutationResponse),
        (status = 400, description = "Missing title or description"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an instructor"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn create_course(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CourseCreate>,
) -> Result<(StatusCode, Json<CourseMutationResponse>)> {
    permissions::require_role(&current_user, Role::Instructor, Operation::Create, Resource::Courses)?;

    let title = require_non_empty(&request.title, "Title")?;
    let description = require_non_empty(&request.description, "Description")?;

    let course = state
        .store
        .create_course(&CourseCreateDBRequest {
            title,
            description,
            content: request.content,
            instructor_id: current_user.id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseMutationResponse {
            message: "Course created successfully".to_string(),
            course: course.into(),
        }),
    ))
}

/// Update a course. Only the owning instructor may do this.
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    request_body = CourseUpdate,
    tag = "courses",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course updated", body = CourseMutationResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an instructor or not the owner"),
        (status = 404, description = "Course not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id, course_id = %id))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    current_user: CurrentUser,
    Json(request): Json<CourseUpdate>,
) -> Result<Json<CourseMutationResponse>> {
    permissions::require_role(&current_user, Role::Instructor, Operation::Update, Resource::Courses)?;

    let course = find_course(&state, &id).await?;
    permissions::require_ownership(&current_user, &course, Operation::Update)?;

    let update = CourseUpdateDBRequest::from(request);
    let course = if update.is_empty() {
        course
    } else {
        state.store.update_course(course.id, &update).await?
    };

    Ok(Json(CourseMutationResponse {
        message: "Course updated successfully".to_string(),
        course: course.into(),
    }))
}

/// Delete a course and its enrollments. Only the owning instructor may do this.
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an instructor or not the owner"),
        (status = 404, description = "Course not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id, course_id = %id))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    current_user: CurrentUser,
) -> Result<Json<MessageResponse>> {
    permissions::require_role(&current_user, Role::Instructor, Operation::Delete, Resource::Courses)?;

    let course = find_course(&state, &id).await?;
    permissions::require_ownership(&current_user, &course, Operation::Delete)?;

    if !state.store.delete_course(course.id).await? {
        // Deleted concurrently between lookup and delete
        return Err(Error::course_not_found());
    }

    Ok(Json(MessageResponse {
        message: "Course deleted successfully".to_string(),
    }))
}

/// Get a single course, including its content
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = CourseEnvelope),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Course not found"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(course_id = %id))]
pub async fn get_course(State(state): State<AppState>, Path(id): Path<String>, _current_user: CurrentUser) -> Result<Json<CourseEnvelope>> {
    let course = find_course(&state, &id).await?;
    Ok(Json(CourseEnvelope { course: course.into() }))
}

/// List the courses authored by an instructor, newest first
#[utoipa::path(
    get,
    path = "/api/courses/instructor/{instructor_id}",
    tag = "courses",
    params(("instructor_id" = String, Path, description = "Instructor user ID")),
    responses(
        (status = 200, description = "Courses by this instructor (possibly empty)", body = CourseListResponse),
        (status = 400, description = "Malformed instructor ID"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an instructor"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn list_instructor_courses(
    State(state): State<AppState>,
    Path(instructor_id): Path<String>,
    current_user: CurrentUser,
) -> Result<Json<CourseListResponse>> {
    permissions::require_role(&current_user, Role::Instructor, Operation::Read, Resource::Courses)?;

    let instructor_id = parse_id(&instructor_id, || Error::BadRequest {
        message: "Invalid instructor id".to_string(),
    })?;

    let courses = state.store.list_courses(&CourseFilter::by_instructor(instructor_id)).await?;

    Ok(Json(CourseListResponse {
        courses: courses.into_iter().map(CourseResponse::from).collect(),
    }))
}

/// List courses visible to the caller.
///
/// Instructors see only their own courses. Students see the whole catalogue,
/// each course flagged with whether they are enrolled in it.
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "courses",
    responses(
        (status = 200, description = "Courses visible to the caller", body = CourseListResponse),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id, role = %current_user.role))]
pub async fn list_courses(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<CourseListResponse>> {
    let courses = match current_user.role {
        Role::Instructor => state
            .store
            .list_courses(&CourseFilter::by_instructor(current_user.id))
            .await?
            .into_iter()
            .map(CourseResponse::from)
            .collect(),
        Role::Student => {
            let enrolled: HashSet<CourseId> = state.store.list_enrolled_course_ids(current_user.id).await?.into_iter().collect();
            state
                .store
                .list_courses(&CourseFilter::default())
                .await?
                .into_iter()
                .map(|course| {
                    let is_enrolled = enrolled.contains(&course.id);
                    CourseResponse::from(course).with_enrollment(is_enrolled)
                })
                .collect()
        }
    };

    Ok(Json(CourseListResponse { courses }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{auth_header, create_course_via_api, register_and_login, test_server};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_create_and_get_course() {
        let (server, _state) = test_server();
        let (alice, token) = register_and_login(&server, "alice", Role::Instructor).await;
        let (name, value) = auth_header(&token);

        let response = server
            .post("/api/courses")
            .add_header(&name, &value)
            .json(&json!({"title": "Intro to X", "description": "Basics of X", "content": "Week 1"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: CourseMutationResponse = response.json();
        assert_eq!(created.message, "Course created successfully");
        assert_eq!(created.course.instructor, alice.id);

        let (_, student_token) = register_and_login(&server, "bob", Role::Student).await;
        let (name, value) = auth_header(&student_token);
        let first: CourseEnvelope = server
            .get(&format!("/api/courses/{}", created.course.id))
            .add_header(&name, &value)
            .await
            .json();
        let second: CourseEnvelope = server
            .get(&format!("/api/courses/{}", created.course.id))
            .add_header(&name, &value)
            .await
            .json();
        assert_eq!(first.course, created.course);
        assert_eq!(first.course, second.course);
        assert_eq!(first.course.content.as_deref(), Some("Week 1"));
    }

    #[tokio::test]
    async fn test_create_requires_instructor_and_fields() {
        let (server, _state) = test_server();
        let (_, student_token) = register_and_login(&server, "bob", Role::Student).await;
        let (name, value) = auth_header(&student_token);

        let response = server
            .post("/api/courses")
            .add_header(&name, &value)
            .json(&json!({"title": "Nope", "description": "Nope"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        response.assert_json(&json!({"message": "Access denied. Only instructors have the permission."}));

        let (_, token) = register_and_login(&server, "alice", Role::Instructor).await;
        let (name, value) = auth_header(&token);
        let response = server
            .post("/api/courses")
            .add_header(&name, &value)
            .json(&json!({"title": "  ", "description": "Something"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requests_without_token_are_rejected() {
        let (server, _state) = test_server();

        let response = server.get("/api/courses").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert!(body["message"].is_string());

        server
            .get("/api/courses")
            .add_header("authorization", "Bearer not-a-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_by_owner_and_partial_fields() {
        let (server, _state) = test_server();
        let (_, token) = register_and_login(&server, "alice", Role::Instructor).await;
        let course = create_course_via_api(&server, &token, "Intro to X").await;
        let (name, value) = auth_header(&token);

        let response = server
            .put(&format!("/api/courses/{}", course.id))
            .add_header(&name, &value)
            .json(&json!({"title": "Advanced X", "description": ""}))
            .await;
        response.assert_status_ok();
        let updated: CourseMutationResponse = response.json();
        assert_eq!(updated.message, "Course updated successfully");
        assert_eq!(updated.course.title, "Advanced X");
        assert_eq!(updated.course.description, course.description);
        assert!(updated.course.updated_at >= course.updated_at);

        // No recognised fields: unchanged
        let response = server
            .put(&format!("/api/courses/{}", course.id))
            .add_header(&name, &value)
            .json(&json!({"unknown": "field"}))
            .await;
        response.assert_status_ok();
        let unchanged: CourseMutationResponse = response.json();
        assert_eq!(unchanged.course, updated.course);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update_or_delete() {
        let (server, _state) = test_server();
        let (_, alice_token) = register_and_login(&server, "alice", Role::Instructor).await;
        let (_, carol_token) = register_and_login(&server, "carol", Role::Instructor).await;
        let (_, bob_token) = register_and_login(&server, "bob", Role::Student).await;
        let course = create_course_via_api(&server, &alice_token, "Intro to X").await;

        let (name, value) = auth_header(&carol_token);
        let response = server
            .put(&format!("/api/courses/{}", course.id))
            .add_header(&name, &value)
            .json(&json!({"title": "Hijacked"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        response.assert_json(&json!({"message": "You are not authorized to update this course"}));

        server
            .delete(&format!("/api/courses/{}", course.id))
            .add_header(&name, &value)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // Students are stopped by the role gate
        let (name, value) = auth_header(&bob_token);
        server
            .delete(&format!("/api/courses/{}", course.id))
            .add_header(&name, &value)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_role_gate_runs_before_lookup() {
        let (server, _state) = test_server();
        let (_, bob_token) = register_and_login(&server, "bob", Role::Student).await;
        let (_, alice_token) = register_and_login(&server, "alice", Role::Instructor).await;
        let missing = uuid::Uuid::new_v4();

        let (name, value) = auth_header(&bob_token);
        server
            .put(&format!("/api/courses/{missing}"))
            .add_header(&name, &value)
            .json(&json!({"title": "x"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let (name, value) = auth_header(&alice_token);
        let response = server.put(&format!("/api/courses/{missing}")).add_header(&name, &value).json(&json!({"title": "x"})).await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({"message": "Course not found"}));

        server
            .get("/api/courses/not-a-uuid")
            .add_header(&name, &value)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_course() {
        let (server, _state) = test_server();
        let (_, token) = register_and_login(&server, "alice", Role::Instructor).await;
        let course = create_course_via_api(&server, &token, "Intro to X").await;
        let (name, value) = auth_header(&token);

        let response = server.delete(&format!("/api/courses/{}", course.id)).add_header(&name, &value).await;
        response.assert_status_ok();
        response.assert_json(&json!({"message": "Course deleted successfully"}));

        server
            .get(&format!("/api/courses/{}", course.id))
            .add_header(&name, &value)
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!("/api/courses/{}", course.id))
            .add_header(&name, &value)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_is_role_filtered() {
        let (server, _state) = test_server();
        let (alice, alice_token) = register_and_login(&server, "alice", Role::Instructor).await;
        let (_, carol_token) = register_and_login(&server, "carol", Role::Instructor).await;
        let (_, bob_token) = register_and_login(&server, "bob", Role::Student).await;

        let first = create_course_via_api(&server, &alice_token, "First").await;
        create_course_via_api(&server, &alice_token, "Second").await;
        create_course_via_api(&server, &carol_token, "Foreign").await;

        // Bob enrolls in one of Alice's courses
        let (name, value) = auth_header(&bob_token);
        server
            .post(&format!("/api/enrollments/{}", first.id))
            .add_header(&name, &value)
            .await
            .assert_status(StatusCode::CREATED);

        let (name, value) = auth_header(&alice_token);
        let mine: CourseListResponse = server.get("/api/courses").add_header(&name, &value).await.json();
        assert_eq!(mine.courses.len(), 2);
        assert!(mine.courses.iter().all(|c| c.instructor == alice.id && c.is_enrolled.is_none()));

        let (name, value) = auth_header(&bob_token);
        let all: CourseListResponse = server.get("/api/courses").add_header(&name, &value).await.json();
        assert_eq!(all.courses.len(), 3);
        for course in &all.courses {
            assert_eq!(course.is_enrolled, Some(course.id == first.id), "{}", course.title);
        }
    }

    #[tokio::test]
    async fn test_list_by_instructor() {
        let (server, _state) = test_server();
        let (alice, alice_token) = register_and_login(&server, "alice", Role::Instructor).await;
        let (carol, carol_token) = register_and_login(&server, "carol", Role::Instructor).await;
        let (_, bob_token) = register_and_login(&server, "bob", Role::Student).await;

        create_course_via_api(&server, &alice_token, "Older").await;
        create_course_via_api(&server, &alice_token, "Newer").await;

        let (name, value) = auth_header(&carol_token);
        let listed: CourseListResponse = server
            .get(&format!("/api/courses/instructor/{}", alice.id))
            .add_header(&name, &value)
            .await
            .json();
        let titles: Vec<_> = listed.courses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);

        let empty: CourseListResponse = server
            .get(&format!("/api/courses/instructor/{}", carol.id))
            .add_header(&name, &value)
            .await
            .json();
        assert!(empty.courses.is_empty());

        let (name, value) = auth_header(&bob_token);
        server
            .get(&format!("/api/courses/instructor/{}", alice.id))
            .add_header(&name, &value)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
