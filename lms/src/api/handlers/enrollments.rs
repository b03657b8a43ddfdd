use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::parse_id;
use crate::{
    AppState,
    api::models::{
        enrollments::{EnrollResponse, EnrolledCourse, EnrolledCoursesResponse, EnrolledStudent, EnrolledStudentsResponse},
        users::{CurrentUser, Role},
    },
    auth::permissions,
    db::models::enrollments::EnrollmentCreateDBRequest,
    errors::{ALREADY_ENROLLED, Error, Result},
    types::{CourseId, Operation, Resource},
};

fn parse_course_id(raw: &str) -> Result<CourseId> {
    parse_id(raw, || Error::BadRequest {
        message: "Invalid course id".to_string(),
    })
}

/// Enroll the caller in a course
#[utoipa::path(
    post,
    path = "/api/enrollments/{course_id}",
    tag = "enrollments",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 201, description = "Enrollment created", body = EnrollResponse),
        (status = 400, description = "Already enrolled or malformed course ID"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Only students may enroll (when enabled)"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id, course_id = %course_id))]
pub async fn enroll(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    current_user: CurrentUser,
) -> Result<(StatusCode, Json<EnrollResponse>)> {
    if state.config.enrollment.students_only {
        permissions::require_role(&current_user, Role::Student, Operation::Create, Resource::Enrollments)?;
    }

    let course_id = parse_course_id(&course_id)?;

    // Friendly message for the common case; the unique constraint still covers races
    if state.store.get_enrollment(current_user.id, course_id).await?.is_some() {
        return Err(Error::Conflict {
            message: ALREADY_ENROLLED.to_string(),
        });
    }

    let enrollment = state
        .store
        .create_enrollment(&EnrollmentCreateDBRequest {
            student_id: current_user.id,
            course_id,
        })
        .await?;

    tracing::info!(enrollment_id = %enrollment.id, "Created enrollment");

    Ok((
        StatusCode::CREATED,
        Json(EnrollResponse {
            message: "Enrollment successful".to_string(),
            enrollment: enrollment.into(),
        }),
    ))
}

/// List the caller's enrolled courses, newest enrollment first
#[utoipa::path(
    get,
    path = "/api/enrollments",
    tag = "enrollments",
    responses(
        (status = 200, description = "Courses the caller is enrolled in", body = EnrolledCoursesResponse),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn list_my_enrollments(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<EnrolledCoursesResponse>> {
    let rows = state.store.list_enrollments_for_student(current_user.id).await?;
    Ok(Json(EnrolledCoursesResponse {
        courses: rows.into_iter().map(EnrolledCourse::from).collect(),
    }))
}

/// List the students enrolled in a course
#[utoipa::path(
    get,
    path = "/api/enrollments/{course_id}",
    tag = "enrollments",
    params(("course_id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Students enrolled in the course", body = EnrolledStudentsResponse),
        (status = 400, description = "Malformed course ID"),
        (status = 401, description = "Not authenticated"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(course_id = %course_id))]
pub async fn list_course_students(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    _current_user: CurrentUser,
) -> Result<Json<EnrolledStudentsResponse>> {
    let course_id = parse_course_id(&course_id)?;
    let rows = state.store.list_enrollments_for_course(course_id).await?;
    Ok(Json(EnrolledStudentsResponse {
        students: rows.into_iter().map(EnrolledStudent::from).collect(),
    }))
}
