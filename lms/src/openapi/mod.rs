//! OpenAPI documentation for the HTTP API.
//!
//! [`ApiDoc`] collects every handler's `#[utoipa::path]` annotation. The
//! document is served at `/api/openapi.json` and rendered with Scalar at
//! `/api/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{api, recommendations};

/// Registers the bearer-token scheme referenced by the authenticated routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token returned by `POST /api/users/login`:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LMS API",
        description = "Courses, enrollments and AI course recommendations"
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::users::register,
        api::handlers::users::login,
        api::handlers::courses::create_course,
        api::handlers::courses::update_course,
        api::handlers::courses::delete_course,
        api::handlers::courses::get_course,
        api::handlers::courses::list_instructor_courses,
        api::handlers::courses::list_courses,
        api::handlers::enrollments::enroll,
        api::handlers::enrollments::list_my_enrollments,
        api::handlers::enrollments::list_course_students,
        api::handlers::recommendations::recommend,
    ),
    components(
        schemas(
            api::models::users::Role,
            api::models::users::RegisterRequest,
            api::models::users::LoginRequest,
            api::models::users::UserResponse,
            api::models::users::RegisterResponse,
            api::models::users::LoginResponse,
            api::models::courses::CourseCreate,
            api::models::courses::CourseUpdate,
            api::models::courses::CourseResponse,
            api::models::courses::CourseEnvelope,
            api::models::courses::CourseMutationResponse,
            api::models::courses::CourseListResponse,
            api::models::courses::MessageResponse,
            api::models::enrollments::EnrollmentResponse,
            api::models::enrollments::EnrollResponse,
            api::models::enrollments::EnrolledCourse,
            api::models::enrollments::EnrolledCoursesResponse,
            api::models::enrollments::EnrolledStudent,
            api::models::enrollments::EnrolledStudentsResponse,
            api::models::recommendations::RecommendationRequest,
            api::models::recommendations::RecommendationFallback,
            api::models::recommendations::RecommendationResponse,
            recommendations::Recommendation,
        )
    ),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "courses", description = "Course management. Writes are restricted to the owning instructor."),
        (name = "enrollments", description = "Enrolling in courses and listing enrollments"),
        (name = "recommendations", description = "Language-model course recommendations"),
    )
)]
pub struct ApiDoc;
