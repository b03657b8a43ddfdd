//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Users** (`/api/users/*`): Registration and login
//! - **Courses** (`/api/courses/*`): Course CRUD and the role-filtered catalogue
//! - **Enrollments** (`/api/enrollments/*`): Enrolling and enrollment listings
//! - **Recommendations** (`/api/gpt/recommend`): Language-model course suggestions
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/api/docs` when the server is running.

pub mod handlers;
pub mod models;
