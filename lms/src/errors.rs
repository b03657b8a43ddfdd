use crate::db::errors::DbError;
use crate::types::{Operation, Resource};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const ALREADY_ENROLLED: &str = "You are already enrolled in this course";

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided, or credentials rejected
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Caller's role or ownership does not allow the operation
    #[error("Insufficient permissions to {action} {resource}: {reason}")]
    InsufficientPermissions {
        action: Operation,
        resource: Resource,
        reason: String,
    },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{message}")]
    NotFound { message: String },

    /// Duplicate username or duplicate enrollment
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The external language-model API failed or timed out
    #[error("Failed to {operation}: {detail}")]
    Upstream { operation: String, detail: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Store operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn course_not_found() -> Self {
        Error::NotFound {
            message: "Course not found".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            // Existing clients treat duplicates as a plain bad request
            Error::Conflict { .. } => StatusCode::BAD_REQUEST,
            Error::Upstream { .. } | Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { table, .. } => match table.as_deref() {
                    Some("users") | Some("enrollments") => StatusCode::BAD_REQUEST,
                    _ => StatusCode::CONFLICT,
                },
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::InsufficientPermissions { reason, .. } => reason.clone(),
            Error::BadRequest { message } | Error::NotFound { message } | Error::Conflict { message } => message.clone(),
            Error::Upstream { operation, .. } => format!("Failed to {operation}"),
            Error::Internal { .. } | Error::Other(_) => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { table, .. } => match table.as_deref() {
                    Some("users") => USERNAME_TAKEN.to_string(),
                    Some("enrollments") => ALREADY_ENROLLED.to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::Other(_) => "Internal server error".to_string(),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) | Error::Upstream { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::InsufficientPermissions { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::Conflict { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({ "message": self.user_message() });
        (status, Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
