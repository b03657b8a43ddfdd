//! API request/response models for users and authentication.

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// The two roles a user can hold. Fixed at registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Instructor,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Instructor => write!(f, "instructor"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// Request body for creating an account. Missing fields are reported as validation errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "ada")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Public profile of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
}

/// The authenticated caller, as resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            username: db.username,
            role: db.role,
        }
    }
}

impl From<&UserDBResponse> for CurrentUser {
    fn from(db: &UserDBResponse) -> Self {
        Self { id: db.id, role: db.role }
    }
}
