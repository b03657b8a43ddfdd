//! Database models for users.

use crate::api::models::users::Role;
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Database response for a user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserDBResponse {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
