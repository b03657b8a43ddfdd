//! Database repository for users.

use crate::db::{
    errors::Result,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, username, password_hash, role, created_at";

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert a new user. A taken username surfaces as a unique violation on `users`.
    #[instrument(skip(self, request), fields(username = %request.username, role = %request.role), err)]
    pub async fn create(&mut self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let user_id = Uuid::new_v4();

        let user = sqlx::query_as::<_, UserDBResponse>(&format!(
            "INSERT INTO users (id, name, username, password_hash, role) VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&request.name)
        .bind(&request.username)
        .bind(&request.password_hash)
        .bind(request.role)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    pub async fn get_user_by_username(&mut self, username: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }
}
