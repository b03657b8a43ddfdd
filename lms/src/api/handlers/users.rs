use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    api::models::users::{CurrentUser, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse},
    auth::{
        password::{self, Argon2Params},
        session,
    },
    db::models::users::UserCreateDBRequest,
    errors::{Error, USERNAME_TAKEN},
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some(INVALID_CREDENTIALS.to_string()),
    }
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    tag = "users",
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Invalid input or username already exists"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), Error> {
    let name = request.name.trim();
    let username = request.username.trim();
    if name.is_empty() {
        return Err(Error::BadRequest {
            message: "Name is required".to_string(),
        });
    }
    if username.is_empty() {
        return Err(Error::BadRequest {
            message: "Username is required".to_string(),
        });
    }
    let role = request.role.ok_or_else(|| Error::BadRequest {
        message: "Role is required".to_string(),
    })?;

    // Validate password length
    let password_config = &state.config.auth.password;
    if request.password.len() < password_config.min_length {
        return Err(Error::BadRequest {
            message: format!("Password must be at least {} characters", password_config.min_length),
        });
    }
    if request.password.len() > password_config.max_length {
        return Err(Error::BadRequest {
            message: format!("Password must be no more than {} characters", password_config.max_length),
        });
    }

    // Friendly message for the common case; the unique constraint still covers races
    if state.store.get_user_by_username(username).await?.is_some() {
        return Err(Error::Conflict {
            message: USERNAME_TAKEN.to_string(),
        });
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password = request.password;
    let params = Argon2Params::from(password_config);
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password, params))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let created_user = state
        .store
        .create_user(&UserCreateDBRequest {
            name: name.to_string(),
            username: username.to_string(),
            password_hash,
            role,
        })
        .await?;

    tracing::info!(user_id = %created_user.id, role = %created_user.role, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from(created_user),
        }),
    ))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    tag = "users",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, Error> {
    let user = state
        .store
        .get_user_by_username(request.username.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password;
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(invalid_credentials());
    }

    let token = session::create_session_token(&CurrentUser::from(&user), &state.config)?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(user),
        token,
    }))
}
