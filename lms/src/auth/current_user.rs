use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    config::Config,
    errors::{Error, Result},
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, instrument};

/// Resolve the caller from an `Authorization: Bearer <token>` header.
///
/// Every failure (header missing, not a bearer token, bad signature, expired)
/// is `Unauthenticated`.
#[instrument(skip(parts, config))]
fn bearer_auth(parts: &Parts, config: &Config) -> Result<CurrentUser> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(Error::Unauthenticated { message: None })?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(Error::Unauthenticated { message: None })?;

    session::verify_session_token(token, config)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = bearer_auth(parts, &state.config)?;
        debug!("Authenticated user: {} ({})", user.id, user.role);
        Ok(user)
    }
}
