//! Authentication and authorization.
//!
//! Callers authenticate with a signed session token obtained from
//! `POST /api/users/login` and sent as `Authorization: Bearer <token>`.
//! Tokens are stateless: there is no server-side session store and no
//! revocation, a token is valid until it expires.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor resolving the authenticated caller in handlers
//! - [`password`]: Password hashing and verification using Argon2
//! - [`permissions`]: Role and ownership checks
//! - [`session`]: Token creation and verification
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use lms::api::models::users::{CurrentUser, Role};
//! use lms::auth::permissions;
//!
//! async fn protected_handler(current_user: CurrentUser) -> Result<String, Error> {
//!     permissions::require_role(&current_user, Role::Instructor, Operation::Create, Resource::Courses)?;
//!     Ok(format!("Hello, {}!", current_user.id))
//! }
//! ```

pub mod current_user;
pub mod password;
pub mod permissions;
pub mod session;
