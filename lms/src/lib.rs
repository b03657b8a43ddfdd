//! # lms: Learning-Management API
//!
//! `lms` is a small learning-management web service. Instructors author
//! courses, students enroll in them, and anyone signed in can ask a language
//! model which catalogue courses fit a goal.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer.
//! Persistence goes through the [`db::Store`] trait, backed either by PostgreSQL
//! ([`db::PgStore`], recommended) or by a process-local store ([`db::InMemoryStore`],
//! useful for development and tests).
//!
//! ### Request Flow
//!
//! A request is routed to a handler in [`api::handlers`]. Handlers that need a
//! signed-in caller take a [`CurrentUser`](api::models::users::CurrentUser)
//! extractor, which validates the `Authorization: Bearer` session token. The
//! handler then applies the role and ownership checks from [`auth::permissions`],
//! talks to the store and returns JSON. Failures are [`errors::Error`] values,
//! rendered as a status code plus a `{"message": ...}` body.
//!
//! ### Core Components
//!
//! - [`api`]: request/response models and handlers
//! - [`auth`]: password hashing, session tokens and access checks
//! - [`db`]: the store trait, its Postgres repositories and the in-memory store
//! - [`recommendations`]: prompt construction, the chat-completions client and reply parsing
//! - [`config`]: YAML plus environment configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use lms::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = lms::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     lms::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! With an external database, migrations run automatically on startup:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! lms::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod recommendations;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    http::{self, HeaderValue},
    routing::{get, post},
};
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;
use config::{CorsOrigin, DatabaseConfig, PoolSettings};
use db::{InMemoryStore, PgStore, Store};
use openapi::ApiDoc;
use recommendations::client::{ChatCompletions, ChatCompletionsReqwest};
pub use types::{CourseId, EnrollmentId, UserId};

/// Application state shared across all request handlers.
///
/// # Fields
///
/// - `store`: Persistence backend (Postgres or in-memory)
/// - `llm`: Chat-completions client used for recommendations
/// - `config`: Application configuration loaded from file and environment
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .store(Arc::new(PgStore::new(pool)) as Arc<dyn Store>)
///     .llm(Arc::new(ChatCompletionsReqwest::new(&config.recommendations)?) as Arc<dyn ChatCompletions>)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub llm: Arc<dyn ChatCompletions>,
    pub config: Config,
}

/// Get the lms database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to Postgres with the configured pool settings and run migrations.
#[instrument(skip_all)]
async fn setup_database(url: &str, settings: &PoolSettings) -> anyhow::Result<PgPool> {
    let mut options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));
    // 0 means never
    if settings.idle_timeout_secs > 0 {
        options = options.idle_timeout(Duration::from_secs(settings.idle_timeout_secs));
    }
    if settings.max_lifetime_secs > 0 {
        options = options.max_lifetime(Duration::from_secs(settings.max_lifetime_secs));
    }

    let pool = options.connect(url).await?;
    migrator().run(&pool).await?;
    info!("Database migrations applied");
    Ok(pool)
}

#[instrument(skip_all)]
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;
    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT, http::Method::DELETE])
        .allow_headers([http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// # Errors
///
/// Returns an error if the CORS configuration cannot be turned into header values.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{courses, enrollments, recommendations, users};

    let api_routes = Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/courses", get(courses::list_courses).post(courses::create_course))
        .route(
            "/courses/{id}",
            get(courses::get_course).put(courses::update_course).delete(courses::delete_course),
        )
        .route("/courses/instructor/{instructor_id}", get(courses::list_instructor_courses))
        .route("/enrollments", get(enrollments::list_my_enrollments))
        .route(
            "/enrollments/{course_id}",
            get(enrollments::list_course_students).post(enrollments::enroll),
        )
        .route("/gpt/recommend", post(recommendations::recommend))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/api/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting lms with configuration: {:#?}", config);

        let (store, pool): (Arc<dyn Store>, Option<PgPool>) = match &config.database {
            DatabaseConfig::External { url, pool } => {
                let pool = setup_database(url, pool).await?;
                (Arc::new(PgStore::new(pool.clone())) as Arc<dyn Store>, Some(pool))
            }
            DatabaseConfig::Memory => {
                warn!("Using the in-memory store; all data is lost on restart");
                (Arc::new(InMemoryStore::new()) as Arc<dyn Store>, None)
            }
        };

        if config.recommendations.api_key.is_none() {
            warn!("No language model API key configured; recommendation requests will be sent unauthenticated");
        }
        let llm: Arc<dyn ChatCompletions> = Arc::new(ChatCompletionsReqwest::new(&config.recommendations)?);

        let state = AppState::builder().store(store).llm(llm).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("lms listening on http://{}, available at http://localhost:{}", bind_addr, self.config.port);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        Ok(())
    }
}
