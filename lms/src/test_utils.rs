//! Fixtures shared by the unit and router tests.
//!
//! Everything here runs against [`InMemoryStore`] and a canned language model,
//! so the full router can be exercised without Postgres or network access.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use parking_lot::Mutex;
use serde_json::json;

use crate::{
    AppState,
    api::models::{
        courses::{CourseMutationResponse, CourseResponse},
        users::{LoginResponse, RegisterResponse, Role, UserResponse},
    },
    config::{Config, DatabaseConfig, PasswordConfig},
    db::{
        InMemoryStore, Store,
        models::{
            courses::{CourseCreateDBRequest, CourseDBResponse},
            users::UserCreateDBRequest,
        },
    },
    recommendations::client::{ChatChoice, ChatChoiceMessage, ChatCompletionRequest, ChatCompletionResponse, ChatCompletions},
};

pub const TEST_PASSWORD: &str = "password123";

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        auth: crate::config::AuthConfig {
            // Cheap parameters; the defaults make every register/login take ~100ms
            password: PasswordConfig {
                argon2_memory_kib: 1024,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A `ChatCompletions` that records every request and returns a fixed reply.
pub struct CannedChatCompletions {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl CannedChatCompletions {
    pub fn replying(content: &str) -> Self {
        Self {
            reply: Ok(content.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatCompletions for CannedChatCompletions {
    async fn complete(&self, request: &ChatCompletionRequest) -> anyhow::Result<ChatCompletionResponse> {
        self.requests.lock().push(request.clone());
        match &self.reply {
            Ok(content) => Ok(ChatCompletionResponse {
                choices: vec![ChatChoice {
                    message: ChatChoiceMessage {
                        content: Some(content.clone()),
                    },
                }],
            }),
            Err(error) => Err(anyhow::anyhow!("{error}")),
        }
    }
}

pub fn test_state(config: Config, llm: Arc<dyn ChatCompletions>) -> AppState {
    AppState::builder()
        .store(Arc::new(InMemoryStore::new()) as Arc<dyn Store>)
        .llm(llm)
        .config(config)
        .build()
}

pub fn test_server_with_llm(config: Config, llm: Arc<dyn ChatCompletions>) -> (TestServer, AppState) {
    let state = test_state(config, llm);
    let router = crate::build_router(state.clone()).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, state)
}

pub fn test_server_with_config(config: Config) -> (TestServer, AppState) {
    test_server_with_llm(config, Arc::new(CannedChatCompletions::replying(r#"{"message": "", "courses": []}"#)))
}

pub fn test_server() -> (TestServer, AppState) {
    test_server_with_config(test_config())
}

/// Header name and value for a bearer token, for `add_header`.
pub fn auth_header(token: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {token}"))
}

/// Register `username` (also used as the display name) and log in.
pub async fn register_and_login(server: &TestServer, username: &str, role: Role) -> (UserResponse, String) {
    let response = server
        .post("/api/users/register")
        .json(&json!({
            "name": username,
            "username": username,
            "password": TEST_PASSWORD,
            "role": role,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let registered: RegisterResponse = response.json();

    let response = server
        .post("/api/users/login")
        .json(&json!({"username": username, "password": TEST_PASSWORD}))
        .await;
    response.assert_status_ok();
    let login: LoginResponse = response.json();
    assert_eq!(login.user, registered.user);

    (login.user, login.token)
}

pub async fn create_course_via_api(server: &TestServer, token: &str, title: &str) -> CourseResponse {
    let (name, value) = auth_header(token);
    let response = server
        .post("/api/courses")
        .add_header(&name, &value)
        .json(&json!({"title": title, "description": format!("About {title}")}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<CourseMutationResponse>().course
}

/// Insert a course owned by a fresh instructor directly into the store.
pub async fn seed_course(store: &Arc<dyn Store>, title: &str) -> CourseDBResponse {
    let instructor = store
        .create_user(&UserCreateDBRequest {
            name: "Seed Instructor".to_string(),
            username: format!("instructor-{}", uuid::Uuid::new_v4()),
            password_hash: "unused".to_string(),
            role: Role::Instructor,
        })
        .await
        .expect("Failed to create instructor");

    store
        .create_course(&CourseCreateDBRequest {
            title: title.to_string(),
            description: format!("About {title}"),
            content: None,
            instructor_id: instructor.id,
        })
        .await
        .expect("Failed to create course")
}
