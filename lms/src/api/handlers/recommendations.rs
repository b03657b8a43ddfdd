use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::{
        recommendations::{RecommendationRequest, RecommendationResponse},
        users::CurrentUser,
    },
    errors::Result,
    recommendations,
};

/// Ask the language model which catalogue courses fit the caller's goal
#[utoipa::path(
    post,
    path = "/api/gpt/recommend",
    request_body = RecommendationRequest,
    tag = "recommendations",
    responses(
        (status = 200, description = "Recommended course titles, or the raw reply when it was not valid JSON", body = RecommendationResponse),
        (status = 400, description = "Prompt is missing"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "The catalogue is empty"),
        (status = 500, description = "The language model request failed"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn recommend(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>> {
    let response = recommendations::recommend(&state.store, &state.llm, &state.config.recommendations, &request.prompt).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::recommendations::FALLBACK_MESSAGE;
    use crate::test_utils::{CannedChatCompletions, auth_header, create_course_via_api, register_and_login, test_config, test_server_with_llm};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_recommend_requires_prompt_and_catalogue() {
        let canned = Arc::new(CannedChatCompletions::replying(r#"{"courses": []}"#));
        let (server, _state) = test_server_with_llm(test_config(), canned.clone());
        let (_, token) = register_and_login(&server, "bob", Role::Student).await;
        let (name, value) = auth_header(&token);

        let response = server.post("/api/gpt/recommend").add_header(&name, &value).json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"message": "Prompt is required"}));

        let response = server
            .post("/api/gpt/recommend")
            .add_header(&name, &value)
            .json(&json!({"prompt": "data science"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({"message": "No courses available in the system."}));

        assert!(canned.requests().is_empty());
    }

    #[tokio::test]
    async fn test_recommend_returns_parsed_reply() {
        let canned = Arc::new(CannedChatCompletions::replying(
            "```json\n{\"message\": \"Start here\", \"courses\": [\"Intro to X\"]}\n```",
        ));
        let (server, state) = test_server_with_llm(test_config(), canned.clone());
        let (_, alice_token) = register_and_login(&server, "alice", Role::Instructor).await;
        create_course_via_api(&server, &alice_token, "Intro to X").await;
        let (_, token) = register_and_login(&server, "bob", Role::Student).await;
        let (name, value) = auth_header(&token);

        let response = server
            .post("/api/gpt/recommend")
            .add_header(&name, &value)
            .json(&json!({"prompt": "I want to learn X"}))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({"message": "Start here", "courses": ["Intro to X"]}));

        let requests = canned.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages[1].content, "I want to learn X");
        assert_eq!(state.store.increment_usage("GPT_API").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_recommend_falls_back_on_free_text() {
        let canned = Arc::new(CannedChatCompletions::replying("You should take Intro to X."));
        let (server, _state) = test_server_with_llm(test_config(), canned);
        let (_, alice_token) = register_and_login(&server, "alice", Role::Instructor).await;
        create_course_via_api(&server, &alice_token, "Intro to X").await;
        let (name, value) = auth_header(&alice_token);

        let response = server
            .post("/api/gpt/recommend")
            .add_header(&name, &value)
            .json(&json!({"prompt": "anything"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["fallback"], true);
        assert_eq!(body["raw"], "You should take Intro to X.");
        assert_eq!(body["message"], FALLBACK_MESSAGE);
    }

    #[test_log::test(tokio::test)]
    async fn test_recommend_upstream_failure() {
        let canned = Arc::new(CannedChatCompletions::failing("connection refused"));
        let (server, _state) = test_server_with_llm(test_config(), canned);
        let (_, alice_token) = register_and_login(&server, "alice", Role::Instructor).await;
        create_course_via_api(&server, &alice_token, "Intro to X").await;
        let (name, value) = auth_header(&alice_token);

        let response = server
            .post("/api/gpt/recommend")
            .add_header(&name, &value)
            .json(&json!({"prompt": "anything"}))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({"message": "Failed to get course recommendations"}));
    }

    #[tokio::test]
    async fn test_recommend_requires_authentication() {
        let (server, _state) = test_server_with_llm(test_config(), Arc::new(CannedChatCompletions::replying("{}")));
        server
            .post("/api/gpt/recommend")
            .json(&json!({"prompt": "anything"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
