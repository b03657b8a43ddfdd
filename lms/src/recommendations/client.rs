//! Client for OpenAI-compatible chat-completions endpoints.

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::config::RecommendationsConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the model produced any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

/// A trait for requesting chat completions in the openai compatible format.
/// In practise this is backed by `ChatCompletionsReqwest`; tests substitute canned replies.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    async fn complete(&self, request: &ChatCompletionRequest) -> anyhow::Result<ChatCompletionResponse>;
}

/// The concrete implementation of `ChatCompletions`.
pub struct ChatCompletionsReqwest {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    request_timeout: Duration,
}

impl ChatCompletionsReqwest {
    pub fn new(config: &RecommendationsConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            request_timeout: config.request_timeout,
        })
    }
}

/// Makes sure a url has a trailing slash.
///
/// `Url::join` replaces the last path segment unless the base ends in '/', so
/// '/v1' joined with 'chat/completions' would give '/chat/completions'.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

#[async_trait]
impl ChatCompletions for ChatCompletionsReqwest {
    #[instrument(skip_all, fields(model = %request.model), err)]
    async fn complete(&self, request: &ChatCompletionRequest) -> anyhow::Result<ChatCompletionResponse> {
        let url = ensure_slash(&self.base_url)
            .join("chat/completions")
            .map_err(|e| anyhow!("Failed to construct chat completions URL: {}", e))?;

        debug!("Requesting chat completion from URL: {}", url);

        let mut builder = self.client.post(url.clone()).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.timeout(self.request_timeout).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Chat completion request to {} failed", url);
            return Err(anyhow!("Chat completions API error: {} - {}", status, body));
        }

        let body_text = response.text().await?;
        tracing::debug!("Chat completions response body: {}", body_text);

        serde_json::from_str::<ChatCompletionResponse>(&body_text).map_err(|e| {
            tracing::error!("Failed to parse chat completions response as JSON. Error: {}", e);
            anyhow!("error decoding response body: {}", e)
        })
    }
}
