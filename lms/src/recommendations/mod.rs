//! Course recommendations from a language model.
//!
//! The catalogue's titles are placed in a system prompt that asks the model
//! to answer with `{"message": "...", "courses": [...]}` only. Replies that do
//! not parse into that shape are passed back verbatim with a fallback flag.

pub mod client;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    api::models::recommendations::{RecommendationFallback, RecommendationResponse},
    config::RecommendationsConfig,
    db::Store,
    errors::{Error, Result},
};
use client::{ChatCompletionRequest, ChatCompletions, ChatMessage};

pub const FALLBACK_MESSAGE: &str = "GPT did not return valid JSON. Please try again.";
const UPSTREAM_OPERATION: &str = "get course recommendations";

/// The structured answer the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    /// Note to the student, may be empty
    #[serde(default)]
    pub message: String,
    /// Recommended course titles
    pub courses: Vec<String>,
}

/// Build the advisor instructions listing the available course titles.
pub fn build_system_prompt(titles: &[String]) -> Result<String> {
    let catalogue = serde_json::to_string_pretty(titles).map_err(|e| Error::Internal {
        operation: format!("serialize course titles: {e}"),
    })?;

    Ok(format!(
        r#"You are an academic advisor helping students select courses based on their career goals.

Here is the list of available courses:
{catalogue}

The student will provide their goal or interest.

- If relevant courses exist in the list above, recommend the most appropriate ones from the available courses.
- If there are no good matches in our available courses, politely mention that we don't have specialized courses for that goal, and suggest the most relevant courses outside of what we provide using your knowledge.

Respond ONLY in this JSON format:
{{
  "message": "Optional message to the student",
  "courses": ["Course 1", "Course 2", "Course 3"]
}}
Do NOT add anything else (no explanation, no greeting).
"#
    ))
}

/// Remove a surrounding markdown code fence (```` ``` ```` or ```` ```json ````), if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    match body.split_once('\n') {
        Some((info, content)) if !info.contains('{') => content.trim(),
        _ => body.trim(),
    }
}

/// Interpret the model's reply, degrading to a fallback payload when it is not the expected JSON.
pub fn parse_reply(raw: &str) -> RecommendationResponse {
    match serde_json::from_str::<Recommendation>(strip_code_fence(raw)) {
        Ok(parsed) => RecommendationResponse::Recommendation(parsed),
        Err(e) => {
            warn!("Model reply was not valid recommendation JSON: {}", e);
            RecommendationResponse::Fallback(RecommendationFallback {
                fallback: true,
                raw: raw.to_string(),
                message: FALLBACK_MESSAGE.to_string(),
            })
        }
    }
}

/// Ask the model for courses matching `prompt`.
///
/// The usage counter is bumped only after the upstream call succeeds.
#[instrument(skip_all, err)]
pub async fn recommend(
    store: &Arc<dyn Store>,
    llm: &Arc<dyn ChatCompletions>,
    config: &RecommendationsConfig,
    prompt: &str,
) -> Result<RecommendationResponse> {
    if prompt.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Prompt is required".to_string(),
        });
    }

    let titles = store.list_course_titles().await?;
    if titles.is_empty() {
        return Err(Error::NotFound {
            message: "No courses available in the system.".to_string(),
        });
    }

    let request = ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![ChatMessage::system(build_system_prompt(&titles)?), ChatMessage::user(prompt)],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    let response = llm.complete(&request).await.map_err(|e| Error::Upstream {
        operation: UPSTREAM_OPERATION.to_string(),
        detail: format!("{e:#}"),
    })?;

    let count = store.increment_usage(&config.api_name).await?;
    info!(api_name = %config.api_name, count, "Recorded language model usage");

    let content = response.first_content().ok_or_else(|| Error::Upstream {
        operation: UPSTREAM_OPERATION.to_string(),
        detail: "response contained no choices".to_string(),
    })?;

    Ok(parse_reply(content))
}
