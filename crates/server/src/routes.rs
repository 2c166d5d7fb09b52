//! API route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// Successful chat response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Answer one question.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let question = match body {
        Ok(Json(ChatRequest {
            question: Some(question),
        })) if !question.trim().is_empty() => question,
        Ok(_) => return Err(ApiError::QuestionRequired),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::debug!("Rejected oversized chat body: {}", rejection);
            return Err(ApiError::TooLarge);
        }
        Err(rejection) => {
            tracing::debug!("Rejected chat body: {}", rejection);
            return Err(ApiError::QuestionRequired);
        }
    };

    let answer = state.assistant.answer(&question).await?;

    tracing::debug!(
        "Answered (grounded: {}, sources: {})",
        answer.grounded,
        answer.sources.len()
    );

    Ok(Json(ChatResponse {
        answer: answer.answer,
    }))
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "supportbot",
        "version": env!("CARGO_PKG_VERSION"),
        "strategy": state.assistant.ranker().strategy().as_str(),
        "entries": state.assistant.knowledge().len(),
    }))
}
