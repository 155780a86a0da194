use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{ChatMessage, Inquiry};
use crate::services::intake;
use crate::state::AppState;

const NOT_CONFIGURED_REPLY: &str = "The chatbot is not properly configured. Please check the OPENAI_API_KEY environment variable.";
const GENERIC_ERROR_REPLY: &str =
    "I'm sorry, there was an error processing your request. Please try again later.";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message_text: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    reply: String,
    conversation_history: Vec<ChatMessage>,
    data_saved: bool,
    saved_data: Option<Inquiry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calendar_booked: Option<bool>,
}

// POST /api/chat
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "malformed chat request");
            return chat_error(AppError::BadRequest(rejection.body_text()));
        }
    };

    match intake::process_turn(&state, &request.message_text, request.conversation_history).await {
        Ok(outcome) => Json(ChatResponse {
            reply: outcome.reply,
            conversation_history: outcome.conversation_history,
            data_saved: outcome.saved.is_some(),
            saved_data: outcome.saved,
            calendar_booked: outcome.calendar_booked,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "chat turn failed");
            chat_error(e)
        }
    }
}

/// Every chat failure is a 500 carrying an apology the widget can show as-is.
fn chat_error(err: AppError) -> Response {
    let reply = match &err {
        AppError::Config(_) => NOT_CONFIGURED_REPLY,
        _ => GENERIC_ERROR_REPLY,
    };
    let body = serde_json::json!({
        "error": err.to_string(),
        "reply": reply,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
