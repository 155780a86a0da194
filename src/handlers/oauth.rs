use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::admin::check_auth;
use crate::services::oauth;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub therapist_id: Option<String>,
}

// GET /oauth/google
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let admin_path = &state.config.admin_redirect_path;

    if let Some(error) = query.error {
        tracing::warn!(error = %error, "OAuth provider returned an error");
        return Ok(redirect(format!(
            "{admin_path}?calendar_error={}",
            sanitize_error_code(&error)
        )));
    }

    let Some(code) = query.code else {
        return Err(AppError::BadRequest("Missing authorization code".to_string()));
    };
    let encoded_state = query
        .state
        .ok_or_else(|| AppError::BadRequest("State parameter is missing".to_string()))?;
    let therapist_id = oauth::decode_state(&encoded_state)?;

    let tokens = state
        .calendar
        .exchange_code(&code)
        .await
        .map_err(|e| AppError::OAuth(e.to_string()))?;
    let refresh_token = tokens
        .refresh_token
        .ok_or_else(|| AppError::OAuth("provider did not return a refresh token".to_string()))?;

    let updated = {
        let db = state.db()?;
        queries::set_therapist_refresh_token(&db, &therapist_id, &refresh_token)?
    };
    if !updated {
        return Err(AppError::NotFound(format!("therapist {therapist_id}")));
    }

    tracing::info!(therapist_id = %therapist_id, "therapist calendar connected");
    Ok(redirect(format!("{admin_path}?calendar_connected=true")))
}

// POST /oauth/google
pub async fn start(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<StartRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let therapist_id = body
        .therapist_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Therapist ID is required".to_string()))?;

    let exists = {
        let db = state.db()?;
        queries::get_therapist(&db, &therapist_id)?.is_some()
    };
    if !exists {
        return Err(AppError::NotFound(format!("therapist {therapist_id}")));
    }

    let oauth_url = oauth::authorization_url(&state.config, &therapist_id)?;
    Ok(Json(serde_json::json!({ "oauthUrl": oauth_url })))
}

fn redirect(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Provider error codes are short identifiers like `access_denied`; anything
/// else is dropped so it cannot break the Location header.
fn sanitize_error_code(error: &str) -> String {
    error
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}
