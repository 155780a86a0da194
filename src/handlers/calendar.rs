use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRequest {
    pub therapist_id: Option<String>,
}

/// An empty body books on the process-level calendar; anything else must be
/// a valid request object.
fn parse_request(body: &[u8]) -> Result<CalendarRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CalendarRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid calendar request: {e}")))
}

// POST /api/calendar
pub async fn create_event(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = match parse_request(&body) {
        Ok(request) => book(&state, request.therapist_id.as_deref()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "calendar booking failed");
            let status = match &e {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let body = serde_json::json!({ "success": false, "error": e.to_string() });
            (status, Json(body)).into_response()
        }
    }
}

async fn book(state: &Arc<AppState>, therapist_id: Option<&str>) -> Result<serde_json::Value, AppError> {
    let refresh_token = match therapist_id {
        Some(id) => {
            let therapist = {
                let db = state.db()?;
                queries::get_therapist(&db, id)?
            }
            .ok_or_else(|| AppError::NotFound(format!("therapist {id}")))?;
            therapist.google_refresh_token
        }
        None => None,
    };

    let event = state
        .calendar
        .book_session(refresh_token.as_deref())
        .await
        .map_err(|e| AppError::Calendar(e.to_string()))?;

    Ok(serde_json::json!({
        "success": true,
        "eventId": event.event_id,
        "eventDetails": event.event_details,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_empty_body() {
        assert!(parse_request(b"").unwrap().therapist_id.is_none());
        assert!(parse_request(b"  \n").unwrap().therapist_id.is_none());
        assert!(parse_request(b"{}").unwrap().therapist_id.is_none());
    }

    #[test]
    fn test_parse_request_rejects_invalid_body() {
        assert!(matches!(
            parse_request(br#"{"therapistId": 42}"#),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(parse_request(b"therapist=abc"), Err(AppError::BadRequest(_))));
        assert_eq!(
            parse_request(br#"{"therapistId": "t1"}"#).unwrap().therapist_id.as_deref(),
            Some("t1")
        );
    }
}
