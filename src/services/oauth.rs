use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::AppError;

pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const SCOPES: &str = "https://www.googleapis.com/auth/calendar.events \
                          https://www.googleapis.com/auth/calendar.readonly";

#[derive(Serialize, Deserialize)]
struct OAuthState {
    #[serde(rename = "therapistId")]
    therapist_id: Option<String>,
}

/// Base64 JSON `{"therapistId": ...}` round-tripped through the provider.
pub fn encode_state(therapist_id: &str) -> String {
    let json = serde_json::json!({ "therapistId": therapist_id }).to_string();
    base64::engine::general_purpose::STANDARD.encode(json)
}

pub fn decode_state(state: &str) -> Result<String, AppError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(state.trim())
        .map_err(|e| AppError::BadRequest(format!("invalid state parameter: {e}")))?;
    let decoded: OAuthState = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::BadRequest(format!("invalid state parameter: {e}")))?;

    decoded
        .therapist_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Therapist ID not found in state".to_string()))
}

/// Consent URL a therapist visits to grant offline calendar access.
pub fn authorization_url(config: &AppConfig, therapist_id: &str) -> Result<String, AppError> {
    if config.google_client_id.is_empty() {
        return Err(AppError::Config("GOOGLE_CLIENT_ID is not set".to_string()));
    }

    let state = encode_state(therapist_id);
    let url = reqwest::Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", config.google_client_id.as_str()),
            ("redirect_uri", config.oauth_redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| AppError::Config(format!("invalid OAuth URL: {e}")))?;

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        let state = encode_state("therapist-42");
        assert_eq!(decode_state(&state).unwrap(), "therapist-42");
    }

    #[test]
    fn test_state_matches_btoa_json() {
        // base64 of {"therapistId":"abc"}
        assert_eq!(encode_state("abc"), "eyJ0aGVyYXBpc3RJZCI6ImFiYyJ9");
    }

    #[test]
    fn test_state_without_therapist_id() {
        let state = base64::engine::general_purpose::STANDARD.encode(r#"{"other":1}"#);
        let err = decode_state(&state).unwrap_err();
        assert!(err.to_string().contains("Therapist ID not found"));
    }

    #[test]
    fn test_state_garbage() {
        assert!(matches!(decode_state("%%%"), Err(AppError::BadRequest(_))));
    }
}
