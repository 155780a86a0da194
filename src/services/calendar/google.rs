use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{BookedEvent, CalendarProvider, EventDetails, TokenGrant};
use crate::config::{AppConfig, EventSettings};

pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

pub struct GoogleCalendarProvider {
    client_id: String,
    client_secret: String,
    default_refresh_token: String,
    redirect_uri: String,
    event: EventSettings,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct EventTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
}

#[derive(Deserialize)]
struct InsertedEvent {
    id: String,
    summary: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
}

impl GoogleCalendarProvider {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            default_refresh_token: config.google_refresh_token.clone(),
            redirect_uri: config.oauth_redirect_uri.clone(),
            event: config.event.clone(),
            client: reqwest::Client::new(),
        }
    }

    async fn access_token(&self, refresh_token: &str) -> anyhow::Result<String> {
        tracing::debug!("exchanging refresh token for access token");
        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("failed to call token endpoint")?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Token exchange failed: {body}");
        }

        let token: AccessTokenResponse =
            resp.json().await.context("failed to parse token response")?;
        Ok(token.access_token)
    }
}

/// Request body for the fixed session window. Times are sent as UTC with
/// millisecond precision alongside the configured time zone.
pub fn event_payload(event: &EventSettings) -> anyhow::Result<serde_json::Value> {
    let start = DateTime::parse_from_rfc3339(&event.start)
        .with_context(|| format!("invalid calendar event start: {}", event.start))?
        .with_timezone(&Utc);
    let end = start + Duration::minutes(event.duration_minutes);

    Ok(json!({
        "summary": event.name,
        "description": event.description,
        "start": {
            "dateTime": start.to_rfc3339_opts(SecondsFormat::Millis, true),
            "timeZone": event.time_zone,
        },
        "end": {
            "dateTime": end.to_rfc3339_opts(SecondsFormat::Millis, true),
            "timeZone": event.time_zone,
        },
    }))
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn book_session(&self, refresh_token: Option<&str>) -> anyhow::Result<BookedEvent> {
        let refresh_token = refresh_token
            .filter(|t| !t.is_empty())
            .unwrap_or(self.default_refresh_token.as_str());

        if self.client_id.is_empty() || self.client_secret.is_empty() || refresh_token.is_empty() {
            anyhow::bail!("Missing one or more Google OAuth environment variables");
        }

        let payload = event_payload(&self.event)?;
        let token = self.access_token(refresh_token).await?;

        let resp = self
            .client
            .post(EVENTS_URL)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .context("failed to call calendar API")?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Calendar insert failed: {body}");
        }

        let inserted: InsertedEvent = resp
            .json()
            .await
            .context("failed to parse calendar API response")?;

        tracing::info!(event_id = %inserted.id, "calendar event created");

        Ok(BookedEvent {
            event_id: inserted.id,
            event_details: EventDetails {
                summary: inserted.summary,
                start: inserted.start.and_then(|t| t.date_time),
                end: inserted.end.and_then(|t| t.date_time),
            },
        })
    }

    async fn exchange_code(&self, code: &str) -> anyhow::Result<TokenGrant> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            anyhow::bail!("GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set");
        }

        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("failed to call token endpoint")?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to exchange code: {body}");
        }

        resp.json().await.context("failed to parse token response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_config() -> AppConfig {
        AppConfig {
            port: 3000,
            database_url: ":memory:".to_string(),
            admin_token: "t".to_string(),
            openai_api_key: String::new(),
            openai_model: "gpt-3.5-turbo".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            google_client_id: String::new(),
            google_client_secret: String::new(),
            google_refresh_token: String::new(),
            oauth_redirect_uri: "http://localhost:3000/oauth/google".to_string(),
            admin_redirect_path: "/admin/therapists".to_string(),
            event: EventSettings::default(),
            unmatched_policy: crate::config::UnmatchedInquiryPolicy::SavePending,
        }
    }

    #[test]
    fn test_event_payload_default_window() {
        let payload = event_payload(&EventSettings::default()).unwrap();
        assert_eq!(payload["summary"], "Therapy Session");
        assert_eq!(payload["start"]["dateTime"], "2025-05-15T23:00:00.000Z");
        assert_eq!(payload["end"]["dateTime"], "2025-05-16T00:00:00.000Z");
        assert_eq!(payload["start"]["timeZone"], "America/Los_Angeles");
    }

    #[test]
    fn test_event_payload_custom_duration() {
        let settings = EventSettings {
            start: "2025-06-02T09:30:00Z".to_string(),
            duration_minutes: 45,
            ..EventSettings::default()
        };
        let payload = event_payload(&settings).unwrap();
        assert_eq!(payload["end"]["dateTime"], "2025-06-02T10:15:00.000Z");
    }

    #[test]
    fn test_event_payload_rejects_bad_start() {
        let settings = EventSettings {
            start: "next tuesday".to_string(),
            ..EventSettings::default()
        };
        assert!(event_payload(&settings).is_err());
    }

    #[tokio::test]
    async fn test_book_session_requires_credentials() {
        let provider = GoogleCalendarProvider::new(&empty_config());
        let err = provider.book_session(Some("1//therapist")).await.unwrap_err();
        assert!(err.to_string().contains("Missing one or more Google OAuth"));
    }

    #[tokio::test]
    async fn test_exchange_code_requires_credentials() {
        let provider = GoogleCalendarProvider::new(&empty_config());
        assert!(provider.exchange_code("abc").await.is_err());
    }
}
