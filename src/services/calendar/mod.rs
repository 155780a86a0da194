pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Event created by a booking, as reported back to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookedEvent {
    pub event_id: String,
    pub event_details: EventDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDetails {
    pub summary: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Tokens returned by the provider's authorization-code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Books the configured session window. `refresh_token` overrides the
    /// process-level token when a therapist has connected their own calendar.
    async fn book_session(&self, refresh_token: Option<&str>) -> anyhow::Result<BookedEvent>;

    /// Trades an OAuth callback `code` for tokens.
    async fn exchange_code(&self, code: &str) -> anyhow::Result<TokenGrant>;
}
