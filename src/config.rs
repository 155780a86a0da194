use std::env;

use crate::errors::AppError;

/// What to do with a confirmed summary when no therapist could be resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnmatchedInquiryPolicy {
    /// Save the inquiry with a null therapist and status `pending`.
    SavePending,
    /// Save nothing.
    Skip,
}

impl UnmatchedInquiryPolicy {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "skip" => UnmatchedInquiryPolicy::Skip,
            _ => UnmatchedInquiryPolicy::SavePending,
        }
    }
}

/// Fixed window used for every calendar booking.
#[derive(Clone, Debug)]
pub struct EventSettings {
    pub name: String,
    pub description: String,
    /// RFC 3339 start time, e.g. `2025-05-15T16:00:00-07:00`.
    pub start: String,
    pub duration_minutes: i64,
    pub time_zone: String,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            name: "Therapy Session".to_string(),
            description: "Therapy appointment scheduled via healthcare chatbot".to_string(),
            start: "2025-05-15T16:00:00-07:00".to_string(),
            duration_minutes: 60,
            time_zone: "America/Los_Angeles".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_refresh_token: String,
    pub oauth_redirect_uri: String,
    pub admin_redirect_path: String,
    pub event: EventSettings,
    pub unmatched_policy: UnmatchedInquiryPolicy,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = EventSettings::default();
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        Self {
            port,
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "carebot.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            google_refresh_token: env::var("GOOGLE_REFRESH_TOKEN").unwrap_or_default(),
            oauth_redirect_uri: env::var("OAUTH_REDIRECT_URI")
                .unwrap_or_else(|_| format!("http://localhost:{port}/oauth/google")),
            admin_redirect_path: env::var("ADMIN_REDIRECT_PATH")
                .unwrap_or_else(|_| "/admin/therapists".to_string()),
            event: EventSettings {
                name: env::var("CALENDAR_EVENT_NAME").unwrap_or(defaults.name),
                description: defaults.description,
                start: env::var("CALENDAR_EVENT_START").unwrap_or(defaults.start),
                duration_minutes: env::var("CALENDAR_EVENT_DURATION_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.duration_minutes),
                time_zone: env::var("CALENDAR_TIME_ZONE").unwrap_or(defaults.time_zone),
            },
            unmatched_policy: UnmatchedInquiryPolicy::parse(
                &env::var("UNMATCHED_INQUIRY_POLICY").unwrap_or_default(),
            ),
        }
    }

    pub fn require_openai_key(&self) -> Result<&str, AppError> {
        if self.openai_api_key.is_empty() {
            return Err(AppError::Config("API key not configured".to_string()));
        }
        Ok(&self.openai_api_key)
    }
}
