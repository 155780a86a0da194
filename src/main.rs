use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use carebot::config::AppConfig;
use carebot::db;
use carebot::handlers;
use carebot::services::ai::openai::OpenAiProvider;
use carebot::services::calendar::google::GoogleCalendarProvider;
use carebot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; chat requests will fail until it is");
    }
    tracing::info!(
        model = %config.openai_model,
        google_client_id = !config.google_client_id.is_empty(),
        google_client_secret = !config.google_client_secret.is_empty(),
        google_refresh_token = !config.google_refresh_token.is_empty(),
        unmatched_policy = ?config.unmatched_policy,
        "configuration loaded"
    );

    let llm = OpenAiProvider::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.openai_base_url.clone(),
    );
    let calendar = GoogleCalendarProvider::new(&config);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        llm: Box::new(llm),
        calendar: Box::new(calendar),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::handle_chat))
        .route("/api/calendar", post(handlers::calendar::create_event))
        .route(
            "/oauth/google",
            get(handlers::oauth::callback).post(handlers::oauth::start),
        )
        .route("/api/admin/inquiries", get(handlers::admin::get_inquiries))
        .route(
            "/api/admin/therapists",
            get(handlers::admin::get_therapists).post(handlers::admin::create_therapist),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
