use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Inquiry, Therapist};
use crate::state::AppState;

pub fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Unauthorized("Missing or invalid authorization header".to_string())
        })?;

    if expected_token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized("Invalid authentication token".to_string()));
    }
    Ok(())
}

const DEFAULT_INQUIRY_LIMIT: i64 = 50;
const MAX_INQUIRY_LIMIT: i64 = 500;

// GET /api/admin/inquiries
#[derive(Deserialize)]
pub struct InquiriesQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_inquiries(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<InquiriesQuery>,
) -> Result<Json<Vec<Inquiry>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(DEFAULT_INQUIRY_LIMIT).clamp(1, MAX_INQUIRY_LIMIT);
    let inquiries = {
        let db = state.db()?;
        queries::list_inquiries(&db, query.status.as_deref(), limit)?
    };

    Ok(Json(inquiries))
}

// GET /api/admin/therapists
#[derive(Serialize)]
pub struct TherapistResponse {
    id: String,
    name: String,
    specialties: Vec<String>,
    accepted_insurance: Vec<String>,
    calendar_connected: bool,
    created_at: String,
}

impl From<Therapist> for TherapistResponse {
    fn from(t: Therapist) -> Self {
        let calendar_connected = t.calendar_connected();
        Self {
            id: t.id,
            name: t.name,
            specialties: t.specialties,
            accepted_insurance: t.accepted_insurance,
            calendar_connected,
            created_at: t.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub async fn get_therapists(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<TherapistResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let therapists = {
        let db = state.db()?;
        queries::list_therapists(&db)?
    };

    Ok(Json(therapists.into_iter().map(TherapistResponse::from).collect()))
}

// POST /api/admin/therapists
#[derive(Deserialize)]
pub struct CreateTherapistRequest {
    pub name: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub accepted_insurance: Vec<String>,
}

pub async fn create_therapist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateTherapistRequest>,
) -> Result<(StatusCode, Json<TherapistResponse>), AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let therapist = {
        let db = state.db()?;
        queries::create_therapist(&db, name, &body.specialties, &body.accepted_insurance)?
    };

    tracing::info!(therapist_id = %therapist.id, "therapist created");
    Ok((StatusCode::CREATED, Json(therapist.into())))
}
