use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Therapist {
    pub id: String,
    pub name: String,
    pub specialties: Vec<String>,
    pub accepted_insurance: Vec<String>,
    #[serde(skip_serializing)]
    pub google_refresh_token: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Therapist {
    pub fn specialties_text(&self) -> String {
        self.specialties.join(", ")
    }

    pub fn insurance_text(&self) -> String {
        self.accepted_insurance.join(", ")
    }

    pub fn calendar_connected(&self) -> bool {
        self.google_refresh_token
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }
}
