use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: String,
    pub patient_identifier: String,
    pub problem_description: String,
    pub requested_schedule: String,
    pub insurance_info: String,
    pub extracted_specialty: String,
    pub matched_therapist_id: Option<String>,
    pub status: InquiryStatus,
    pub created_at: NaiveDateTime,
}

/// Row contents before storage assigns `created_at`.
#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub id: String,
    pub patient_identifier: String,
    pub problem_description: String,
    pub requested_schedule: String,
    pub insurance_info: String,
    pub extracted_specialty: String,
    pub matched_therapist_id: Option<String>,
    pub status: InquiryStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Pending,
    Matched,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "pending",
            InquiryStatus::Matched => "matched",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "matched" => InquiryStatus::Matched,
            _ => InquiryStatus::Pending,
        }
    }
}
