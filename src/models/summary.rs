use serde::Serialize;

/// Fields scraped from the assistant's labeled summary block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeSummary {
    pub problem: String,
    pub schedule: String,
    pub insurance: String,
    pub specialist_needed: String,
    pub contact: Option<String>,
    pub matched_therapist: Option<String>,
}
