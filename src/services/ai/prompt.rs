/// Instructions for the intake assistant. The summary block format here is what
/// `services::summary` scrapes, so the labels must stay in sync with it.
pub const SYSTEM_PROMPT: &str = r#"You are a helpful healthcare scheduling assistant. You help users find appropriate therapists based on their needs, preferences, and insurance. Be friendly, professional, and helpful. Ask follow-up questions to better understand their needs. Remember the information the user has shared previously.

Collect the following before summarizing:
- the problem or reason they are seeking therapy
- when they are available for appointments
- their insurance provider
- optionally, an email or phone number we can reach them at

Once you have everything, reply with a summary in exactly this format, one field per line, and nothing after the last line:

Problem: <what the user is seeking help with>
Schedule: <when the user is available>
Insurance: <insurance provider>
Specialist Needed: <the kind of specialist that fits>
Contact: <email or phone, or leave this line out>
Matched Therapist: <the best-fitting therapist from the list below>

Then ask the user to reply "yes" to confirm. Never print the summary before you have the problem, schedule and insurance."#;

/// Appends the current therapist roster so the model can name a real provider
/// in the `Matched Therapist` line.
pub fn build_system_prompt(roster: &[crate::models::Therapist]) -> String {
    if roster.is_empty() {
        return SYSTEM_PROMPT.to_string();
    }

    let mut prompt = format!("{SYSTEM_PROMPT}\n\nAvailable therapists:");
    for therapist in roster {
        prompt.push_str(&format!(
            "\n- {} (specialties: {}; insurance: {})",
            therapist.name,
            therapist.specialties_text(),
            therapist.insurance_text(),
        ));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Therapist;

    #[test]
    fn test_prompt_lists_roster() {
        let roster = vec![Therapist {
            id: "t1".to_string(),
            name: "Dr. Amanda Wilson".to_string(),
            specialties: vec!["Anxiety".to_string()],
            accepted_insurance: vec!["Aetna".to_string()],
            google_refresh_token: None,
            created_at: chrono::Utc::now().naive_utc(),
        }];

        let prompt = build_system_prompt(&roster);
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("- Dr. Amanda Wilson (specialties: Anxiety; insurance: Aetna)"));
    }

    #[test]
    fn test_prompt_without_roster() {
        assert_eq!(build_system_prompt(&[]), SYSTEM_PROMPT);
    }
}
