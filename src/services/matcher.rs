use crate::models::Therapist;

/// Which rule resolved the therapist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    ExactName,
    CaseInsensitiveName,
    SpecialtyAndInsurance,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::ExactName => "exact_name",
            MatchKind::CaseInsensitiveName => "case_insensitive_name",
            MatchKind::SpecialtyAndInsurance => "specialty_and_insurance",
        }
    }
}

/// Resolves a therapist from the summary fields.
///
/// Tries, in order: exact name, case-insensitive name, then the first therapist
/// whose specialties contain `specialty` and whose accepted insurance contains
/// `insurance` (both case-insensitive substrings). List order breaks ties.
pub fn match_therapist<'a>(
    name: Option<&str>,
    specialty: &str,
    insurance: &str,
    therapists: &'a [Therapist],
) -> Option<(&'a Therapist, MatchKind)> {
    if let Some(name) = name {
        if let Some(t) = therapists.iter().find(|t| t.name == name) {
            return Some((t, MatchKind::ExactName));
        }

        let lowered = name.to_lowercase();
        if let Some(t) = therapists.iter().find(|t| t.name.to_lowercase() == lowered) {
            return Some((t, MatchKind::CaseInsensitiveName));
        }
    }

    let specialty = specialty.to_lowercase();
    let insurance = insurance.to_lowercase();
    therapists
        .iter()
        .find(|t| {
            t.specialties_text().to_lowercase().contains(&specialty)
                && t.insurance_text().to_lowercase().contains(&insurance)
        })
        .map(|t| (t, MatchKind::SpecialtyAndInsurance))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn therapist(id: &str, name: &str, specialties: &[&str], insurance: &[&str]) -> Therapist {
        Therapist {
            id: id.to_string(),
            name: name.to_string(),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            accepted_insurance: insurance.iter().map(|s| s.to_string()).collect(),
            google_refresh_token: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn roster() -> Vec<Therapist> {
        vec![
            therapist("t1", "Dr. James Taylor", &["Anxiety", "Family counseling"], &["Aetna"]),
            therapist("t2", "dr. amanda wilson", &["Anxiety"], &["Aetna"]),
            therapist("t3", "Dr. Amanda Wilson", &["Depression"], &["Kaiser"]),
        ]
    }

    #[test]
    fn test_exact_name_wins_over_weaker_rules() {
        let roster = roster();
        let (t, kind) =
            match_therapist(Some("Dr. Amanda Wilson"), "Anxiety", "Aetna", &roster).unwrap();
        assert_eq!(t.id, "t3");
        assert_eq!(kind, MatchKind::ExactName);
    }

    #[test]
    fn test_case_insensitive_name_wins_over_fallback() {
        let roster = roster();
        let (t, kind) =
            match_therapist(Some("DR. JAMES TAYLOR"), "Depression", "Kaiser", &roster).unwrap();
        assert_eq!(t.id, "t1");
        assert_eq!(kind, MatchKind::CaseInsensitiveName);
    }

    #[test]
    fn test_case_insensitive_takes_first_in_list_order() {
        let roster = vec![
            therapist("a", "dr. amanda wilson", &[], &[]),
            therapist("b", "DR. AMANDA WILSON", &[], &[]),
        ];
        let (t, kind) = match_therapist(Some("Dr. Amanda Wilson"), "x", "y", &roster).unwrap();
        assert_eq!(t.id, "a");
        assert_eq!(kind, MatchKind::CaseInsensitiveName);
    }

    #[test]
    fn test_fallback_requires_specialty_and_insurance() {
        let roster = roster();
        let (t, kind) = match_therapist(Some("Dr. Nobody"), "depression", "kaiser", &roster).unwrap();
        assert_eq!(t.id, "t3");
        assert_eq!(kind, MatchKind::SpecialtyAndInsurance);

        // Specialty matches t3 but insurance does not.
        assert!(match_therapist(None, "Depression", "Aetna", &roster).is_none());
    }

    #[test]
    fn test_fallback_uses_substring_and_list_order() {
        let roster = roster();
        let (t, _) = match_therapist(None, "anx", "AET", &roster).unwrap();
        assert_eq!(t.id, "t1");
    }

    #[test]
    fn test_no_match() {
        assert!(match_therapist(Some("Dr. X"), "Sleep", "Cigna", &roster()).is_none());
        assert!(match_therapist(Some("Dr. X"), "Sleep", "Cigna", &[]).is_none());
    }
}
