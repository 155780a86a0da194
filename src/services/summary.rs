use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ChatMessage, IntakeSummary, Role};

/// `<Label>:` followed by the rest of that line. Spaces and tabs right after the
/// colon are skipped; the capture never crosses a line break.
fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"{}:[ \t]*([^\r\n]+)", regex::escape(label)))
        .expect("summary label pattern is a valid regex")
}

static PROBLEM: LazyLock<Regex> = LazyLock::new(|| label_pattern("Problem"));
static SCHEDULE: LazyLock<Regex> = LazyLock::new(|| label_pattern("Schedule"));
static INSURANCE: LazyLock<Regex> = LazyLock::new(|| label_pattern("Insurance"));
static SPECIALIST: LazyLock<Regex> = LazyLock::new(|| label_pattern("Specialist Needed"));
static CONTACT: LazyLock<Regex> = LazyLock::new(|| label_pattern("Contact"));
static MATCHED_THERAPIST: LazyLock<Regex> = LazyLock::new(|| label_pattern("Matched Therapist"));

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Extracts the labeled summary block from one assistant reply.
///
/// Returns `None` unless `Problem`, `Schedule`, `Insurance` and
/// `Specialist Needed` are all present. `Contact` and `Matched Therapist` are
/// optional. Values are taken verbatim.
pub fn parse_summary(text: &str) -> Option<IntakeSummary> {
    Some(IntakeSummary {
        problem: capture(&PROBLEM, text)?,
        schedule: capture(&SCHEDULE, text)?,
        insurance: capture(&INSURANCE, text)?,
        specialist_needed: capture(&SPECIALIST, text)?,
        contact: capture(&CONTACT, text),
        matched_therapist: capture(&MATCHED_THERAPIST, text),
    })
}

/// Looks for a complete summary in the new reply, then in the assistant reply
/// the user is answering (the last assistant message in `history`).
pub fn find_summary(latest_reply: &str, history: &[ChatMessage]) -> Option<IntakeSummary> {
    parse_summary(latest_reply).or_else(|| {
        history
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .and_then(|m| parse_summary(&m.content))
    })
}
