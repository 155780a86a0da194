use std::sync::Arc;

use crate::config::UnmatchedInquiryPolicy;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{ChatMessage, Inquiry, InquiryStatus, IntakeSummary, NewInquiry, Therapist};
use crate::services::ai::prompt::build_system_prompt;
use crate::services::confirmation::is_confirmation;
use crate::services::matcher::match_therapist;
use crate::services::summary::find_summary;
use crate::state::AppState;

const EMPTY_REPLY_FALLBACK: &str = "I'm sorry, I couldn't process your request.";
const BOOKING_FAILED_NOTE: &str = "I saved your information, but I wasn't able to add the appointment to the calendar. Our team will follow up to confirm a time.";

/// Result of one chat turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: String,
    pub conversation_history: Vec<ChatMessage>,
    pub saved: Option<Inquiry>,
    /// `None` when no booking was attempted this turn.
    pub calendar_booked: Option<bool>,
}

/// Runs one user turn: ask the model, then persist the summary the user just
/// confirmed, if any.
pub async fn process_turn(
    state: &Arc<AppState>,
    message_text: &str,
    history: Vec<ChatMessage>,
) -> Result<TurnOutcome, AppError> {
    state.config.require_openai_key()?;

    let therapists = {
        let db = state.db()?;
        queries::list_therapists(&db)?
    };

    let mut messages = history.clone();
    messages.push(ChatMessage::user(message_text));

    let system_prompt = build_system_prompt(&therapists);
    let reply = state
        .llm
        .chat(&system_prompt, &messages)
        .await
        .map_err(|e| AppError::Ai(e.to_string()))?;
    let reply = if reply.trim().is_empty() {
        EMPTY_REPLY_FALLBACK.to_string()
    } else {
        reply
    };

    let confirmed = is_confirmation(message_text);
    let summary = find_summary(&reply, &history);

    tracing::info!(
        confirmed,
        summary_found = summary.is_some(),
        history_len = history.len(),
        "processed chat turn"
    );

    let mut outcome_reply = reply.clone();
    let mut saved = None;
    let mut calendar_booked = None;

    if let (true, Some(summary)) = (confirmed, summary) {
        if let Some((inquiry, therapist)) = record_inquiry(state, &summary, &therapists)? {
            if let Some(therapist) = therapist {
                let booked = book_calendar(state, therapist, &inquiry).await;
                if booked {
                    outcome_reply.push_str(&format!(
                        "\n\nYour session has been added to {}'s calendar.",
                        therapist.name
                    ));
                } else {
                    outcome_reply.push_str("\n\n");
                    outcome_reply.push_str(BOOKING_FAILED_NOTE);
                }
                calendar_booked = Some(booked);
            }
            saved = Some(inquiry);
        }
    }

    messages.push(ChatMessage::assistant(reply));

    Ok(TurnOutcome {
        reply: outcome_reply,
        conversation_history: messages,
        saved,
        calendar_booked,
    })
}

/// Matches a therapist and inserts the inquiry row. Returns `None` when the
/// unmatched policy says to skip.
fn record_inquiry<'a>(
    state: &Arc<AppState>,
    summary: &IntakeSummary,
    therapists: &'a [Therapist],
) -> Result<Option<(Inquiry, Option<&'a Therapist>)>, AppError> {
    let matched = match_therapist(
        summary.matched_therapist.as_deref(),
        &summary.specialist_needed,
        &summary.insurance,
        therapists,
    );

    if matched.is_none() && state.config.unmatched_policy == UnmatchedInquiryPolicy::Skip {
        tracing::info!(
            extracted_name = ?summary.matched_therapist,
            "no therapist matched, skipping inquiry"
        );
        return Ok(None);
    }

    let inquiry = new_inquiry(summary, matched.map(|(t, _)| t));
    let saved = {
        let db = state.db()?;
        queries::insert_inquiry(&db, &inquiry)?
    };

    tracing::info!(
        inquiry_id = %saved.id,
        therapist_id = ?saved.matched_therapist_id,
        match_kind = matched.map(|(_, kind)| kind.as_str()).unwrap_or("none"),
        status = saved.status.as_str(),
        "inquiry saved"
    );

    Ok(Some((saved, matched.map(|(t, _)| t))))
}

fn new_inquiry(summary: &IntakeSummary, therapist: Option<&Therapist>) -> NewInquiry {
    let patient_identifier = summary
        .contact
        .clone()
        .unwrap_or_else(|| format!("anonymous-{}", uuid::Uuid::new_v4()));

    NewInquiry {
        id: uuid::Uuid::new_v4().to_string(),
        patient_identifier,
        problem_description: summary.problem.clone(),
        requested_schedule: summary.schedule.clone(),
        insurance_info: summary.insurance.clone(),
        extracted_specialty: summary.specialist_needed.clone(),
        matched_therapist_id: therapist.map(|t| t.id.clone()),
        status: if therapist.is_some() {
            InquiryStatus::Matched
        } else {
            InquiryStatus::Pending
        },
    }
}

/// Best-effort: failures are logged and reported in the reply, never rolled back.
async fn book_calendar(state: &Arc<AppState>, therapist: &Therapist, inquiry: &Inquiry) -> bool {
    match state
        .calendar
        .book_session(therapist.google_refresh_token.as_deref())
        .await
    {
        Ok(event) => {
            tracing::info!(
                inquiry_id = %inquiry.id,
                therapist_id = %therapist.id,
                event_id = %event.event_id,
                "calendar session booked"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                inquiry_id = %inquiry.id,
                therapist_id = %therapist.id,
                "calendar booking failed"
            );
            false
        }
    }
}
