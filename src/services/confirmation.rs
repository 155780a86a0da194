/// Replies treated as "yes, proceed". Matching is exact after trimming and
/// lower-casing; there is no fuzzy or negation handling.
const CONFIRMATION_PHRASES: &[&str] = &[
    "yes",
    "y",
    "yeah",
    "yep",
    "ok",
    "okay",
    "sure",
    "correct",
    "confirm",
    "confirmed",
    "that's correct",
    "that is correct",
    "looks good",
    "sounds good",
];

pub fn is_confirmation(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    CONFIRMATION_PHRASES.contains(&normalized.as_str())
}
