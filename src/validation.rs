// Field-scoped input validation for the review and booking forms.
// Validation never touches the network; a failed check halts the submission
// locally with one error per offending field.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

// A single invalid field, surfaced inline next to the input it belongs to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn mobile_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{10}$").unwrap())
}

pub fn validate_name(name: &str) -> Result<(), FieldError> {
    if name.trim().is_empty() {
        return Err(FieldError::new("name", "name is required"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if email.trim().is_empty() {
        return Err(FieldError::new("email", "email is required"));
    }
    if !email_regex().is_match(email) {
        return Err(FieldError::new("email", "invalid email"));
    }
    Ok(())
}

// Mobile numbers are exactly ten digits, no separators.
pub fn validate_mobile_no(mobile_no: &str) -> Result<(), FieldError> {
    if mobile_no.trim().is_empty() {
        return Err(FieldError::new("mobile_no", "mobile number is required"));
    }
    if !mobile_regex().is_match(mobile_no) {
        return Err(FieldError::new("mobile_no", "invalid mobile number"));
    }
    Ok(())
}

// The booker occupies one slot, so companions are capped one below the
// tour's traveller limit.
pub fn validate_companions(companions: u32, traveller_limit: u32) -> Result<(), FieldError> {
    let max_companions = traveller_limit.saturating_sub(1);
    if companions > max_companions {
        return Err(FieldError::new(
            "companions",
            format!("at most {} companions allowed", max_companions),
        ));
    }
    Ok(())
}

pub fn validate_rating(rating: u8) -> Result<(), FieldError> {
    if !(1..=5).contains(&rating) {
        return Err(FieldError::new("rating", "rating must be between 1 and 5"));
    }
    Ok(())
}

pub fn validate_review_content(content: &str) -> Result<(), FieldError> {
    if content.trim().is_empty() {
        return Err(FieldError::new("content", "review text is required"));
    }
    Ok(())
}
