use chrono::{DateTime, Utc};

use super::domain::{ContactStatus, ContactSubmission, NewContactMessage};
use crate::forms::validation::{normalize_email, FieldCheck, ValidationError};

pub const NAME_MAX: usize = 100;
pub const PHONE_MAX: usize = 20;
pub const SUBJECT_MAX: usize = 200;
pub const MESSAGE_MAX: usize = 1000;

/// Turns a raw submission into a storable message stamped with `received_at`.
pub fn validate_contact(
    submission: ContactSubmission,
    received_at: DateTime<Utc>,
) -> Result<NewContactMessage, ValidationError> {
    let mut check = FieldCheck::default();

    let name = check.required("name", submission.name);
    let email = check.required("email", submission.email);
    let subject = check.required("subject", submission.subject);
    let message = check.required("message", submission.message);
    check.ensure_present()?;

    let email = normalize_email(&email)?;

    let phone = check.optional("phone", submission.phone, PHONE_MAX);
    check.max_len("name", &name, NAME_MAX);
    check.max_len("subject", &subject, SUBJECT_MAX);
    check.max_len("message", &message, MESSAGE_MAX);
    check.finish()?;

    Ok(NewContactMessage {
        name,
        email,
        phone,
        subject,
        message,
        status: ContactStatus::New,
        created_at: received_at,
    })
}
