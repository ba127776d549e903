use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::validation::ValidationError;
use crate::store::RepositoryError;

/// Which uniqueness rule a conflicting submission tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictSource {
    /// An existing record was found before writing.
    ExistingRecord,
    /// The store's unique index rejected the write.
    DuplicateKey,
}

/// Outcome taxonomy for form submissions.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("submission conflicts with an existing record")]
    Conflict(ConflictSource),
    #[error("store unavailable: {0}")]
    Transient(String),
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl From<RepositoryError> for SubmissionError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => Self::Conflict(ConflictSource::DuplicateKey),
            RepositoryError::Rejected(detail) => {
                Self::Validation(ValidationError::Invalid(vec![super::validation::FieldViolation {
                    field: "document",
                    reason: detail,
                }]))
            }
            RepositoryError::Unavailable(detail) => Self::Transient(detail),
            RepositoryError::Unknown(detail) => Self::Unknown(detail),
        }
    }
}

impl SubmissionError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Conflict(_) => StatusCode::CONFLICT,
            SubmissionError::Transient(_) | SubmissionError::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Conflict wording for each form; the rest of the error body is shared.
pub(crate) struct ConflictMessages {
    pub(crate) existing_record: &'static str,
    pub(crate) duplicate_key: &'static str,
}

/// Renders a submission failure, logging it at a level matching its severity. Store
/// details stay in the log and never reach the body.
pub(crate) fn submission_error_response(
    form: &'static str,
    error: SubmissionError,
    conflicts: &ConflictMessages,
) -> Response {
    let status = error.status();
    let payload = match &error {
        SubmissionError::Validation(validation) => {
            tracing::warn!(form, %validation, "submission rejected");
            match validation {
                ValidationError::MissingFields(fields) => {
                    json!({ "error": validation.to_string(), "fields": fields })
                }
                other => match other.details() {
                    Some(details) => json!({ "error": other.to_string(), "details": details }),
                    None => json!({ "error": other.to_string() }),
                },
            }
        }
        SubmissionError::Conflict(source) => {
            tracing::warn!(form, ?source, "duplicate submission");
            let message = match source {
                ConflictSource::ExistingRecord => conflicts.existing_record,
                ConflictSource::DuplicateKey => conflicts.duplicate_key,
            };
            json!({ "error": message })
        }
        SubmissionError::Transient(detail) | SubmissionError::Unknown(detail) => {
            tracing::error!(form, error = %detail, "submission failed");
            json!({ "error": "Internal server error" })
        }
    };

    (status, Json(payload)).into_response()
}

/// Renders a failed list request as a generic 500.
pub(crate) fn list_error_response(
    form: &'static str,
    error: RepositoryError,
    message: &'static str,
) -> Response {
    tracing::error!(form, %error, "list query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
