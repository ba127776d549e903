//! Field rules shared by both form validators.
//!
//! Checks run in a fixed order: required fields, email format, form-specific selection
//! rules, then length caps and enumerated values. The first failing stage is reported.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$")
        .expect("valid email regex")
});

/// A single field that failed a length or value constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub reason: String,
}

/// Validation errors raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Please select at least one area of interest")]
    NoDomainsSelected,
    #[error("Validation failed")]
    Invalid(Vec<FieldViolation>),
    #[error("Malformed request body")]
    MalformedBody(String),
}

impl ValidationError {
    /// Human-readable detail for the response body, when there is any.
    pub fn details(&self) -> Option<String> {
        match self {
            ValidationError::Invalid(violations) => Some(
                violations
                    .iter()
                    .map(|violation| format!("{}: {}", violation.field, violation.reason))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ValidationError::MalformedBody(detail) => Some(detail.clone()),
            _ => None,
        }
    }
}

pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate)
}

/// Accumulates findings while a validator walks the payload.
#[derive(Debug, Default)]
pub(crate) struct FieldCheck {
    missing: Vec<&'static str>,
    violations: Vec<FieldViolation>,
}

impl FieldCheck {
    /// Trimmed value of a required field; records it as missing when absent or blank.
    pub(crate) fn required(&mut self, field: &'static str, value: Option<String>) -> String {
        let trimmed = trimmed(value);
        if trimmed.is_empty() {
            self.missing.push(field);
        }
        trimmed
    }

    /// Trimmed value of an optional field, empty when absent.
    pub(crate) fn optional(&mut self, field: &'static str, value: Option<String>, max: usize) -> String {
        let trimmed = trimmed(value);
        self.max_len(field, &trimmed, max);
        trimmed
    }

    pub(crate) fn max_len(&mut self, field: &'static str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.violations.push(FieldViolation {
                field,
                reason: format!("must be at most {max} characters (found {len})"),
            });
        }
    }

    pub(crate) fn reject(&mut self, field: &'static str, reason: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            reason: reason.into(),
        });
    }

    pub(crate) fn ensure_present(&self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(self.missing.clone()))
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        self.ensure_present()?;
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(self.violations))
        }
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|raw| raw.trim().to_string()).unwrap_or_default()
}

/// Checks the (already trimmed) address and returns its stored, lower-cased form.
pub(crate) fn normalize_email(email: &str) -> Result<String, ValidationError> {
    if is_valid_email(email) {
        Ok(email.to_lowercase())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}
