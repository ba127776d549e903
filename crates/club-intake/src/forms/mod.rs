//! The two form slices and the pieces they share.

pub mod contact;
pub mod error;
pub mod query;
pub mod recruitment;
pub mod validation;

#[cfg(test)]
mod tests;

pub use error::{ConflictSource, SubmissionError};
pub use query::{PageRequest, Pagination};
pub use validation::{FieldViolation, ValidationError};
