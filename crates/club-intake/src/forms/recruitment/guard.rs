use std::sync::Arc;

use super::domain::NewApplication;
use super::repository::RecruitmentRepository;
use crate::forms::error::{ConflictSource, SubmissionError};

/// Pre-write duplicate check on email and student id.
///
/// This narrows but does not close the window between check and insert; the repository's
/// own uniqueness enforcement decides concurrent submissions.
pub struct UniquenessGuard<R> {
    repository: Arc<R>,
}

impl<R> UniquenessGuard<R>
where
    R: RecruitmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn ensure_unique(&self, application: &NewApplication) -> Result<(), SubmissionError> {
        let existing = self
            .repository
            .find_existing(&application.details.email, &application.details.student_id)
            .await?;

        match existing {
            Some(found) => {
                tracing::debug!(existing = %found.id, "application matches a stored record");
                Err(SubmissionError::Conflict(ConflictSource::ExistingRecord))
            }
            None => Ok(()),
        }
    }
}
