use std::sync::Arc;

use serde::Serialize;

use super::domain::{ContactMessage, ContactSubmission};
use super::query::ContactListQuery;
use super::repository::ContactRepository;
use super::validation::validate_contact;
use crate::forms::error::SubmissionError;
use crate::forms::query::Pagination;
use crate::store::{timestamp_now, RepositoryError};

/// One page of contact messages with its pagination block.
#[derive(Debug, Clone, Serialize)]
pub struct ContactPage {
    pub contacts: Vec<ContactMessage>,
    pub pagination: Pagination,
}

/// Service composing the contact validator and repository.
pub struct ContactService<R> {
    repository: Arc<R>,
}

impl<R> ContactService<R>
where
    R: ContactRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and store a contact form submission.
    pub async fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactMessage, SubmissionError> {
        let message = validate_contact(submission, timestamp_now())?;
        let stored = self.repository.create(message).await?;
        tracing::info!(id = %stored.id, "contact message stored");
        Ok(stored)
    }

    /// Fetch one page of messages plus the total matching the filter.
    pub async fn list(&self, query: &ContactListQuery) -> Result<ContactPage, RepositoryError> {
        let filter = query.filter();
        let page = query.page_request();

        let (contacts, total) = tokio::try_join!(
            self.repository.find(&filter, page.window()),
            self.repository.count(&filter),
        )?;

        Ok(ContactPage {
            contacts,
            pagination: page.pagination(total),
        })
    }
}
