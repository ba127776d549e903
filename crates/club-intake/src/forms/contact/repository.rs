use async_trait::async_trait;

use super::domain::{ContactMessage, NewContactMessage};
use super::query::ContactFilter;
use crate::store::{PageWindow, RepositoryError};

/// Storage abstraction for contact messages.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Persists a new message and returns it with its generated id.
    async fn create(&self, message: NewContactMessage) -> Result<ContactMessage, RepositoryError>;

    /// Matching messages, newest `createdAt` first, restricted to `window`.
    async fn find(
        &self,
        filter: &ContactFilter,
        window: PageWindow,
    ) -> Result<Vec<ContactMessage>, RepositoryError>;

    async fn count(&self, filter: &ContactFilter) -> Result<u64, RepositoryError>;
}
