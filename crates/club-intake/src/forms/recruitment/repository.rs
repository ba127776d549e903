use async_trait::async_trait;

use super::domain::{NewApplication, RecruitmentApplication};
use super::query::ApplicationFilter;
use crate::store::{GroupCount, PageWindow, RepositoryError};

/// Field an aggregate report groups applications by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationGrouping {
    Status,
    /// One bucket per selected domain; an application lands in each domain it selected.
    SelectedDomain,
}

/// Storage abstraction for recruitment applications.
///
/// Implementations must reject a `create` whose email or student id is already stored with
/// [`RepositoryError::Conflict`], even when the caller checked beforehand.
#[async_trait]
pub trait RecruitmentRepository: Send + Sync {
    async fn create(
        &self,
        application: NewApplication,
    ) -> Result<RecruitmentApplication, RepositoryError>;

    /// First stored application sharing the email or the student id, if any.
    async fn find_existing(
        &self,
        email: &str,
        student_id: &str,
    ) -> Result<Option<RecruitmentApplication>, RepositoryError>;

    /// Matching applications, newest `submittedAt` first, restricted to `window`.
    async fn find(
        &self,
        filter: &ApplicationFilter,
        window: PageWindow,
    ) -> Result<Vec<RecruitmentApplication>, RepositoryError>;

    async fn count(&self, filter: &ApplicationFilter) -> Result<u64, RepositoryError>;

    /// Counts over the whole collection, largest bucket first.
    async fn count_by(&self, grouping: ApplicationGrouping)
        -> Result<Vec<GroupCount>, RepositoryError>;
}
