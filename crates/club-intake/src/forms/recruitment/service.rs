use std::sync::Arc;

use serde::Serialize;

use super::domain::{RecruitmentApplication, RecruitmentSubmission};
use super::guard::UniquenessGuard;
use super::query::ApplicationListQuery;
use super::repository::{ApplicationGrouping, RecruitmentRepository};
use super::validation::validate_application;
use crate::forms::error::SubmissionError;
use crate::forms::query::Pagination;
use crate::store::{timestamp_now, GroupCount, RepositoryError};

/// Collection-wide counts reported next to every application page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatistics {
    pub by_status: Vec<GroupCount>,
    pub by_domain: Vec<GroupCount>,
}

/// One page of applications with pagination and statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationPage {
    pub applications: Vec<RecruitmentApplication>,
    pub pagination: Pagination,
    pub statistics: ApplicationStatistics,
}

/// Service composing validation, the uniqueness guard, and the repository.
pub struct RecruitmentService<R> {
    guard: UniquenessGuard<R>,
    repository: Arc<R>,
}

impl<R> RecruitmentService<R>
where
    R: RecruitmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            guard: UniquenessGuard::new(repository.clone()),
            repository,
        }
    }

    /// Validate, de-duplicate, and store an application.
    pub async fn submit(
        &self,
        submission: RecruitmentSubmission,
    ) -> Result<RecruitmentApplication, SubmissionError> {
        let application = validate_application(submission, timestamp_now())?;
        self.guard.ensure_unique(&application).await?;

        let stored = self.repository.create(application).await?;
        tracing::info!(
            id = %stored.id,
            domains = stored.details.selected_domains.len(),
            "recruitment application stored"
        );
        Ok(stored)
    }

    /// Fetch one page of applications together with the status and domain reports.
    pub async fn list(
        &self,
        query: &ApplicationListQuery,
    ) -> Result<ApplicationPage, RepositoryError> {
        let filter = query.filter();
        let page = query.page_request();

        let (applications, total, by_status, by_domain) = tokio::try_join!(
            self.repository.find(&filter, page.window()),
            self.repository.count(&filter),
            self.repository.count_by(ApplicationGrouping::Status),
            self.repository.count_by(ApplicationGrouping::SelectedDomain),
        )?;

        Ok(ApplicationPage {
            applications,
            pagination: page.pagination(total),
            statistics: ApplicationStatistics {
                by_status,
                by_domain,
            },
        })
    }
}
