use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::forms::contact::{
    ContactFilter, ContactMessage, ContactRepository, ContactService, ContactSubmission,
    NewContactMessage,
};
use crate::forms::recruitment::{
    ApplicationFilter, ApplicationGrouping, NewApplication, RecruitmentApplication,
    RecruitmentRepository, RecruitmentService, RecruitmentSubmission,
};
use crate::store::memory::{MemoryContactRepository, MemoryRecruitmentRepository};
use crate::store::{GroupCount, PageWindow, RepositoryError};

pub(super) fn contact_submission() -> ContactSubmission {
    ContactSubmission {
        name: Some("Ada Lovelace".to_string()),
        email: Some("  Ada@Example.COM ".to_string()),
        phone: Some(" +1 (555) 123-4567 ".to_string()),
        subject: Some("Question about IoT projects".to_string()),
        message: Some("How can I get involved with the sensor team?".to_string()),
    }
}

pub(super) fn application(email: &str, student_id: &str) -> RecruitmentSubmission {
    RecruitmentSubmission {
        first_name: Some("Alice".to_string()),
        last_name: Some("Johnson".to_string()),
        email: Some(email.to_string()),
        phone: Some("+1 (555) 111-2222".to_string()),
        student_id: Some(student_id.to_string()),
        year_level: Some("2nd Year".to_string()),
        major: Some("Computer Science".to_string()),
        selected_domains: Some(vec!["coding".to_string(), "technical".to_string()]),
        experience_level: Some("Intermediate (1-3 years)".to_string()),
        previous_experience: Some("Built web apps with React".to_string()),
        skills: Some("Rust, Python, Arduino".to_string()),
        motivation: Some("I want to build real IoT projects.".to_string()),
        availability: Some("Weekdays after 3 PM".to_string()),
        project_ideas: None,
        portfolio_url: None,
        github_url: Some("https://github.com/alicejohnson".to_string()),
        linkedin_url: None,
        additional_info: None,
    }
}

pub(super) fn contact_service() -> (
    ContactService<MemoryContactRepository>,
    Arc<MemoryContactRepository>,
) {
    let repository = Arc::new(MemoryContactRepository::default());
    (ContactService::new(repository.clone()), repository)
}

pub(super) fn recruitment_service() -> (
    RecruitmentService<MemoryRecruitmentRepository>,
    Arc<MemoryRecruitmentRepository>,
) {
    let repository = Arc::new(MemoryRecruitmentRepository::default());
    (RecruitmentService::new(repository.clone()), repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Always fails as if the database were offline.
pub(super) struct UnavailableRepository;

#[async_trait]
impl ContactRepository for UnavailableRepository {
    async fn create(&self, _message: NewContactMessage) -> Result<ContactMessage, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find(
        &self,
        _filter: &ContactFilter,
        _window: PageWindow,
    ) -> Result<Vec<ContactMessage>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn count(&self, _filter: &ContactFilter) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[async_trait]
impl RecruitmentRepository for UnavailableRepository {
    async fn create(
        &self,
        _application: NewApplication,
    ) -> Result<RecruitmentApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_existing(
        &self,
        _email: &str,
        _student_id: &str,
    ) -> Result<Option<RecruitmentApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find(
        &self,
        _filter: &ApplicationFilter,
        _window: PageWindow,
    ) -> Result<Vec<RecruitmentApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn count(&self, _filter: &ApplicationFilter) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn count_by(
        &self,
        _grouping: ApplicationGrouping,
    ) -> Result<Vec<GroupCount>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store whose pre-write lookup never sees anything, as when two submissions race
/// between the uniqueness check and the insert.
#[derive(Default)]
pub(super) struct RacingRepository {
    pub(super) inner: MemoryRecruitmentRepository,
}

#[async_trait]
impl RecruitmentRepository for RacingRepository {
    async fn create(
        &self,
        application: NewApplication,
    ) -> Result<RecruitmentApplication, RepositoryError> {
        self.inner.create(application).await
    }

    async fn find_existing(
        &self,
        _email: &str,
        _student_id: &str,
    ) -> Result<Option<RecruitmentApplication>, RepositoryError> {
        Ok(None)
    }

    async fn find(
        &self,
        filter: &ApplicationFilter,
        window: PageWindow,
    ) -> Result<Vec<RecruitmentApplication>, RepositoryError> {
        self.inner.find(filter, window).await
    }

    async fn count(&self, filter: &ApplicationFilter) -> Result<u64, RepositoryError> {
        self.inner.count(filter).await
    }

    async fn count_by(
        &self,
        grouping: ApplicationGrouping,
    ) -> Result<Vec<GroupCount>, RepositoryError> {
        self.inner.count_by(grouping).await
    }
}

/// Rejects every write the way a store-side schema validator would.
pub(super) struct RejectingRepository;

#[async_trait]
impl ContactRepository for RejectingRepository {
    async fn create(&self, _message: NewContactMessage) -> Result<ContactMessage, RepositoryError> {
        Err(RepositoryError::Rejected("status is not an allowed value".to_string()))
    }

    async fn find(
        &self,
        _filter: &ContactFilter,
        _window: PageWindow,
    ) -> Result<Vec<ContactMessage>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn count(&self, _filter: &ContactFilter) -> Result<u64, RepositoryError> {
        Ok(0)
    }
}
