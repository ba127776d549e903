use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{sort_groups, GroupCount, PageWindow, RecordId, RepositoryError};
use crate::forms::contact::{ContactFilter, ContactMessage, ContactRepository, NewContactMessage};
use crate::forms::recruitment::{
    ApplicationFilter, ApplicationGrouping, NewApplication, RecruitmentApplication,
    RecruitmentRepository,
};

/// Process-local store used when no database is configured.
///
/// Records are kept in insertion order; uniqueness of application email and student id is
/// checked and the record inserted under the same lock.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    contacts: Arc<MemoryContactRepository>,
    applications: Arc<MemoryRecruitmentRepository>,
}

impl MemoryStore {
    pub fn contacts(&self) -> Arc<MemoryContactRepository> {
        self.contacts.clone()
    }

    pub fn applications(&self) -> Arc<MemoryRecruitmentRepository> {
        self.applications.clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unknown("memory store lock poisoned".to_string()))
}

/// Newest first by timestamp; among equal timestamps the later insert wins.
fn newest_first<'a, T, K, F>(records: &'a [T], keep: F, timestamp: K) -> Vec<&'a T>
where
    F: Fn(&T) -> bool,
    K: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    let mut matching: Vec<&T> = records.iter().rev().filter(|record| keep(*record)).collect();
    matching.sort_by(|a, b| timestamp(b).cmp(&timestamp(a)));
    matching
}

fn page<T: Clone>(records: Vec<&T>, window: PageWindow) -> Vec<T> {
    let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
    records.into_iter().skip(skip).take(limit).cloned().collect()
}

#[derive(Debug, Default)]
pub struct MemoryContactRepository {
    records: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn create(&self, message: NewContactMessage) -> Result<ContactMessage, RepositoryError> {
        let stored = message.with_id(RecordId::generate());
        lock(&self.records)?.push(stored.clone());
        Ok(stored)
    }

    async fn find(
        &self,
        filter: &ContactFilter,
        window: PageWindow,
    ) -> Result<Vec<ContactMessage>, RepositoryError> {
        let guard = lock(&self.records)?;
        let matching = newest_first(
            guard.as_slice(),
            |message| filter.matches(message.status),
            |message| message.created_at,
        );
        Ok(page(matching, window))
    }

    async fn count(&self, filter: &ContactFilter) -> Result<u64, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .iter()
            .filter(|message| filter.matches(message.status))
            .count() as u64)
    }
}

#[derive(Debug, Default)]
pub struct MemoryRecruitmentRepository {
    records: Mutex<Vec<RecruitmentApplication>>,
}

impl MemoryRecruitmentRepository {
    pub fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecruitmentRepository for MemoryRecruitmentRepository {
    async fn create(
        &self,
        application: NewApplication,
    ) -> Result<RecruitmentApplication, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let duplicate = guard.iter().any(|stored| {
            stored.details.email == application.details.email
                || stored.details.student_id == application.details.student_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }

        let stored = application.with_id(RecordId::generate());
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn find_existing(
        &self,
        email: &str,
        student_id: &str,
    ) -> Result<Option<RecruitmentApplication>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .iter()
            .find(|stored| stored.details.email == email || stored.details.student_id == student_id)
            .cloned())
    }

    async fn find(
        &self,
        filter: &ApplicationFilter,
        window: PageWindow,
    ) -> Result<Vec<RecruitmentApplication>, RepositoryError> {
        let guard = lock(&self.records)?;
        let matching = newest_first(
            guard.as_slice(),
            |application| filter.matches(application),
            |application| application.submitted_at,
        );
        Ok(page(matching, window))
    }

    async fn count(&self, filter: &ApplicationFilter) -> Result<u64, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .iter()
            .filter(|application| filter.matches(application))
            .count() as u64)
    }

    async fn count_by(
        &self,
        grouping: ApplicationGrouping,
    ) -> Result<Vec<GroupCount>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut buckets: BTreeMap<&'static str, u64> = BTreeMap::new();
        for application in guard.iter() {
            match grouping {
                ApplicationGrouping::Status => {
                    *buckets.entry(application.status.label()).or_default() += 1;
                }
                ApplicationGrouping::SelectedDomain => {
                    for domain in &application.details.selected_domains {
                        *buckets.entry(domain.label()).or_default() += 1;
                    }
                }
            }
        }

        let mut groups: Vec<GroupCount> = buckets
            .into_iter()
            .map(|(key, count)| GroupCount {
                key: key.to_string(),
                count,
            })
            .collect();
        sort_groups(&mut groups);
        Ok(groups)
    }
}
