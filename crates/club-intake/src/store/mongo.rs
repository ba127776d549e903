use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use super::{sort_groups, GroupCount, PageWindow, RecordId, RepositoryError};
use crate::config::DatabaseConfig;
use crate::forms::contact::{
    ContactFilter, ContactMessage, ContactRepository, ContactStatus, NewContactMessage,
};
use crate::forms::recruitment::{
    ApplicantDetails, ApplicationFilter, ApplicationGrouping, ApplicationStatus, NewApplication,
    RecruitmentApplication, RecruitmentRepository, ReviewMetadata,
};

pub const CONTACTS: &str = "contacts";
pub const RECRUITMENTS: &str = "recruitments";

const DUPLICATE_KEY: i32 = 11000;
const DOCUMENT_VALIDATION_FAILED: i32 = 121;

/// Pooled MongoDB client shared by both repositories.
///
/// Created once at start-up; [`MongoStore::shutdown`] closes the pool.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
    operation_timeout: Duration,
}

impl MongoStore {
    /// Builds the pool and pings the server so a bad URI fails at start-up.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| RepositoryError::Unavailable("no database uri configured".to_string()))?;

        let mut options = ClientOptions::parse(uri).await.map_err(classify)?;
        options.app_name = Some("club-intake".to_string());
        options.max_pool_size = Some(config.max_pool_size);
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client = Client::with_options(options).map_err(classify)?;
        let store = Self {
            database: client.database(&config.name),
            client,
            operation_timeout: config.operation_timeout,
        };

        with_deadline(
            store.operation_timeout,
            store.database.run_command(doc! { "ping": 1 }, None),
        )
        .await?;

        Ok(store)
    }

    pub fn contacts(&self) -> Arc<MongoContactRepository> {
        Arc::new(MongoContactRepository {
            collection: self.database.collection(CONTACTS),
            operation_timeout: self.operation_timeout,
        })
    }

    pub fn applications(&self) -> Arc<MongoRecruitmentRepository> {
        Arc::new(MongoRecruitmentRepository {
            collection: self.database.collection(RECRUITMENTS),
            operation_timeout: self.operation_timeout,
        })
    }

    /// Creates the lookup indexes and the unique indexes on application email and student id.
    pub async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
        let unique = || IndexOptions::builder().unique(true).build();
        let plain = |keys: Document| IndexModel::builder().keys(keys).build();

        let contact_indexes = vec![
            plain(doc! { "email": 1 }),
            plain(doc! { "createdAt": -1 }),
            plain(doc! { "status": 1 }),
        ];
        let recruitment_indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
            IndexModel::builder()
                .keys(doc! { "studentId": 1 })
                .options(unique())
                .build(),
            plain(doc! { "status": 1 }),
            plain(doc! { "submittedAt": -1 }),
            plain(doc! { "selectedDomains": 1 }),
            plain(doc! { "yearLevel": 1 }),
        ];

        with_deadline(
            self.operation_timeout,
            self.database
                .collection::<Document>(CONTACTS)
                .create_indexes(contact_indexes, None),
        )
        .await?;
        with_deadline(
            self.operation_timeout,
            self.database
                .collection::<Document>(RECRUITMENTS)
                .create_indexes(recruitment_indexes, None),
        )
        .await?;
        Ok(())
    }

    /// Removes every stored record from both collections. Administrative use only.
    pub async fn clear(&self) -> Result<u64, RepositoryError> {
        let mut removed = 0;
        for name in [CONTACTS, RECRUITMENTS] {
            let result = with_deadline(
                self.operation_timeout,
                self.database
                    .collection::<Document>(name)
                    .delete_many(doc! {}, None),
            )
            .await?;
            removed += result.deleted_count;
        }
        Ok(removed)
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

/// Runs a driver call under the per-operation budget.
async fn with_deadline<T, F>(budget: Duration, operation: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, MongoError>>,
{
    match tokio::time::timeout(budget, operation).await {
        Ok(result) => result.map_err(classify),
        Err(_) => Err(RepositoryError::Unavailable(format!(
            "operation exceeded {}ms budget",
            budget.as_millis()
        ))),
    }
}

fn classify(error: MongoError) -> RepositoryError {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            RepositoryError::Conflict
        }
        ErrorKind::Write(WriteFailure::WriteError(write))
            if write.code == DOCUMENT_VALIDATION_FAILED =>
        {
            RepositoryError::Rejected(write.message.clone())
        }
        ErrorKind::Command(command) if command.code == DUPLICATE_KEY => RepositoryError::Conflict,
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => RepositoryError::Unavailable(error.to_string()),
        _ => RepositoryError::Unknown(error.to_string()),
    }
}

fn to_bson_time(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_time(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

fn find_options(sort_field: &str, window: PageWindow) -> FindOptions {
    let mut sort = Document::new();
    sort.insert(sort_field, -1);
    sort.insert("_id", -1);

    FindOptions::builder()
        .sort(sort)
        .skip(window.skip)
        .limit(i64::try_from(window.limit).unwrap_or(i64::MAX))
        .projection(doc! { "__v": 0 })
        .build()
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContactDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    #[serde(default)]
    phone: String,
    subject: String,
    message: String,
    #[serde(default)]
    status: ContactStatus,
    created_at: bson::DateTime,
}

impl ContactDocument {
    fn new(id: ObjectId, message: &NewContactMessage) -> Self {
        Self {
            id,
            name: message.name.clone(),
            email: message.email.clone(),
            phone: message.phone.clone(),
            subject: message.subject.clone(),
            message: message.message.clone(),
            status: message.status,
            created_at: to_bson_time(message.created_at),
        }
    }
}

impl From<ContactDocument> for ContactMessage {
    fn from(document: ContactDocument) -> Self {
        ContactMessage {
            id: document.id.into(),
            name: document.name,
            email: document.email,
            phone: document.phone,
            subject: document.subject,
            message: document.message,
            status: document.status,
            created_at: from_bson_time(document.created_at),
        }
    }
}

fn contact_filter(filter: &ContactFilter) -> Document {
    let mut query = doc! {};
    if let Some(status) = filter.status {
        query.insert("status", status.label());
    }
    query
}

pub struct MongoContactRepository {
    collection: Collection<ContactDocument>,
    operation_timeout: Duration,
}

#[async_trait]
impl ContactRepository for MongoContactRepository {
    async fn create(&self, message: NewContactMessage) -> Result<ContactMessage, RepositoryError> {
        let id = ObjectId::new();
        let document = ContactDocument::new(id, &message);
        with_deadline(
            self.operation_timeout,
            self.collection.insert_one(&document, None),
        )
        .await?;
        Ok(message.with_id(RecordId::from(id)))
    }

    async fn find(
        &self,
        filter: &ContactFilter,
        window: PageWindow,
    ) -> Result<Vec<ContactMessage>, RepositoryError> {
        let query = contact_filter(filter);
        let options = find_options("createdAt", window);
        let documents = with_deadline(self.operation_timeout, async {
            let cursor = self.collection.find(query, options).await?;
            cursor.try_collect::<Vec<_>>().await
        })
        .await?;
        Ok(documents.into_iter().map(ContactMessage::from).collect())
    }

    async fn count(&self, filter: &ContactFilter) -> Result<u64, RepositoryError> {
        with_deadline(
            self.operation_timeout,
            self.collection.count_documents(contact_filter(filter), None),
        )
        .await
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(flatten)]
    details: ApplicantDetails,
    #[serde(default)]
    status: ApplicationStatus,
    submitted_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reviewed_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    review_notes: Option<String>,
}

impl ApplicationDocument {
    fn new(id: ObjectId, application: &NewApplication) -> Self {
        Self {
            id,
            details: application.details.clone(),
            status: application.status,
            submitted_at: to_bson_time(application.submitted_at),
            reviewed_at: None,
            reviewed_by: None,
            review_notes: None,
        }
    }
}

impl From<ApplicationDocument> for RecruitmentApplication {
    fn from(document: ApplicationDocument) -> Self {
        RecruitmentApplication {
            id: document.id.into(),
            details: document.details,
            status: document.status,
            submitted_at: from_bson_time(document.submitted_at),
            review: ReviewMetadata {
                reviewed_at: document.reviewed_at.map(from_bson_time),
                reviewed_by: document.reviewed_by,
                review_notes: document.review_notes,
            },
        }
    }
}

fn application_filter(filter: &ApplicationFilter) -> Document {
    let mut query = doc! {};
    if let Some(status) = filter.status {
        query.insert("status", status.label());
    }
    if let Some(domain) = filter.domain {
        query.insert("selectedDomains", domain.label());
    }
    if let Some(level) = &filter.year_level {
        query.insert("yearLevel", level.as_str());
    }
    query
}

fn grouping_pipeline(grouping: ApplicationGrouping) -> Vec<Document> {
    let group_sort = doc! { "$sort": { "count": -1, "_id": 1 } };
    match grouping {
        ApplicationGrouping::Status => vec![
            doc! { "$group": { "_id": "$status", "count": { "$sum": 1 } } },
            group_sort,
        ],
        ApplicationGrouping::SelectedDomain => vec![
            doc! { "$unwind": "$selectedDomains" },
            doc! { "$group": { "_id": "$selectedDomains", "count": { "$sum": 1 } } },
            group_sort,
        ],
    }
}

#[derive(Debug, Deserialize)]
struct GroupDocument {
    #[serde(rename = "_id")]
    key: Option<String>,
    count: i64,
}

pub struct MongoRecruitmentRepository {
    collection: Collection<ApplicationDocument>,
    operation_timeout: Duration,
}

#[async_trait]
impl RecruitmentRepository for MongoRecruitmentRepository {
    async fn create(
        &self,
        application: NewApplication,
    ) -> Result<RecruitmentApplication, RepositoryError> {
        let id = ObjectId::new();
        let document = ApplicationDocument::new(id, &application);
        with_deadline(
            self.operation_timeout,
            self.collection.insert_one(&document, None),
        )
        .await?;
        Ok(application.with_id(RecordId::from(id)))
    }

    async fn find_existing(
        &self,
        email: &str,
        student_id: &str,
    ) -> Result<Option<RecruitmentApplication>, RepositoryError> {
        let query = doc! { "$or": [ { "email": email }, { "studentId": student_id } ] };
        let found = with_deadline(
            self.operation_timeout,
            self.collection.find_one(query, None),
        )
        .await?;
        Ok(found.map(RecruitmentApplication::from))
    }

    async fn find(
        &self,
        filter: &ApplicationFilter,
        window: PageWindow,
    ) -> Result<Vec<RecruitmentApplication>, RepositoryError> {
        let query = application_filter(filter);
        let options = find_options("submittedAt", window);
        let documents = with_deadline(self.operation_timeout, async {
            let cursor = self.collection.find(query, options).await?;
            cursor.try_collect::<Vec<_>>().await
        })
        .await?;
        Ok(documents
            .into_iter()
            .map(RecruitmentApplication::from)
            .collect())
    }

    async fn count(&self, filter: &ApplicationFilter) -> Result<u64, RepositoryError> {
        with_deadline(
            self.operation_timeout,
            self.collection
                .count_documents(application_filter(filter), None),
        )
        .await
    }

    async fn count_by(
        &self,
        grouping: ApplicationGrouping,
    ) -> Result<Vec<GroupCount>, RepositoryError> {
        let pipeline = grouping_pipeline(grouping);
        let documents = with_deadline(self.operation_timeout, async {
            let cursor = self.collection.aggregate(pipeline, None).await?;
            cursor.try_collect::<Vec<Document>>().await
        })
        .await?;

        let mut groups = Vec::with_capacity(documents.len());
        for document in documents {
            let group: GroupDocument = bson::from_document(document)
                .map_err(|err| RepositoryError::Unknown(format!("malformed group row: {err}")))?;
            if let Some(key) = group.key {
                groups.push(GroupCount {
                    key,
                    count: u64::try_from(group.count).unwrap_or_default(),
                });
            }
        }
        sort_groups(&mut groups);
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::recruitment::Domain;

    #[test]
    fn contact_filter_only_sets_known_keys() {
        assert_eq!(contact_filter(&ContactFilter::default()), doc! {});
        let filter = ContactFilter {
            status: Some(ContactStatus::Read),
        };
        assert_eq!(contact_filter(&filter), doc! { "status": "read" });
    }

    #[test]
    fn application_filter_matches_domain_membership() {
        let filter = ApplicationFilter {
            status: Some(ApplicationStatus::UnderReview),
            domain: Some(Domain::PrSocial),
            year_level: Some("2nd Year".to_string()),
        };
        assert_eq!(
            application_filter(&filter),
            doc! {
                "status": "under-review",
                "selectedDomains": "pr-social",
                "yearLevel": "2nd Year",
            }
        );
    }

    #[test]
    fn domain_report_unwinds_before_grouping() {
        let pipeline = grouping_pipeline(ApplicationGrouping::SelectedDomain);
        assert_eq!(pipeline[0], doc! { "$unwind": "$selectedDomains" });
        assert_eq!(grouping_pipeline(ApplicationGrouping::Status).len(), 2);
    }

    #[test]
    fn find_options_sort_newest_first_and_hide_version_key() {
        let options = find_options("createdAt", PageWindow { skip: 20, limit: 10 });
        assert_eq!(options.skip, Some(20));
        assert_eq!(options.limit, Some(10));
        assert_eq!(options.sort, Some(doc! { "createdAt": -1, "_id": -1 }));
        assert_eq!(options.projection, Some(doc! { "__v": 0 }));
    }

    #[tokio::test]
    async fn operations_past_their_budget_are_unavailable() {
        let outcome = with_deadline(
            Duration::from_millis(1),
            std::future::pending::<Result<(), MongoError>>(),
        )
        .await;
        match outcome {
            Err(RepositoryError::Unavailable(detail)) => assert!(detail.contains("1ms")),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn completed_operations_pass_through() {
        let outcome =
            with_deadline(Duration::from_secs(1), async { Ok::<_, MongoError>(7) }).await;
        assert_eq!(outcome.expect("completes"), 7);
    }

    #[test]
    fn io_failures_are_unavailable() {
        let error = MongoError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        assert!(matches!(classify(error), RepositoryError::Unavailable(_)));
    }

    #[test]
    fn timestamps_round_trip_at_millisecond_precision() {
        let at = DateTime::<Utc>::from_timestamp_millis(1_727_000_000_123).expect("valid time");
        assert_eq!(from_bson_time(to_bson_time(at)), at);
    }
}
