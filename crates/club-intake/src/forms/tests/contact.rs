use std::sync::Arc;

use super::common::{
    contact_service, contact_submission, RejectingRepository, UnavailableRepository,
};
use crate::forms::contact::{ContactListQuery, ContactService, ContactStatus, ContactSubmission};
use crate::forms::{SubmissionError, ValidationError};

#[tokio::test]
async fn submit_stores_normalized_message() {
    let (service, _repository) = contact_service();

    let stored = service
        .submit(contact_submission())
        .await
        .expect("submission succeeds");

    assert_eq!(stored.name, "Ada Lovelace");
    assert_eq!(stored.email, "ada@example.com");
    assert_eq!(stored.phone, "+1 (555) 123-4567");
    assert_eq!(stored.status, ContactStatus::New);
    assert_eq!(stored.created_at.timestamp_subsec_nanos() % 1_000_000, 0);

    let page = service
        .list(&ContactListQuery::default())
        .await
        .expect("list succeeds");
    assert_eq!(page.contacts, vec![stored]);
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.pagination.pages, 1);
}

#[tokio::test]
async fn missing_fields_leave_store_untouched() {
    let (service, _repository) = contact_service();
    let submission = ContactSubmission {
        subject: Some("   ".to_string()),
        message: None,
        ..contact_submission()
    };

    let error = service.submit(submission).await.expect_err("must fail");
    match error {
        SubmissionError::Validation(ValidationError::MissingFields(fields)) => {
            assert_eq!(fields, vec!["subject", "message"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let page = service
        .list(&ContactListQuery::default())
        .await
        .expect("list succeeds");
    assert!(page.contacts.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.pages, 0);
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let (service, _repository) = contact_service();
    let submission = ContactSubmission {
        email: Some("not-an-email".to_string()),
        ..contact_submission()
    };

    let error = service.submit(submission).await.expect_err("must fail");
    assert!(matches!(
        error,
        SubmissionError::Validation(ValidationError::InvalidEmail)
    ));
}

#[tokio::test]
async fn list_pages_newest_first_and_filters_status() {
    let (service, _repository) = contact_service();
    for index in 0..12 {
        let submission = ContactSubmission {
            subject: Some(format!("Question {index}")),
            ..contact_submission()
        };
        service.submit(submission).await.expect("submission succeeds");
    }

    let query = ContactListQuery {
        page: Some("2".to_string()),
        limit: Some("5".to_string()),
        ..Default::default()
    };
    let page = service.list(&query).await.expect("list succeeds");
    assert_eq!(page.contacts.len(), 5);
    assert_eq!(page.pagination.total, 12);
    assert_eq!(page.pagination.pages, 3);
    assert_eq!(page.contacts[0].subject, "Question 6");
    assert!(page
        .contacts
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let replied = ContactListQuery {
        status: Some("replied".to_string()),
        ..Default::default()
    };
    let page = service.list(&replied).await.expect("list succeeds");
    assert!(page.contacts.is_empty());
    assert_eq!(page.pagination.total, 0);

    let unknown = ContactListQuery {
        status: Some("archived".to_string()),
        ..Default::default()
    };
    let page = service.list(&unknown).await.expect("list succeeds");
    assert_eq!(page.pagination.total, 12);
}

#[tokio::test]
async fn store_outage_is_transient() {
    let service = ContactService::new(Arc::new(UnavailableRepository));

    let error = service
        .submit(contact_submission())
        .await
        .expect_err("must fail");
    assert!(matches!(error, SubmissionError::Transient(_)));

    assert!(service.list(&ContactListQuery::default()).await.is_err());
}

#[tokio::test]
async fn store_side_rejection_is_a_validation_error() {
    let service = ContactService::new(Arc::new(RejectingRepository));

    let error = service
        .submit(contact_submission())
        .await
        .expect_err("must fail");
    assert!(matches!(
        error,
        SubmissionError::Validation(ValidationError::Invalid(_))
    ));
}
