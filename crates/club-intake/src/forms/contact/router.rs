use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::domain::ContactSubmission;
use super::query::ContactListQuery;
use super::repository::ContactRepository;
use super::service::ContactService;
use crate::forms::error::{
    list_error_response, submission_error_response, ConflictMessages, SubmissionError,
};
use crate::forms::validation::ValidationError;

const CONFLICTS: ConflictMessages = ConflictMessages {
    existing_record: "Duplicate entry detected",
    duplicate_key: "Duplicate entry detected",
};

/// Router exposing `POST /api/contact` and `GET /api/contact`.
pub fn contact_router<R>(service: Arc<ContactService<R>>) -> Router
where
    R: ContactRepository + 'static,
{
    Router::new()
        .route(
            "/api/contact",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ContactService<R>>>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Response
where
    R: ContactRepository + 'static,
{
    let result = match payload {
        Ok(Json(submission)) => service.submit(submission).await,
        Err(rejection) => Err(SubmissionError::Validation(ValidationError::MalformedBody(
            rejection.body_text(),
        ))),
    };

    match result {
        Ok(stored) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Contact form submitted successfully",
                "id": stored.id,
            })),
        )
            .into_response(),
        Err(error) => submission_error_response("contact", error, &CONFLICTS),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ContactService<R>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response
where
    R: ContactRepository + 'static,
{
    let query = match query {
        Ok(Query(pairs)) => ContactListQuery::from_pairs(&pairs),
        Err(rejection) => {
            tracing::debug!(
                form = "contact",
                %rejection,
                "unreadable query string, using defaults"
            );
            ContactListQuery::default()
        }
    };

    match service.list(&query).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => list_error_response("contact", error, "Failed to fetch contacts"),
    }
}
