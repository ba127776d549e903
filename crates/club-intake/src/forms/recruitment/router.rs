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

use super::domain::RecruitmentSubmission;
use super::query::ApplicationListQuery;
use super::repository::RecruitmentRepository;
use super::service::RecruitmentService;
use crate::forms::error::{
    list_error_response, submission_error_response, ConflictMessages, SubmissionError,
};
use crate::forms::validation::ValidationError;

const CONFLICTS: ConflictMessages = ConflictMessages {
    existing_record: "An application with this email or student ID already exists",
    duplicate_key: "Application already exists for this email or student ID",
};

/// Router exposing `POST /api/recruitment` and `GET /api/recruitment`.
pub fn recruitment_router<R>(service: Arc<RecruitmentService<R>>) -> Router
where
    R: RecruitmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/recruitment",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<RecruitmentService<R>>>,
    payload: Result<Json<RecruitmentSubmission>, JsonRejection>,
) -> Response
where
    R: RecruitmentRepository + 'static,
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
                "message": "Application submitted successfully",
                "applicationId": stored.id,
                "status": stored.status,
            })),
        )
            .into_response(),
        Err(error) => submission_error_response("recruitment", error, &CONFLICTS),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<RecruitmentService<R>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    let query = match query {
        Ok(Query(pairs)) => ApplicationListQuery::from_pairs(&pairs),
        Err(rejection) => {
            tracing::debug!(
                form = "recruitment",
                %rejection,
                "unreadable query string, using defaults"
            );
            ApplicationListQuery::default()
        }
    };

    match service.list(&query).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => list_error_response("recruitment", error, "Failed to fetch applications"),
    }
}
