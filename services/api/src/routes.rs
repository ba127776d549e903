use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use club_intake::forms::contact::{contact_router, ContactRepository, ContactService};
use club_intake::forms::recruitment::{
    recruitment_router, RecruitmentRepository, RecruitmentService,
};
use serde_json::json;
use std::sync::Arc;

/// Both form routers plus the operational endpoints.
pub(crate) fn with_form_routes<C, R>(
    contacts: Arc<ContactService<C>>,
    applications: Arc<RecruitmentService<R>>,
) -> axum::Router
where
    C: ContactRepository + 'static,
    R: RecruitmentRepository + 'static,
{
    contact_router(contacts)
        .merge(recruitment_router(applications))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use club_intake::store::MemoryStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, Arc<AtomicBool>) {
        let store = MemoryStore::default();
        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_form_routes(
            Arc::new(ContactService::new(store.contacts())),
            Arc::new(RecruitmentService::new(store.applications())),
        )
        .layer(Extension(state));
        (router, readiness)
    }

    async fn status_of(router: &axum::Router, method: Method, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        router
            .clone()
            .oneshot(request)
            .await
            .expect("response")
            .status()
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (router, _) = app(false);
        assert_eq!(status_of(&router, Method::GET, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        let (router, readiness) = app(false);
        assert_eq!(
            status_of(&router, Method::GET, "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        readiness.store(true, Ordering::Release);
        assert_eq!(status_of(&router, Method::GET, "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn form_routes_are_mounted() {
        let (router, _) = app(true);
        assert_eq!(status_of(&router, Method::GET, "/api/contact").await, StatusCode::OK);
        assert_eq!(
            status_of(&router, Method::GET, "/api/recruitment").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(&router, Method::DELETE, "/api/contact").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(status_of(&router, Method::GET, "/metrics").await, StatusCode::OK);
    }
}
