use crate::cli::ServeArgs;
use crate::infra::{AppState, Backend};
use crate::routes::with_form_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use club_intake::config::AppConfig;
use club_intake::error::AppError;
use club_intake::forms::contact::{ContactRepository, ContactService};
use club_intake::forms::recruitment::{RecruitmentRepository, RecruitmentService};
use club_intake::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = Backend::open(&config).await?;
    let app = match &backend {
        Backend::Mongo(store) => build_app(store.contacts(), store.applications()),
        Backend::Memory(store) => build_app(store.contacts(), store.applications()),
    }
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "club intake service ready");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    readiness_flag.store(false, Ordering::Release);
    backend.close().await;
    served?;
    info!("club intake service stopped");
    Ok(())
}

fn build_app<C, R>(contacts: Arc<C>, applications: Arc<R>) -> axum::Router
where
    C: ContactRepository + 'static,
    R: RecruitmentRepository + 'static,
{
    with_form_routes(
        Arc::new(ContactService::new(contacts)),
        Arc::new(RecruitmentService::new(applications)),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(err) => {
                warn!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
