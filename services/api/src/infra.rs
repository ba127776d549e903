use club_intake::config::{AppConfig, ConfigError};
use club_intake::error::AppError;
use club_intake::store::{MemoryStore, MongoStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Storage the server runs on, picked once at start-up.
pub(crate) enum Backend {
    Mongo(MongoStore),
    Memory(MemoryStore),
}

impl Backend {
    /// Connects to MongoDB when a URI is configured; otherwise falls back to the
    /// in-memory store. Production configs without a URI are refused earlier, at load.
    pub(crate) async fn open(config: &AppConfig) -> Result<Self, AppError> {
        if config.database.uri.is_none() {
            warn!(
                environment = ?config.environment,
                "MONGODB_URI not set; records are kept in memory and lost on restart"
            );
            return Ok(Self::Memory(MemoryStore::default()));
        }

        let store = connect(config).await?;
        store.ensure_indexes().await?;
        Ok(Self::Mongo(store))
    }

    pub(crate) async fn close(self) {
        if let Backend::Mongo(store) = self {
            store.shutdown().await;
            info!("database pool closed");
        }
    }
}

/// Opens the pool for commands that only make sense against a real database.
pub(crate) async fn connect(config: &AppConfig) -> Result<MongoStore, AppError> {
    let uri = config
        .database
        .redacted_uri()
        .ok_or(ConfigError::MissingDatabaseUri)?;
    info!(%uri, database = %config.database.name, "connecting to MongoDB");
    let store = MongoStore::connect(&config.database).await?;
    Ok(store)
}
