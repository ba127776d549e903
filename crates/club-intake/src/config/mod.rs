use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_DATABASE_NAME: &str = "club";
const DEFAULT_MAX_POOL_SIZE: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 45_000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let uri = match env::var("MONGODB_URI") {
            Ok(raw) if !raw.trim().is_empty() => Some(validate_uri(raw.trim())?),
            _ => None,
        };
        if uri.is_none() && environment == AppEnvironment::Production {
            return Err(ConfigError::MissingDatabaseUri);
        }

        let database = DatabaseConfig {
            uri,
            name: env::var("MONGODB_DB").unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string()),
            max_pool_size: numeric_var("MONGODB_MAX_POOL_SIZE", DEFAULT_MAX_POOL_SIZE)?,
            connect_timeout: Duration::from_millis(numeric_var(
                "MONGODB_CONNECT_TIMEOUT_MS",
                DEFAULT_CONNECT_TIMEOUT_MS,
            )?),
            operation_timeout: Duration::from_millis(numeric_var(
                "MONGODB_OPERATION_TIMEOUT_MS",
                DEFAULT_OPERATION_TIMEOUT_MS,
            )?),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                include_targets: environment != AppEnvironment::Production,
                ansi: environment == AppEnvironment::Development,
            },
            database,
        })
    }
}

fn numeric_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

fn validate_uri(raw: &str) -> Result<String, ConfigError> {
    if raw.starts_with("mongodb://") || raw.starts_with("mongodb+srv://") {
        Ok(raw.to_string())
    } else {
        Err(ConfigError::InvalidDatabaseUri)
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub include_targets: bool,
    pub ansi: bool,
}

/// Connection pool settings for the document store.
///
/// `uri` is `None` when no database is configured; outside production the service then
/// runs on the in-memory store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: Option<String>,
    pub name: String,
    pub max_pool_size: u32,
    pub connect_timeout: Duration,
    pub operation_timeout: Duration,
}

impl DatabaseConfig {
    /// URI with any `user:password@` section masked, safe for logs.
    pub fn redacted_uri(&self) -> Option<String> {
        self.uri.as_deref().map(redact_credentials)
    }
}

fn redact_credentials(uri: &str) -> String {
    let Some(scheme_end) = uri.find("//") else {
        return uri.to_string();
    };
    let rest = &uri[scheme_end + 2..];
    match rest.rfind('@') {
        Some(at) => format!("{}//***:***@{}", &uri[..scheme_end], &rest[at + 1..]),
        None => uri.to_string(),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    InvalidDatabaseUri,
    MissingDatabaseUri,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => write!(f, "{key} must be a positive integer"),
            ConfigError::InvalidDatabaseUri => write!(
                f,
                "MONGODB_URI must start with mongodb:// or mongodb+srv://"
            ),
            ConfigError::MissingDatabaseUri => {
                write!(f, "MONGODB_URI is required for this command or environment")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
