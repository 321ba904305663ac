use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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
    pub catalog: CatalogSource,
    pub generation: GenerationConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogSource::from_env()?,
            generation: GenerationConfig::from_env()?,
        })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the question catalog comes from. Chosen explicitly at startup and
/// passed to the constructors that need it, never re-read from the
/// environment at the point of use.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// The catalog compiled into this crate.
    Builtin,
    /// The upstream risk-questionnaire provider.
    Provider {
        base_url: String,
        access_token: String,
        questionnaire_name: String,
    },
}

impl CatalogSource {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("APP_CATALOG").unwrap_or_else(|_| "builtin".to_string());
        match raw.trim().to_ascii_lowercase().as_str() {
            "builtin" => Ok(Self::Builtin),
            "provider" => {
                let base_url = env::var("EVALUE_API_BASE_URL")
                    .map_err(|_| ConfigError::MissingProviderEndpoint)?;
                let access_token = env::var("EVALUE_ACCESS_TOKEN")
                    .map_err(|_| ConfigError::MissingProviderCredential)?;
                let questionnaire_name =
                    env::var("EVALUE_QUESTIONNAIRE").unwrap_or_else(|_| "5risk".to_string());
                Ok(Self::Provider {
                    base_url,
                    access_token,
                    questionnaire_name,
                })
            }
            other => Err(ConfigError::UnknownCatalogSource {
                value: other.to_string(),
            }),
        }
    }
}

/// Where rendered reports are persisted.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Keep rendered artifacts in process memory. Suitable for local runs
    /// and tests only.
    InMemory,
    /// An S3 bucket with presigned retrieval URLs.
    S3 { bucket: String },
}

impl StorageBackend {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("APP_STORAGE").unwrap_or_else(|_| "memory".to_string());
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::InMemory),
            "s3" => {
                let bucket =
                    env::var("PDF_BUCKET_NAME").map_err(|_| ConfigError::MissingBucket)?;
                Ok(Self::S3 { bucket })
            }
            other => Err(ConfigError::UnknownStorageBackend {
                value: other.to_string(),
            }),
        }
    }
}

/// Settings for the PDF generation pipeline.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub storage: StorageBackend,
    /// Path to the headless chromium binary used for rendering.
    pub chromium_path: PathBuf,
    /// Upper bound on a single render run.
    pub render_timeout: Duration,
    /// Validity window of a presigned retrieval URL.
    pub url_ttl: Duration,
    /// Connection establishment budget for storage calls.
    pub storage_connect_timeout: Duration,
    /// Whole-operation budget for storage calls; larger than the connect
    /// budget so full file transfers are not cut short.
    pub storage_operation_timeout: Duration,
}

impl GenerationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let chromium_path = env::var("CHROMIUM_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("chromium"));

        let render_timeout = duration_var("RENDER_TIMEOUT_SECS", 300)?;
        let url_ttl = duration_var("PDF_URL_TTL_SECS", 120)?;

        Ok(Self {
            storage: StorageBackend::from_env()?,
            chromium_path,
            render_timeout,
            url_ttl,
            storage_connect_timeout: Duration::from_secs(3),
            storage_operation_timeout: Duration::from_secs(30),
        })
    }
}

fn duration_var(name: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidDuration { name }),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDuration { name: &'static str },
    MissingBucket,
    MissingProviderEndpoint,
    MissingProviderCredential,
    UnknownCatalogSource { value: String },
    UnknownStorageBackend { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDuration { name } => {
                write!(f, "{name} must be a whole number of seconds")
            }
            ConfigError::MissingBucket => {
                write!(f, "PDF_BUCKET_NAME must be set when APP_STORAGE=s3")
            }
            ConfigError::MissingProviderEndpoint => {
                write!(f, "EVALUE_API_BASE_URL must be set when APP_CATALOG=provider")
            }
            ConfigError::MissingProviderCredential => {
                write!(f, "EVALUE_ACCESS_TOKEN must be set when APP_CATALOG=provider")
            }
            ConfigError::UnknownCatalogSource { value } => {
                write!(f, "APP_CATALOG must be 'builtin' or 'provider', got '{value}'")
            }
            ConfigError::UnknownStorageBackend { value } => {
                write!(f, "APP_STORAGE must be 'memory' or 's3', got '{value}'")
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_CATALOG",
            "APP_STORAGE",
            "PDF_BUCKET_NAME",
            "EVALUE_API_BASE_URL",
            "EVALUE_ACCESS_TOKEN",
            "EVALUE_QUESTIONNAIRE",
            "CHROMIUM_PATH",
            "RENDER_TIMEOUT_SECS",
            "PDF_URL_TTL_SECS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(matches!(config.catalog, CatalogSource::Builtin));
        assert!(matches!(
            config.generation.storage,
            StorageBackend::InMemory
        ));
        assert_eq!(config.generation.url_ttl, Duration::from_secs(120));
        assert_eq!(config.generation.render_timeout, Duration::from_secs(300));
    }

    #[test]
    fn s3_storage_requires_bucket() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_STORAGE", "s3");
        let err = AppConfig::load().expect_err("bucket is required");
        assert!(matches!(err, ConfigError::MissingBucket));

        env::set_var("PDF_BUCKET_NAME", "risk-profiler-reports");
        let config = AppConfig::load().expect("config loads once bucket is set");
        match config.generation.storage {
            StorageBackend::S3 { bucket } => assert_eq!(bucket, "risk-profiler-reports"),
            other => panic!("expected S3 backend, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn provider_catalog_requires_endpoint_and_credential() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_CATALOG", "provider");
        let err = AppConfig::load().expect_err("endpoint is required");
        assert!(matches!(err, ConfigError::MissingProviderEndpoint));

        env::set_var("EVALUE_API_BASE_URL", "https://evalue.example");
        let err = AppConfig::load().expect_err("credential is required");
        assert!(matches!(err, ConfigError::MissingProviderCredential));

        env::set_var("EVALUE_ACCESS_TOKEN", "token");
        let config = AppConfig::load().expect("config loads once provider is set");
        match config.catalog {
            CatalogSource::Provider {
                questionnaire_name, ..
            } => assert_eq!(questionnaire_name, "5risk"),
            other => panic!("expected provider catalog, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unknown_backend_names() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_STORAGE", "gcs");
        let err = AppConfig::load().expect_err("unknown backend rejected");
        assert!(matches!(err, ConfigError::UnknownStorageBackend { .. }));
        reset_env();
    }
}
