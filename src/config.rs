use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Streamlit listens on 8501 unless told otherwise
pub const DEFAULT_BASE_URL: &str = "http://localhost:8501";
pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_MARKER: &str = "Streamlit";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 5;

/// Backend services the frontend depends on: (display name, env var, default URL)
const BACKEND_SERVICES: [(&str, &str, &str); 5] = [
    (
        "PDF Processor",
        "PDF_PROCESSOR_URL",
        "http://localhost:8080/pdf_processor",
    ),
    (
        "PDF Extractor",
        "PDF_EXTRACTOR_URL",
        "http://localhost:8080/pdf_extraction",
    ),
    ("Chat Service", "CHAT_URL", "http://localhost:8080/chat"),
    (
        "Translation Service",
        "DOCLING_TRANSLATION_URL",
        "http://localhost:8080/docling_translation",
    ),
    (
        "Embedder Service",
        "EMBEDDER_URL",
        "http://localhost:8080/embedder",
    ),
];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// A backend service whose `/health` endpoint is probed
#[derive(Clone, Debug, PartialEq, Eq, Validate, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub name: String,

    #[validate(custom(function = "validate_http_url"))]
    pub url: String,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The built-in service list with their default URLs
    pub fn defaults() -> Vec<Self> {
        BACKEND_SERVICES
            .iter()
            .map(|(name, _, url)| Self::new(*name, *url))
            .collect()
    }

    /// The built-in service list, each URL overridable by its environment variable
    pub fn defaults_from_env() -> Vec<Self> {
        BACKEND_SERVICES
            .iter()
            .map(|(name, key, default)| {
                Self::new(*name, env::var(key).unwrap_or_else(|_| default.to_string()))
            })
            .collect()
    }
}

/// Smoke check configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Root URL of the frontend under test
    #[validate(custom(function = "validate_http_url"))]
    pub base_url: String,

    /// Path requested on the frontend
    #[validate(custom(function = "validate_path"))]
    pub path: String,

    /// Substring the rendered page must contain once the app is up
    #[validate(length(min = 1, message = "Marker cannot be empty"))]
    pub marker: String,

    /// Request timeout for the frontend probe (1-600 seconds)
    #[validate(range(min = 1, max = 600, message = "Timeout must be between 1 and 600 seconds"))]
    pub timeout_secs: u64,

    /// Request timeout for each backend health probe (1-120 seconds)
    #[validate(range(
        min = 1,
        max = 120,
        message = "Backend timeout must be between 1 and 120 seconds"
    ))]
    pub backend_timeout_secs: u64,

    #[validate(nested)]
    pub services: Vec<ServiceEndpoint>,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: DEFAULT_PATH.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            backend_timeout_secs: DEFAULT_BACKEND_TIMEOUT_SECS,
            services: ServiceEndpoint::defaults(),
        }
    }
}

impl SmokeConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            base_url: env::var("SMOKE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            path: env::var("SMOKE_PATH").unwrap_or_else(|_| DEFAULT_PATH.to_string()),
            marker: env::var("SMOKE_MARKER").unwrap_or_else(|_| DEFAULT_MARKER.to_string()),
            timeout_secs: parse_env_var("SMOKE_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())?,
            backend_timeout_secs: parse_env_var(
                "BACKEND_TIMEOUT_SECS",
                &DEFAULT_BACKEND_TIMEOUT_SECS.to_string(),
            )?,
            services: ServiceEndpoint::defaults_from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file; missing fields take their defaults
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides (CLI wins over file and environment)
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Result<Self, ConfigError> {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(path) = overrides.path {
            self.path = path;
        }
        if let Some(marker) = overrides.marker {
            self.marker = marker;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(backend_timeout_secs) = overrides.backend_timeout_secs {
            self.backend_timeout_secs = backend_timeout_secs;
        }

        self.validate()?;
        Ok(self)
    }

    /// Full URL of the page the smoke check requests
    pub fn target_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }
}

/// Overrides parsed from command line arguments; `None` keeps the loaded value
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub marker: Option<String>,
    pub timeout_secs: Option<u64>,
    pub backend_timeout_secs: Option<u64>,
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_path(path: &str) -> Result<(), ValidationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(validation_error("path", "Path must start with '/'"))
    }
}

/// Only absolute http(s) URLs; anything else would fail at request time
/// and be indistinguishable from an app that is not up yet
fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(validation_error("url_scheme", "URL scheme must be http or https")),
        Err(_) => Err(validation_error("url", "URL must be an absolute http(s) URL")),
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
