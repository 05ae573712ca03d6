//! Reset configuration.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ResetError;

/// Schemas a pipeline catalog is torn down across, in cleanup order.
pub const DEFAULT_SCHEMAS: &[&str] = &["raw", "ref", "mart"];

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Profile name used when `DATABRICKS_CONFIG_PROFILE` is unset.
pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// What to clean and how long a single API call may take.
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Catalog holding the pipeline schemas.
    pub catalog: String,

    /// Target schemas, in cleanup order.
    pub schemas: Vec<String>,

    /// Timeout applied to every workspace API request.
    pub timeout: Duration,
}

impl CleanupConfig {
    /// Create a configuration for `catalog` with the default schema set.
    pub fn new(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            schemas: DEFAULT_SCHEMAS.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Replace the schema set.
    pub fn with_schemas<I, S>(mut self, schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemas = schemas.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Workspace credential settings loaded from environment variables.
///
/// Environment variables are prefixed with `DATABRICKS_`:
/// - `DATABRICKS_HOST`: Workspace URL
/// - `DATABRICKS_TOKEN`: Personal access token
/// - `DATABRICKS_CONFIG_FILE`: Profile file (default: `~/.databrickscfg`)
/// - `DATABRICKS_CONFIG_PROFILE`: Profile section (default: `DEFAULT`)
#[derive(Clone, Default, Deserialize)]
pub struct CredentialEnv {
    pub host: Option<String>,
    pub token: Option<String>,
    pub config_file: Option<PathBuf>,
    pub config_profile: Option<String>,
}

impl CredentialEnv {
    /// Load credential settings from environment variables.
    pub fn from_env() -> Result<Self, ResetError> {
        Ok(envy::prefixed("DATABRICKS_").from_env::<CredentialEnv>()?)
    }

    /// Profile file to probe for ambient credentials.
    pub fn profile_path(&self) -> Option<PathBuf> {
        self.config_file
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".databrickscfg")))
    }

    /// Profile section to read from the profile file.
    pub fn profile_name(&self) -> String {
        self.config_profile
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PROFILE)
            .to_string()
    }
}
