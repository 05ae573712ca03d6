//! Command-line interface.

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use crate::config::{CleanupConfig, DEFAULT_TIMEOUT_SECS};

/// Reset a pipeline catalog to an empty state.
#[derive(Debug, Parser)]
#[command(name = "catalog-reset")]
#[command(version, about = "Reset a Unity Catalog pipeline catalog through the workspace REST API", long_about = None)]
pub struct Cli {
    /// Catalog to clean
    #[arg(long, env = "CATALOG_RESET_CATALOG")]
    pub catalog: String,

    /// Target schema, can be repeated (default: raw, ref, mart)
    #[arg(
        long = "schema",
        env = "CATALOG_RESET_SCHEMAS",
        value_delimiter = ',',
        default_values = ["raw", "ref", "mart"]
    )]
    pub schemas: Vec<String>,

    /// Timeout for each API request, in seconds
    #[arg(long, env = "CATALOG_RESET_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Drop every object in the target schemas and remove the storage path
    Clean(CleanArgs),
    /// Print the objects currently in the target schemas
    List,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Pipeline storage path to remove, e.g. dbfs:/pipelines/nyctaxi
    #[arg(long, env = "CATALOG_RESET_STORAGE_PATH")]
    pub storage_path: String,
}

impl Cli {
    /// Cleanup settings derived from the flags.
    pub fn config(&self) -> CleanupConfig {
        CleanupConfig::new(self.catalog.clone())
            .with_schemas(self.schemas.iter().cloned())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}
