//! Catalog Reset
//!
//! Returns a Unity Catalog pipeline catalog to an empty, re-creatable state
//! through the workspace REST API.
//!
//! This crate provides:
//! - Credential resolution from the environment or a workspace profile
//! - An API client that treats 404 as "already gone"
//! - Object listing and type-dispatched deletion for tables, views and materialized views
//! - Storage path removal
//! - The cleanup orchestration tying these together

pub mod catalog;
pub mod cleanup;
pub mod cli;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod storage;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogClient, CatalogObject, ObjectType};
pub use cleanup::{Cleanup, CleanupReport};
pub use cli::{Cli, Commands};
pub use client::ApiClient;
pub use config::{CleanupConfig, CredentialEnv};
pub use credentials::{CredentialResolver, EndpointCredentials};
pub use error::ResetError;
pub use storage::{ReclaimOutcome, StorageReclaimer};
