//! Cleanup orchestration.
//!
//! Lists the target schemas, drops every object found, lists again so any
//! leftovers are visible, then removes the pipeline storage path. Progress is
//! written line by line, so an aborted run shows exactly how far it got.

use std::io::Write;

use crate::catalog::{CatalogClient, CatalogObject};
use crate::client::ApiClient;
use crate::config::CleanupConfig;
use crate::error::ResetError;
use crate::storage::{ReclaimOutcome, StorageReclaimer};

/// Summary of a completed cleanup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Drop calls issued.
    pub dropped: usize,
    /// Objects still listed after the drops.
    pub residual: usize,
    /// Storage path result.
    pub storage: ReclaimOutcome,
}

/// Runs the cleanup sequence.
pub struct Cleanup<'a> {
    api: &'a ApiClient,
    config: &'a CleanupConfig,
}

impl<'a> Cleanup<'a> {
    pub fn new(api: &'a ApiClient, config: &'a CleanupConfig) -> Self {
        Self { api, config }
    }

    fn catalog(&self) -> CatalogClient<'a> {
        CatalogClient::new(self.api)
    }

    /// Print the objects in every target schema. Returns how many were found.
    pub async fn print_state<W: Write>(&self, out: &mut W) -> Result<usize, ResetError> {
        let catalog = &self.config.catalog;
        let mut total = 0;

        for schema in &self.config.schemas {
            let objects = self.catalog().list_objects(catalog, schema).await?;
            if objects.is_empty() {
                writeln!(out, "No objects found in {}.{}.", catalog, schema)?;
                continue;
            }

            writeln!(out, "Existing objects in {}.{}:", catalog, schema)?;
            for object in &objects {
                writeln!(out, "  - {} ({})", object.display_name(), object.declared_type)?;
            }
            total += objects.len();
        }

        Ok(total)
    }

    /// Run the full cleanup and remove `storage_path`.
    pub async fn run<W: Write>(
        &self,
        storage_path: &str,
        out: &mut W,
    ) -> Result<CleanupReport, ResetError> {
        let catalog = &self.config.catalog;
        tracing::info!(
            catalog = %catalog,
            schemas = ?self.config.schemas,
            "Starting catalog cleanup"
        );

        writeln!(out, "Cleaning catalog '{}' using REST APIs...", catalog)?;
        writeln!(out, "Current state before cleanup:")?;
        self.print_state(out).await?;

        let mut dropped = 0;
        for schema in &self.config.schemas {
            let objects = self.catalog().list_objects(catalog, schema).await?;
            if objects.is_empty() {
                writeln!(out, "No tables found in {}.{}; nothing to drop.", catalog, schema)?;
                continue;
            }
            dropped += self.drop_all(&objects, out).await?;
        }

        writeln!(out, "State after cleanup:")?;
        let residual = self.print_state(out).await?;
        if residual > 0 {
            tracing::warn!(catalog = %catalog, residual, "Objects remain after cleanup");
        }

        let storage = StorageReclaimer::new(self.api).reclaim(storage_path).await?;
        match storage {
            ReclaimOutcome::Removed => writeln!(out, "Removed DBFS path {}.", storage_path)?,
            ReclaimOutcome::Absent => writeln!(
                out,
                "DBFS path {} not found; skipping metadata cleanup.",
                storage_path
            )?,
        }

        writeln!(out, "Cleanup complete.")?;
        tracing::info!(catalog = %catalog, dropped, residual, "Catalog cleanup finished");

        Ok(CleanupReport {
            dropped,
            residual,
            storage,
        })
    }

    async fn drop_all<W: Write>(
        &self,
        objects: &[CatalogObject],
        out: &mut W,
    ) -> Result<usize, ResetError> {
        let catalog = self.catalog();
        let mut dropped = 0;

        for object in objects {
            if !catalog.drop_object(object).await? {
                continue;
            }
            writeln!(
                out,
                "Dropped {} {} (if it existed).",
                object.object_type, object.full_name
            )?;
            dropped += 1;
        }

        Ok(dropped)
    }
}
