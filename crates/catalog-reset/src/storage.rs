//! Pipeline storage path removal.

use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ResetError;

/// Path metadata endpoint.
pub const GET_STATUS_PATH: &str = "/api/2.0/dbfs/get-status";

/// Path deletion endpoint.
pub const DELETE_PATH: &str = "/api/2.0/dbfs/delete";

/// What happened to the storage path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimOutcome {
    /// The path existed and a recursive delete was issued.
    Removed,
    /// The path did not exist; nothing was deleted.
    Absent,
}

/// Removes a bulk-storage path, checking that it exists first.
pub struct StorageReclaimer<'a> {
    api: &'a ApiClient,
}

impl<'a> StorageReclaimer<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Recursively delete `path` if it exists.
    pub async fn reclaim(&self, path: &str) -> Result<ReclaimOutcome, ResetError> {
        let status = self
            .api
            .request(Method::GET, GET_STATUS_PATH, &[("path", path)], None)
            .await?;
        if status.is_none() {
            tracing::debug!(path = %path, "Storage path absent");
            return Ok(ReclaimOutcome::Absent);
        }

        self.api
            .request(
                Method::POST,
                DELETE_PATH,
                &[],
                Some(serde_json::json!({
                    "path": path,
                    "recursive": true,
                })),
            )
            .await?;

        tracing::info!(path = %path, "Removed storage path");
        Ok(ReclaimOutcome::Removed)
    }
}
