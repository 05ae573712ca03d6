//! Catalog object listing and type-dispatched deletion.

use reqwest::Method;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

use crate::client::ApiClient;
use crate::error::ResetError;

/// Table listing and table deletion endpoint.
pub const TABLES_PATH: &str = "/api/2.1/unity-catalog/tables";

/// View deletion endpoint.
pub const VIEWS_PATH: &str = "/api/2.1/unity-catalog/views";

/// Materialized view deletion endpoint.
pub const MATERIALIZED_VIEWS_PATH: &str = "/api/2.1/unity-catalog/materialized-views";

/// Kind of catalog object, which decides the deletion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectType {
    #[default]
    Table,
    View,
    MaterializedView,
}

impl ObjectType {
    /// Classify a `table_type` reported by the API.
    ///
    /// Anything other than a view or materialized view is deleted as a table.
    pub fn from_declared(declared: &str) -> Self {
        match declared {
            "VIEW" => ObjectType::View,
            "MATERIALIZED_VIEW" => ObjectType::MaterializedView,
            _ => ObjectType::Table,
        }
    }

    /// Collection endpoint objects of this type are deleted under.
    pub fn endpoint(self) -> &'static str {
        match self {
            ObjectType::Table => TABLES_PATH,
            ObjectType::View => VIEWS_PATH,
            ObjectType::MaterializedView => MATERIALIZED_VIEWS_PATH,
        }
    }

    /// Deletion path for `full_name`, encoded as a single path segment.
    pub fn delete_path(self, full_name: &str) -> String {
        format!("{}/{}", self.endpoint(), urlencoding::encode(full_name))
    }

    /// Human-readable kind used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            ObjectType::Table => "table",
            ObjectType::View => "view",
            ObjectType::MaterializedView => "materialized view",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A table, view or materialized view found in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogObject {
    /// Qualified `catalog.schema.object` name. Empty when the API omitted it.
    pub full_name: String,

    /// Type used to route the deletion.
    pub object_type: ObjectType,

    /// `table_type` exactly as reported, e.g. `MANAGED` or `VIEW`.
    pub declared_type: String,
}

impl CatalogObject {
    pub fn new(full_name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        Self {
            full_name: full_name.into(),
            object_type: ObjectType::from_declared(&declared_type),
            declared_type,
        }
    }

    /// Name for display, with a placeholder for unnamed entries.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            "<unknown>"
        } else {
            &self.full_name
        }
    }
}

#[derive(Debug, Deserialize)]
struct TableInfo {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    table_type: Option<String>,
}

impl From<TableInfo> for CatalogObject {
    fn from(info: TableInfo) -> Self {
        CatalogObject::new(
            info.full_name.unwrap_or_default(),
            info.table_type.unwrap_or_else(|| "TABLE".to_string()),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListTablesResponse {
    #[serde(default)]
    tables: Option<Vec<TableInfo>>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Lists and drops catalog objects through the workspace API.
pub struct CatalogClient<'a> {
    api: &'a ApiClient,
}

impl<'a> CatalogClient<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// List the objects in `catalog.schema`, in the order the API returns them.
    ///
    /// A missing or empty schema yields an empty list. A page token the
    /// service already handed out is a decode error.
    pub async fn list_objects(
        &self,
        catalog: &str,
        schema: &str,
    ) -> Result<Vec<CatalogObject>, ResetError> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut query = vec![("catalog_name", catalog), ("schema_name", schema)];
            if let Some(ref token) = page_token {
                query.push(("page_token", token.as_str()));
            }

            let Some(value) = self.api.request(Method::GET, TABLES_PATH, &query, None).await? else {
                break;
            };

            let page: ListTablesResponse = serde_json::from_value(value).map_err(|e| {
                ResetError::Decode(format!("Invalid table listing for {}.{}: {}", catalog, schema, e))
            })?;
            objects.extend(
                page.tables
                    .unwrap_or_default()
                    .into_iter()
                    .map(CatalogObject::from),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(ResetError::Decode(format!(
                            "Table listing for {}.{} repeated page token '{}'",
                            catalog, schema, token
                        )));
                    }
                    page_token = Some(token);
                }
                None => break,
            }
        }

        tracing::debug!(catalog = %catalog, schema = %schema, count = objects.len(), "Listed objects");
        Ok(objects)
    }

    /// Drop `object` through the endpoint matching its type.
    ///
    /// Dropping an object that no longer exists succeeds. Unnamed objects are
    /// skipped. Returns whether a delete was issued, which says nothing about
    /// whether the object existed.
    pub async fn drop_object(&self, object: &CatalogObject) -> Result<bool, ResetError> {
        if object.full_name.is_empty() {
            tracing::warn!(declared_type = %object.declared_type, "Skipping object without a name");
            return Ok(false);
        }

        let path = object.object_type.delete_path(&object.full_name);
        tracing::debug!(
            name = %object.full_name,
            kind = %object.object_type,
            "Dropping object"
        );
        self.api.request(Method::DELETE, &path, &[], None).await?;
        Ok(true)
    }
}
