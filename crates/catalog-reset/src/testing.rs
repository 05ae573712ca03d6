//! In-memory workspace used by unit tests.
//!
//! Emulates the catalog and storage endpoints the cleanup touches: absent
//! resources answer 404, deletes only succeed through the endpoint matching the
//! object type, and every request is recorded for inspection.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use crate::catalog::{ObjectType, MATERIALIZED_VIEWS_PATH, TABLES_PATH, VIEWS_PATH};
use crate::client::{ApiClient, HttpRequest, HttpResponse, Transport};
use crate::credentials::EndpointCredentials;
use crate::error::ResetError;
use crate::storage::{DELETE_PATH, GET_STATUS_PATH};

pub(crate) const TEST_HOST: &str = "https://test.cloud.databricks.com";
pub(crate) const TEST_TOKEN: &str = "dapi-test-token";

#[derive(Default)]
struct State {
    /// (full_name, table_type) in listing order.
    objects: Vec<(String, Option<String>)>,
    paths: BTreeSet<String>,
    overrides: HashMap<(Method, String), HttpResponse>,
    requests: Vec<HttpRequest>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeWorkspace {
    state: Arc<Mutex<State>>,
    page_size: Option<usize>,
}

impl FakeWorkspace {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_object(self, full_name: &str, table_type: Option<&str>) -> Self {
        self.state
            .lock()
            .unwrap()
            .objects
            .push((full_name.to_string(), table_type.map(str::to_string)));
        self
    }

    pub(crate) fn with_path(self, path: &str) -> Self {
        self.state.lock().unwrap().paths.insert(path.to_string());
        self
    }

    pub(crate) fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Answer every `method` request to `path` with a fixed response.
    pub(crate) fn respond(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.state
            .lock()
            .unwrap()
            .overrides
            .insert((method, path.to_string()), HttpResponse::new(status, body));
    }

    pub(crate) fn client(&self) -> ApiClient {
        let credentials = EndpointCredentials::new(TEST_HOST, TEST_TOKEN).unwrap();
        ApiClient::with_transport(credentials, Arc::new(self.clone()))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", TEST_HOST, path)
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn object_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .objects
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.state.lock().unwrap().paths.iter().cloned().collect()
    }

    fn handle(&self, state: &mut State, request: &HttpRequest, path: &str) -> HttpResponse {
        let query: HashMap<&str, &str> = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        match (&request.method, path) {
            (&Method::GET, TABLES_PATH) => self.list_tables(state, &query),
            (&Method::GET, GET_STATUS_PATH) => {
                let path = query.get("path").copied().unwrap_or_default();
                if state.paths.contains(path) {
                    ok(serde_json::json!({"path": path, "is_dir": true, "file_size": 0}))
                } else {
                    not_found()
                }
            }
            (&Method::POST, DELETE_PATH) => {
                let Some(target) = request
                    .body
                    .as_ref()
                    .and_then(|b| b.get("path"))
                    .and_then(|p| p.as_str())
                else {
                    return HttpResponse::new(StatusCode::BAD_REQUEST, "missing path");
                };
                let prefix = format!("{}/", target);
                let before = state.paths.len();
                state.paths.retain(|p| p != target && !p.starts_with(&prefix));
                if state.paths.len() == before {
                    not_found()
                } else {
                    ok(serde_json::json!({}))
                }
            }
            (&Method::DELETE, _) => self.delete_object(state, path),
            _ => HttpResponse::new(StatusCode::NOT_IMPLEMENTED, format!("unhandled {}", path)),
        }
    }

    fn list_tables(&self, state: &State, query: &HashMap<&str, &str>) -> HttpResponse {
        let prefix = format!(
            "{}.{}.",
            query.get("catalog_name").copied().unwrap_or_default(),
            query.get("schema_name").copied().unwrap_or_default()
        );
        let matching: Vec<_> = state
            .objects
            .iter()
            .filter(|(name, _)| name.starts_with(&prefix))
            .collect();

        let start: usize = query
            .get("page_token")
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);
        let end = match self.page_size {
            Some(size) => (start + size).min(matching.len()),
            None => matching.len(),
        };

        if matching.is_empty() {
            return ok(serde_json::json!({}));
        }

        let tables: Vec<_> = matching[start..end]
            .iter()
            .map(|(name, table_type)| match table_type {
                Some(t) => serde_json::json!({"full_name": name, "table_type": t}),
                None => serde_json::json!({"full_name": name}),
            })
            .collect();

        let mut body = serde_json::json!({ "tables": tables });
        if end < matching.len() {
            body["next_page_token"] = serde_json::json!(end.to_string());
        }
        ok(body)
    }

    fn delete_object(&self, state: &mut State, path: &str) -> HttpResponse {
        let routes = [
            (ObjectType::MaterializedView, MATERIALIZED_VIEWS_PATH),
            (ObjectType::View, VIEWS_PATH),
            (ObjectType::Table, TABLES_PATH),
        ];
        let Some((kind, encoded)) = routes.iter().find_map(|(kind, base)| {
            path.strip_prefix(*base)
                .and_then(|rest| rest.strip_prefix('/'))
                .map(|rest| (*kind, rest))
        }) else {
            return HttpResponse::new(StatusCode::NOT_IMPLEMENTED, format!("unhandled {}", path));
        };

        if encoded.contains('/') {
            return HttpResponse::new(StatusCode::BAD_REQUEST, "name must be one path segment");
        }
        let Ok(name) = urlencoding::decode(encoded) else {
            return HttpResponse::new(StatusCode::BAD_REQUEST, "bad encoding");
        };

        let position = state.objects.iter().position(|(n, t)| {
            *n == name && ObjectType::from_declared(t.as_deref().unwrap_or("TABLE")) == kind
        });
        match position {
            Some(index) => {
                state.objects.remove(index);
                ok(serde_json::json!({}))
            }
            None => not_found(),
        }
    }
}

#[async_trait]
impl Transport for FakeWorkspace {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ResetError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let Some(path) = request.url.strip_prefix(TEST_HOST).map(str::to_string) else {
            return Err(ResetError::Transport(format!("unknown host: {}", request.url)));
        };

        if let Some(response) = state.overrides.get(&(request.method.clone(), path.clone())) {
            return Ok(response.clone());
        }

        Ok(self.handle(&mut state, &request, &path))
    }
}

fn ok(body: serde_json::Value) -> HttpResponse {
    HttpResponse::new(StatusCode::OK, body.to_string())
}

fn not_found() -> HttpResponse {
    HttpResponse::new(
        StatusCode::NOT_FOUND,
        r#"{"error_code": "RESOURCE_DOES_NOT_EXIST"}"#,
    )
}
