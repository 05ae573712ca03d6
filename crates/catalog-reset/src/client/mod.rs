//! Workspace API client and its HTTP transport.

mod api;
mod transport;

pub use api::ApiClient;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
