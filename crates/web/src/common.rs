use axum::{
    extract::{OriginalUri, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use serde::{Deserialize, Serialize};
use transit::error::CoreError;

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

pub(crate) async fn route_not_found(OriginalUri(original_uri): OriginalUri, req: Request) -> impl IntoResponse {
    not_found_response(req.method(), original_uri.path())
}

// - Commonly used responses -

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND).with_method(method).with_uri(uri).with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self.status_code.canonical_reason().unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }
}

/// Maps the core's error taxonomy onto HTTP status codes. `TransientFetch`
/// only ever reaches a handler directly from a synchronous ingest trigger —
/// the background poller logs and retries instead of surfacing it here.
impl From<CoreError> for RouteErrorResponse {
    fn from(value: CoreError) -> Self {
        let status_code = match &value {
            CoreError::UnknownStop(_) | CoreError::NoRoutes => StatusCode::NOT_FOUND,
            CoreError::NoScheduleData => StatusCode::CONFLICT,
            CoreError::BadTimeInput(_) => StatusCode::BAD_REQUEST,
            CoreError::TransientFetch(_) => StatusCode::BAD_GATEWAY,
            CoreError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status_code).with_message(value.to_string())
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

pub(crate) fn not_found_response(method: &Method, uri: &str) -> impl IntoResponse {
    RouteErrorResponse::not_found(method, uri)
}
