use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::extract::State;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::IntoResponse as _;
use axum::response::Response;
use tracing::debug;

use super::FakeConnector;

/// A request received by the fake connector.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl std::fmt::Display for RecordedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Records the request, then rejects it if unauthenticated or scripted to fail.
pub(super) async fn record(
    State(connector): State<Arc<FakeConnector>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(error) => return (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
    };
    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();
    debug!(%method, path, "Request");
    connector.record(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body: serde_json::from_slice(&body).ok(),
    });

    if !parts.headers.contains_key(AUTHORIZATION) {
        return (StatusCode::UNAUTHORIZED, "Authentication required").into_response();
    }
    if let Some(status) = connector.failure(&method, &path) {
        debug!(%method, path, %status, "Injected failure");
        return (status, format!("Injected failure of {method} {path}")).into_response();
    }
    next.run(Request::from_parts(parts, Body::from(body))).await
}
