//! Transport Client used by the reconciler to reach the Cloud Connector.

use http::Method;
use http::StatusCode;
use nameth::NamedEnumValues as _;
use nameth::nameth;
use sapcc_common::is_global::IsGlobal;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use self::http_transport::HttpTransport;
pub use self::http_transport::MakeTransportError;

mod http_transport;

/// Issues one request to the Cloud Connector and returns the body of the 2xx response.
///
/// Non-2xx responses surface as [TransportError::Status].
pub trait Transport: IsGlobal {
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("[{n}] {method} {url} failed: {error}", n = self.name())]
    Send {
        method: Method,
        url: String,
        error: reqwest::Error,
    },

    #[error("[{n}] {method} {url} returned {status}: {body}", n = self.name())]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("[{n}] {method} {url}: failed to read the response: {error}", n = self.name())]
    ReadBody {
        method: Method,
        url: String,
        error: reqwest::Error,
    },

    #[error("[{n}] {method} {path}: unexpected response {body:?}: {error}", n = self.name())]
    InvalidJson {
        method: Method,
        path: String,
        body: String,
        error: serde_json::Error,
    },

    #[error("[{n}] Failed to serialize the request: {0}", n = self.name())]
    Serialize(#[from] serde_json::Error),
}

impl TransportError {
    /// The HTTP status returned by the Cloud Connector, if the request went through.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Send { .. }
            | Self::ReadBody { .. }
            | Self::InvalidJson { .. }
            | Self::Serialize { .. } => None,
        }
    }
}

/// Sends an optional JSON body and parses the JSON response.
pub(crate) async fn call_json<R: DeserializeOwned>(
    transport: &impl Transport,
    method: Method,
    path: &str,
    body: Option<&impl Serialize>,
) -> Result<R, TransportError> {
    let response = call(transport, method.clone(), path, body).await?;
    serde_json::from_str(&response).map_err(|error| TransportError::InvalidJson {
        method,
        path: path.to_owned(),
        body: response,
        error,
    })
}

/// Sends an optional JSON body and discards the response.
pub(crate) async fn call_empty(
    transport: &impl Transport,
    method: Method,
    path: &str,
    body: Option<&impl Serialize>,
) -> Result<(), TransportError> {
    let _: String = call(transport, method, path, body).await?;
    Ok(())
}

async fn call(
    transport: &impl Transport,
    method: Method,
    path: &str,
    body: Option<&impl Serialize>,
) -> Result<String, TransportError> {
    let body = body.map(serde_json::to_string).transpose()?;
    transport.request(method, path, body).await
}

/// Placeholder body type for requests without a body.
pub(crate) const NO_BODY: Option<&()> = None;

#[cfg(test)]
mod tests {
    use http::Method;
    use http::StatusCode;

    use super::TransportError;

    #[test]
    fn status_error_message() {
        let error = TransportError::Status {
            method: Method::PUT,
            url: "https://scc:8443/api/v1/configuration/subaccounts/r/s/state".into(),
            status: StatusCode::UNAUTHORIZED,
            body: "Invalid credentials".into(),
        };
        assert_eq!(
            "[Status] PUT https://scc:8443/api/v1/configuration/subaccounts/r/s/state returned 401 Unauthorized: Invalid credentials",
            error.to_string()
        );
        assert_eq!(Some(StatusCode::UNAUTHORIZED), error.status());
    }

    #[test]
    fn invalid_json_message() {
        let error = serde_json::from_str::<u32>("oops").unwrap_err();
        let error = TransportError::InvalidJson {
            method: Method::GET,
            path: "/api".into(),
            body: "oops".into(),
            error,
        };
        assert!(
            error.to_string().starts_with("[InvalidJson] GET /api: unexpected response \"oops\": "),
            "{error}"
        );
        assert_eq!(None, error.status());
    }
}
