use http::Method;
use http::header::ACCEPT;
use http::header::CONTENT_TYPE;
use mime::APPLICATION_JSON;
use nameth::NamedEnumValues as _;
use nameth::nameth;
use reqwest::Certificate;
use tracing::debug;
use tracing::warn;

use super::Transport;
use super::TransportError;
use crate::config::BasicCredentials;
use crate::config::ConnectorConfig;

/// [Transport] backed by a [reqwest::Client] with basic authentication.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    credentials: BasicCredentials,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: impl ConnectorConfig) -> Result<Self, MakeTransportError> {
        let base_url = config.base_url().to_string();
        let client = make_http_client(&config)?;
        debug!(base_url, "Created HTTP transport");
        Ok(Self {
            base_url,
            credentials: config.credentials(),
            client,
        })
    }
}

impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<String, TransportError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, url, "Request");
        let mut request = self
            .client
            .request(method.clone(), &url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.password))
            .header(ACCEPT, APPLICATION_JSON.as_ref());
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, APPLICATION_JSON.as_ref())
                .body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => return Err(TransportError::Send { method, url, error }),
        };
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => return Err(TransportError::ReadBody { method, url, error }),
        };
        if !status.is_success() {
            warn!(%method, url, %status, body, "Request failed");
            return Err(TransportError::Status {
                method,
                url,
                status,
                body,
            });
        }
        debug!(%status, "Response");
        Ok(body)
    }
}

fn make_http_client(config: &impl ConnectorConfig) -> Result<reqwest::Client, MakeTransportError> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout())
        .danger_accept_invalid_certs(config.accept_invalid_certs());
    let roots = config
        .trusted_roots_pem()
        .map_err(MakeTransportError::TrustedRoots)?;
    if let Some(roots) = roots {
        let roots =
            Certificate::from_pem_bundle(roots.as_bytes()).map_err(MakeTransportError::ParsePem)?;
        for root in roots {
            builder = builder.add_root_certificate(root);
        }
    }
    builder.build().map_err(MakeTransportError::Build)
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum MakeTransportError {
    #[error("[{n}] Failed to load the trusted roots: {0}", n = self.name())]
    TrustedRoots(std::io::Error),

    #[error("[{n}] Failed to parse the trusted roots: {0}", n = self.name())]
    ParsePem(reqwest::Error),

    #[error("[{n}] {0}", n = self.name())]
    Build(reqwest::Error),
}
