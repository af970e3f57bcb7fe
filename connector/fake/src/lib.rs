//! An in-memory Cloud Connector configuration API.
//!
//! Serves the subaccount endpoints over plain HTTP on an ephemeral port,
//! records every request it receives, and lets tests script the outcome of
//! tunnel connections, certificate expiry and endpoint failures.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::SeqCst;
use std::time::Duration;
use std::time::SystemTime;

use axum::http::Method;
use axum::http::StatusCode;
use dashmap::DashMap;
use sapcc_common::api::subaccount::SubaccountCertificate;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::api::subaccount::Tunnel;
use sapcc_common::api::subaccount::TunnelState;
use sapcc_common::id::SubaccountIdentity;
use sapcc_common::validity::EpochMillis;
use tokio::net::TcpListener;
use tracing::Instrument as _;
use tracing::info;
use tracing::info_span;
use tracing::warn;

use self::handle::ServerHandle;
use self::recorder::RecordedRequest;

mod error;
pub mod handle;
pub mod recorder;
mod routes;

/// Validity of the certificates issued by the fake connector.
pub const CERTIFICATE_VALIDITY: Duration = Duration::from_secs(365 * 24 * 3600);

pub struct FakeConnector {
    base_url: String,
    subaccounts: DashMap<SubaccountIdentity, SubaccountRemoteState>,
    tokens: DashMap<String, SubaccountIdentity>,
    connect_failure: AtomicBool,
    failures: DashMap<(Method, String), StatusCode>,
    requests: DashMap<usize, RecordedRequest>,
    next_request: AtomicUsize,
}

impl FakeConnector {
    /// Starts serving on `127.0.0.1` on an ephemeral port.
    pub async fn start() -> std::io::Result<(Arc<Self>, ServerHandle<()>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        let connector = Arc::new(Self::new(format!("http://{address}")));
        let app = connector.make_app();

        let (shutdown_rx, terminated_tx, handle) = ServerHandle::new();
        let span = info_span!("FakeConnector", %address);
        tokio::spawn(
            async move {
                info!("Serving");
                let result = axum::serve(listener, app)
                    .with_graceful_shutdown(shutdown_rx)
                    .await;
                if let Err(error) = result {
                    warn!(%error, "Server failed");
                }
                let _ = terminated_tx.send(());
            }
            .instrument(span),
        );
        Ok((connector, handle))
    }

    fn new(base_url: String) -> Self {
        Self {
            base_url,
            subaccounts: DashMap::new(),
            tokens: DashMap::new(),
            connect_failure: AtomicBool::new(false),
            failures: DashMap::new(),
            requests: DashMap::new(),
            next_request: AtomicUsize::new(0),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The requests received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        let mut requests = self
            .requests
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect::<Vec<_>>();
        requests.sort_by_key(|(index, _)| *index);
        requests.into_iter().map(|(_, request)| request).collect()
    }

    pub fn clear_requests(&self) {
        self.requests.clear();
    }

    fn record(&self, request: RecordedRequest) {
        let index = self.next_request.fetch_add(1, SeqCst);
        self.requests.insert(index, request);
    }

    /// Stores a subaccount as if it had been created earlier.
    pub fn insert(&self, remote: SubaccountRemoteState) {
        self.subaccounts.insert(remote.identity(), remote);
    }

    pub fn get(&self, identity: &SubaccountIdentity) -> Option<SubaccountRemoteState> {
        self.subaccounts.get(identity).map(|entry| entry.clone())
    }

    /// Onboarding with `token` creates the given subaccount.
    pub fn register_token(&self, token: impl Into<String>, identity: SubaccountIdentity) {
        self.tokens.insert(token.into(), identity);
    }

    /// Whether opening a tunnel fails with [TunnelState::ConnectFailure].
    pub fn set_connect_failure(&self, connect_failure: bool) {
        self.connect_failure.store(connect_failure, SeqCst);
    }

    /// Returns false if the subaccount doesn't exist or has no certificate.
    pub fn set_certificate_not_after(
        &self,
        identity: &SubaccountIdentity,
        not_after: SystemTime,
    ) -> bool {
        let Some(mut remote) = self.subaccounts.get_mut(identity) else {
            return false;
        };
        let Some(certificate) = &mut remote.tunnel.subaccount_certificate else {
            return false;
        };
        certificate.not_after_time_stamp = not_after.into();
        true
    }

    /// Makes every `method path` request fail with `status`.
    pub fn fail(&self, method: Method, path: impl Into<String>, status: StatusCode) {
        self.failures.insert((method, path.into()), status);
    }

    fn failure(&self, method: &Method, path: &str) -> Option<StatusCode> {
        self.failures
            .get(&(method.clone(), path.to_owned()))
            .map(|status| *status)
    }

    /// Opens the tunnel, or fails to if scripted so.
    fn connect(&self, tunnel: &mut Tunnel) {
        if self.connect_failure.load(SeqCst) {
            tunnel.state = TunnelState::ConnectFailure;
            tunnel.connected_since_time_stamp = None;
            tunnel.connections = 0;
        } else {
            tunnel.state = TunnelState::Connected;
            tunnel.connected_since_time_stamp = Some(SystemTime::now().into());
            tunnel.connections = 1;
        }
    }
}

fn disconnect(tunnel: &mut Tunnel) {
    tunnel.state = TunnelState::Disconnected;
    tunnel.connected_since_time_stamp = None;
    tunnel.connections = 0;
}

fn issue_certificate(identity: &SubaccountIdentity) -> SubaccountCertificate {
    let now = SystemTime::now();
    SubaccountCertificate {
        subject_dn: Some(format!(
            "CN={},L={},OU=SAP Cloud Platform Clients,O=SAP SE,C=DE",
            identity.subaccount, identity.region_host
        )),
        issuer: Some("CN=SAP Cloud Platform Client CA,OU=SAP Cloud Platform Clients,O=SAP SE,L=EU10,C=DE".into()),
        serial_number: Some(uuid::Uuid::new_v4().simple().to_string()),
        not_before_time_stamp: EpochMillis::from(now),
        not_after_time_stamp: EpochMillis::from(now + CERTIFICATE_VALIDITY),
    }
}
