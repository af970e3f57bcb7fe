use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use dashmap::mapref::entry::Entry;
use sapcc_common::api::subaccount::CreateSubaccountRequest;
use sapcc_common::api::subaccount::RenewCertificateRequest;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::api::subaccount::SubaccountSummary;
use sapcc_common::api::subaccount::Tunnel;
use sapcc_common::api::subaccount::TunnelStateRequest;
use sapcc_common::api::subaccount::UpdateSubaccountRequest;
use sapcc_common::api::subaccount::subaccounts_path;
use sapcc_common::id::SubaccountIdentity;
use tower_http::trace::DefaultMakeSpan;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing::info;

use super::FakeConnector;
use super::disconnect;
use super::error::FakeConnectorError;
use super::issue_certificate;
use super::recorder::record;

type Connector = State<Arc<FakeConnector>>;
type Identity = Path<(String, String)>;

impl FakeConnector {
    pub(super) fn make_app(self: &Arc<Self>) -> Router {
        let subaccounts = subaccounts_path();
        let subaccount = format!("{subaccounts}/{{region_host}}/{{subaccount}}");
        Router::new()
            .route(&subaccounts, get(list).post(create))
            .route(
                &subaccount,
                get(get_subaccount).put(update).delete(delete),
            )
            .route(&format!("{subaccount}/state"), put(set_state))
            .route(&format!("{subaccount}/trust"), post(sync_trust))
            .route(&format!("{subaccount}/validity"), post(renew_certificate))
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::default().level(Level::DEBUG)),
            )
            .with_state(self.clone())
    }
}

fn identity(Path((region_host, subaccount)): Identity) -> SubaccountIdentity {
    SubaccountIdentity::new(region_host, subaccount)
}

async fn list(State(connector): Connector) -> Json<Vec<SubaccountSummary>> {
    let mut subaccounts = connector
        .subaccounts
        .iter()
        .map(|entry| SubaccountSummary::from(entry.value()))
        .collect::<Vec<_>>();
    subaccounts.sort_by(|a, b| {
        (&a.region_host, &a.subaccount).cmp(&(&b.region_host, &b.subaccount))
    });
    Json(subaccounts)
}

async fn create(
    State(connector): Connector,
    Json(request): Json<CreateSubaccountRequest>,
) -> Result<(StatusCode, Json<SubaccountRemoteState>), FakeConnectorError> {
    let (identity, user) = if let Some(token) = &request.authentication_data {
        let identity = connector
            .tokens
            .get(token)
            .map(|identity| identity.clone())
            .ok_or(FakeConnectorError::InvalidToken)?;
        (identity, None)
    } else {
        let (Some(region_host), Some(subaccount)) =
            (request.region_host.clone(), request.subaccount.clone())
        else {
            return Err(FakeConnectorError::BadRequest(
                "regionHost and subaccount are required",
            ));
        };
        let (Some(user), Some(_)) = (request.cloud_user.clone(), &request.cloud_password) else {
            return Err(FakeConnectorError::BadRequest(
                "cloudUser and cloudPassword are required",
            ));
        };
        (
            SubaccountIdentity {
                region_host,
                subaccount,
            },
            Some(user),
        )
    };

    let vacant = match connector.subaccounts.entry(identity.clone()) {
        Entry::Occupied(_) => return Err(FakeConnectorError::AlreadyExists(identity)),
        Entry::Vacant(vacant) => vacant,
    };
    let mut tunnel = Tunnel {
        user,
        subaccount_certificate: Some(issue_certificate(&identity)),
        ..Tunnel::disconnected()
    };
    connector.connect(&mut tunnel);
    let remote = SubaccountRemoteState {
        region_host: identity.region_host,
        subaccount: identity.subaccount,
        location_id: request.location_id,
        display_name: request.display_name,
        description: request.description,
        tunnel,
    };
    info!(identity = %remote.identity(), state = %remote.tunnel.state, "Created");
    vacant.insert(remote.clone());
    Ok((StatusCode::CREATED, Json(remote)))
}

async fn get_subaccount(
    State(connector): Connector,
    path: Identity,
) -> Result<Json<SubaccountRemoteState>, FakeConnectorError> {
    let identity = identity(path);
    match connector.get(&identity) {
        Some(remote) => Ok(Json(remote)),
        None => Err(FakeConnectorError::NotFound(identity)),
    }
}

async fn update(
    State(connector): Connector,
    path: Identity,
    Json(request): Json<UpdateSubaccountRequest>,
) -> Result<Json<SubaccountRemoteState>, FakeConnectorError> {
    let identity = identity(path);
    let Some(mut remote) = connector.subaccounts.get_mut(&identity) else {
        return Err(FakeConnectorError::NotFound(identity));
    };
    remote.location_id = request.location_id;
    remote.display_name = request.display_name;
    remote.description = request.description;
    Ok(Json(remote.clone()))
}

async fn delete(
    State(connector): Connector,
    path: Identity,
) -> Result<StatusCode, FakeConnectorError> {
    let identity = identity(path);
    match connector.subaccounts.remove(&identity) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(FakeConnectorError::NotFound(identity)),
    }
}

async fn set_state(
    State(connector): Connector,
    path: Identity,
    Json(request): Json<TunnelStateRequest>,
) -> Result<StatusCode, FakeConnectorError> {
    let identity = identity(path);
    let Some(mut remote) = connector.subaccounts.get_mut(&identity) else {
        return Err(FakeConnectorError::NotFound(identity));
    };
    if request.connected {
        connector.connect(&mut remote.tunnel);
    } else {
        disconnect(&mut remote.tunnel);
    }
    info!(%identity, state = %remote.tunnel.state, "Tunnel");
    Ok(StatusCode::NO_CONTENT)
}

async fn sync_trust(
    State(connector): Connector,
    path: Identity,
) -> Result<StatusCode, FakeConnectorError> {
    let identity = identity(path);
    if !connector.subaccounts.contains_key(&identity) {
        return Err(FakeConnectorError::NotFound(identity));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn renew_certificate(
    State(connector): Connector,
    path: Identity,
    Json(request): Json<RenewCertificateRequest>,
) -> Result<Json<SubaccountRemoteState>, FakeConnectorError> {
    let identity = identity(path);
    if request.user.is_empty() || request.password.is_empty() {
        return Err(FakeConnectorError::BadRequest("user and password are required"));
    }
    let Some(mut remote) = connector.subaccounts.get_mut(&identity) else {
        return Err(FakeConnectorError::NotFound(identity));
    };
    remote.tunnel.subaccount_certificate = Some(issue_certificate(&identity));
    info!(%identity, "Renewed the certificate");
    Ok(Json(remote.clone()))
}
