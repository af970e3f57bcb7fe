use serde::Deserialize;
use serde::Serialize;

use super::CONFIGURATION_API;
use crate::id::LocationId;
use crate::id::RegionHost;
use crate::id::SubaccountId;
use crate::id::SubaccountIdentity;
use crate::validity::EpochMillis;
use crate::validity::Validity;

/// Path of the subaccount collection.
pub fn subaccounts_path() -> String {
    format!("{CONFIGURATION_API}/subaccounts")
}

/// Path of one subaccount.
pub fn subaccount_path(identity: &SubaccountIdentity) -> String {
    format!("{}/{}", subaccounts_path(), identity.path())
}

/// Sub-resources of a subaccount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubaccountEndpoint {
    /// Tunnel state.
    State,

    /// Trust configuration synchronization.
    Trust,

    /// Certificate renewal.
    Validity,
}

impl SubaccountEndpoint {
    pub fn path(self, identity: &SubaccountIdentity) -> String {
        let suffix = match self {
            Self::State => "state",
            Self::Trust => "trust",
            Self::Validity => "validity",
        };
        format!("{}/{suffix}", subaccount_path(identity))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TunnelState {
    Connected,
    Disconnected,
    ConnectFailure,
}

impl TunnelState {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

impl std::fmt::Display for TunnelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// The client certificate the subaccount uses to open the tunnel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubaccountCertificate {
    #[serde(rename = "subjectDN", default, skip_serializing_if = "Option::is_none")]
    pub subject_dn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(default)]
    pub not_before_time_stamp: EpochMillis,

    #[serde(default)]
    pub not_after_time_stamp: EpochMillis,
}

impl SubaccountCertificate {
    pub fn validity(&self) -> Validity {
        Validity {
            from: self.not_before_time_stamp,
            to: self.not_after_time_stamp,
        }
        .into()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConnection {
    #[serde(default)]
    pub connection_count: u32,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceChannel {
    #[serde(rename = "type")]
    pub kind: String,

    pub state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// The persistent outbound connection of a subaccount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tunnel {
    pub state: TunnelState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_since_time_stamp: Option<EpochMillis>,

    #[serde(default)]
    pub connections: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount_certificate: Option<SubaccountCertificate>,

    #[serde(default)]
    pub application_connections: Vec<ApplicationConnection>,

    #[serde(default)]
    pub service_channels: Vec<ServiceChannel>,
}

impl Tunnel {
    pub fn disconnected() -> Self {
        Self {
            state: TunnelState::Disconnected,
            connected_since_time_stamp: None,
            connections: 0,
            user: None,
            subaccount_certificate: None,
            application_connections: vec![],
            service_channels: vec![],
        }
    }
}

/// A subaccount as returned by the Cloud Connector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubaccountRemoteState {
    pub region_host: RegionHost,

    pub subaccount: SubaccountId,

    #[serde(rename = "locationID", default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub tunnel: Tunnel,
}

impl SubaccountRemoteState {
    pub fn identity(&self) -> SubaccountIdentity {
        SubaccountIdentity {
            region_host: self.region_host.clone(),
            subaccount: self.subaccount.clone(),
        }
    }
}

/// An item of the subaccount collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubaccountSummary {
    pub region_host: RegionHost,

    pub subaccount: SubaccountId,

    #[serde(rename = "locationID", default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&SubaccountRemoteState> for SubaccountSummary {
    fn from(remote: &SubaccountRemoteState) -> Self {
        Self {
            region_host: remote.region_host.clone(),
            subaccount: remote.subaccount.clone(),
            location_id: remote.location_id.clone(),
            display_name: remote.display_name.clone(),
            description: remote.description.clone(),
        }
    }
}

/// Request body to create a subaccount.
///
/// Either `cloud_user` and `cloud_password`, or `authentication_data` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubaccountRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_host: Option<RegionHost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount: Option<SubaccountId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_data: Option<String>,

    #[serde(rename = "locationID", default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body to update the metadata of a subaccount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubaccountRequest {
    #[serde(rename = "locationID", default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body to connect or disconnect the tunnel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelStateRequest {
    pub connected: bool,
}

/// Request body to renew the subaccount certificate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewCertificateRequest {
    pub user: String,
    pub password: String,
}
