//! The subaccount lifecycle reconciler.
//!
//! Drives a subaccount of the Cloud Connector toward the desired state:
//! - applies the subaccount itself and its metadata,
//! - toggles the tunnel when the desired and actual states diverge,
//! - renews the certificate when it is about to expire,
//! - synchronizes the trust configuration whenever the tunnel is connected.
//!
//! Every operation is a sequential pipeline of remote calls. Any failure
//! aborts the pipeline, except a tunnel that failed to connect, which is only
//! reported as a [SubaccountWarning].

use std::sync::Arc;

use http::StatusCode;
use nameth::NamedEnumValues as _;
use nameth::nameth;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::id::InvalidImportKey;
use sapcc_common::id::SubaccountIdentity;
use sapcc_common::renewal::AutoRenewBeforeDays;

use self::onboarding::OnboardingMethod;
use self::state::Reconciled;
use self::state::SubaccountState;
use self::warning::SubaccountWarning;
use crate::config::ConnectorConfig;
use crate::transport::HttpTransport;
use crate::transport::MakeTransportError;
use crate::transport::Transport;
use crate::transport::TransportError;

mod create;
mod delete;
mod import;
pub mod onboarding;
mod read;
mod renewal;
pub mod state;
mod trust;
mod tunnel;
mod update;
pub mod warning;

pub struct SubaccountReconciler<T> {
    transport: Arc<T>,
}

impl<T: Transport> SubaccountReconciler<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }
}

impl SubaccountReconciler<HttpTransport> {
    pub fn from_config(config: impl ConnectorConfig) -> Result<Self, MakeTransportError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T> Clone for SubaccountReconciler<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
        }
    }
}

fn reconciled(
    remote: SubaccountRemoteState,
    onboarding: Option<OnboardingMethod>,
    connected: bool,
    auto_renew_before_days: AutoRenewBeforeDays,
    warnings: Vec<SubaccountWarning>,
) -> Reconciled {
    let identity = remote.identity();
    Reconciled {
        state: SubaccountState {
            remote,
            onboarding,
            connected,
            auto_renew_before_days,
        },
        identity,
        warnings,
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum SubaccountError {
    #[error(
        "[{n}] Either the user and password of the subaccount or an authentication token must be supplied",
        n = self.name()
    )]
    MissingCredentials,

    #[error(
        "[{n}] The user and password of the subaccount cannot be combined with an authentication token",
        n = self.name()
    )]
    ConflictingCredentials,

    #[error(
        "[{n}] The subaccount {current} cannot become {planned}: the region host and subaccount can't change, the subaccount must be replaced",
        n = self.name()
    )]
    IdentityMismatch {
        planned: SubaccountIdentity,
        current: SubaccountIdentity,
    },

    #[error(
        "[{n}] The region host and subaccount must be known to onboard with a user and password",
        n = self.name()
    )]
    MissingIdentity,

    #[error("[{n}] {0}", n = self.name())]
    InvalidImportKey(#[from] InvalidImportKey),

    #[error("[{n}] {0}", n = self.name())]
    TransportFailure(#[from] TransportError),

    #[error("[{n}] Failed to renew the certificate of subaccount {identity}: {error}", n = self.name())]
    RenewalFailure {
        identity: SubaccountIdentity,
        error: TransportError,
    },

    #[error("[{n}] Failed to synchronize the trust configuration of subaccount {identity}: {error}", n = self.name())]
    TrustSyncFailure {
        identity: SubaccountIdentity,
        error: TransportError,
    },
}

impl SubaccountError {
    /// The Cloud Connector doesn't know the subaccount.
    ///
    /// The frontend drops the subaccount from its state when Read fails this way.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::TransportFailure(error) => error.status() == Some(StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}
