use http::Method;
use sapcc_common::api::subaccount::SubaccountEndpoint;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::api::subaccount::TunnelStateRequest;
use sapcc_common::api::subaccount::TunnelState;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::SubaccountError;
use super::SubaccountReconciler;
use super::warning::SubaccountWarning;
use crate::transport::Transport;
use crate::transport::call_empty;

impl<T: Transport> SubaccountReconciler<T> {
    /// Connects or disconnects the tunnel if it isn't already in the desired state.
    ///
    /// The state endpoint doesn't return the subaccount, so it is fetched again after a toggle.
    pub async fn toggle_tunnel(
        &self,
        remote: SubaccountRemoteState,
        connected: bool,
    ) -> Result<SubaccountRemoteState, SubaccountError> {
        let actual = remote.tunnel.state;
        if actual.is_connected() == connected {
            debug!(%actual, connected, "The tunnel is already in the desired state");
            return Ok(remote);
        }

        let identity = remote.identity();
        info!(%actual, connected, "Toggling the tunnel");
        let () = call_empty(
            self.transport.as_ref(),
            Method::PUT,
            &SubaccountEndpoint::State.path(&identity),
            Some(&TunnelStateRequest { connected }),
        )
        .await?;
        let remote = self.fetch(&identity).await?;
        info!(state = %remote.tunnel.state, "Toggled the tunnel");
        Ok(remote)
    }
}

/// A tunnel that failed to connect doesn't fail the operation.
///
/// The desired `connected` flag is left untouched: the operator retries by toggling it off and on.
pub(super) fn check_connect_failure(
    remote: &SubaccountRemoteState,
    warnings: &mut Vec<SubaccountWarning>,
) {
    if remote.tunnel.state == TunnelState::ConnectFailure {
        let identity = remote.identity();
        warn!(%identity, "The tunnel failed to connect");
        warnings.push(SubaccountWarning::ConnectFailure { identity });
    }
}
