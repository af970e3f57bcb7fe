use http::Method;
use sapcc_common::api::subaccount::SubaccountEndpoint;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::id::SubaccountIdentity;
use tracing::debug;
use tracing::info;

use super::SubaccountError;
use super::SubaccountReconciler;
use crate::transport::NO_BODY;
use crate::transport::Transport;
use crate::transport::call_empty;

impl<T: Transport> SubaccountReconciler<T> {
    /// Aligns the trust store of the Cloud Connector with the current tunnel session.
    pub async fn sync_trust(&self, identity: &SubaccountIdentity) -> Result<(), SubaccountError> {
        let () = call_empty(
            self.transport.as_ref(),
            Method::POST,
            &SubaccountEndpoint::Trust.path(identity),
            NO_BODY,
        )
        .await
        .map_err(|error| SubaccountError::TrustSyncFailure {
            identity: identity.clone(),
            error,
        })?;
        info!("Synchronized the trust configuration");
        Ok(())
    }

    pub(super) async fn sync_trust_if_connected(
        &self,
        remote: &SubaccountRemoteState,
    ) -> Result<(), SubaccountError> {
        if !remote.tunnel.state.is_connected() {
            debug!(state = %remote.tunnel.state, "Skip trust synchronization");
            return Ok(());
        }
        self.sync_trust(&remote.identity()).await
    }
}
