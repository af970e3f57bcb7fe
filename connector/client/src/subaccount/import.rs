use http::Method;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::api::subaccount::SubaccountSummary;
use sapcc_common::api::subaccount::subaccount_path;
use sapcc_common::api::subaccount::subaccounts_path;
use sapcc_common::id::SubaccountIdentity;
use sapcc_common::renewal::AutoRenewBeforeDays;
use tracing::Instrument as _;
use tracing::debug;
use tracing::info_span;

use super::SubaccountError;
use super::SubaccountReconciler;
use super::state::Reconciled;
use crate::transport::NO_BODY;
use crate::transport::Transport;
use crate::transport::call_json;

impl<T: Transport> SubaccountReconciler<T> {
    /// Adopts an existing subaccount given its import key `<regionHost>,<subaccount>`.
    ///
    /// The credentials are unknown, so `connected` reflects the observed tunnel
    /// and a certificate due for renewal only yields a warning.
    pub async fn import(&self, key: &str) -> Result<Reconciled, SubaccountError> {
        let identity: SubaccountIdentity = key.parse()?;
        let span = info_span!("Import", %identity);
        async {
            let remote = self.fetch(&identity).await?;
            let connected = remote.tunnel.state.is_connected();
            self.refresh(remote, None, connected, AutoRenewBeforeDays::default())
                .await
        }
        .instrument(span)
        .await
    }

    pub async fn list(&self) -> Result<Vec<SubaccountSummary>, SubaccountError> {
        let subaccounts: Vec<SubaccountSummary> = call_json(
            self.transport.as_ref(),
            Method::GET,
            &subaccounts_path(),
            NO_BODY,
        )
        .await?;
        debug!(count = subaccounts.len(), "Listed subaccounts");
        Ok(subaccounts)
    }

    pub async fn fetch(
        &self,
        identity: &SubaccountIdentity,
    ) -> Result<SubaccountRemoteState, SubaccountError> {
        identity.check_path()?;
        let remote: SubaccountRemoteState = call_json(
            self.transport.as_ref(),
            Method::GET,
            &subaccount_path(identity),
            NO_BODY,
        )
        .await?;
        debug!(state = %remote.tunnel.state, "Fetched the subaccount");
        Ok(remote)
    }
}
