use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::renewal::AutoRenewBeforeDays;
use tracing::Instrument as _;
use tracing::info_span;

use super::SubaccountError;
use super::SubaccountReconciler;
use super::onboarding::OnboardingMethod;
use super::reconciled;
use super::state::Reconciled;
use super::state::SubaccountState;
use crate::transport::Transport;

impl<T: Transport> SubaccountReconciler<T> {
    /// Refreshes the state of the subaccount.
    ///
    /// A certificate due for renewal gets renewed as a side effect.
    pub async fn read(&self, state: &SubaccountState) -> Result<Reconciled, SubaccountError> {
        let identity = state.identity();
        let span = info_span!("Read", %identity);
        async {
            let remote = self.fetch(&identity).await?;
            self.refresh(
                remote,
                state.onboarding.clone(),
                state.connected,
                state.auto_renew_before_days,
            )
            .await
        }
        .instrument(span)
        .await
    }

    /// Renews the certificate if due, then synchronizes trust if connected.
    pub(super) async fn refresh(
        &self,
        remote: SubaccountRemoteState,
        onboarding: Option<OnboardingMethod>,
        connected: bool,
        window: AutoRenewBeforeDays,
    ) -> Result<Reconciled, SubaccountError> {
        let mut warnings = vec![];
        let remote = self
            .renew_certificate_if_due(remote, onboarding.as_ref(), window, &mut warnings)
            .await?;
        let () = self.sync_trust_if_connected(&remote).await?;
        Ok(reconciled(remote, onboarding, connected, window, warnings))
    }
}
