use http::Method;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::api::subaccount::UpdateSubaccountRequest;
use sapcc_common::api::subaccount::subaccount_path;
use sapcc_common::id::SubaccountIdentity;
use sapcc_common::value::Value;
use tracing::Instrument as _;
use tracing::info;
use tracing::info_span;

use super::SubaccountError;
use super::SubaccountReconciler;
use super::reconciled;
use super::state::Reconciled;
use super::state::SubaccountPlan;
use super::state::SubaccountState;
use super::tunnel::check_connect_failure;
use crate::transport::Transport;
use crate::transport::call_json;

impl<T: Transport> SubaccountReconciler<T> {
    /// Applies the plan to an existing subaccount.
    ///
    /// The identity can't change: a plan naming another subaccount is rejected
    /// before any remote call. Identity fields that are not known in the plan,
    /// like the ones assigned remotely during token onboarding, keep their current value.
    pub async fn update(
        &self,
        plan: &SubaccountPlan,
        state: &SubaccountState,
    ) -> Result<Reconciled, SubaccountError> {
        let current = state.identity();
        let planned = SubaccountIdentity {
            region_host: plan
                .region_host
                .known()
                .cloned()
                .unwrap_or_else(|| current.region_host.clone()),
            subaccount: plan
                .subaccount
                .known()
                .cloned()
                .unwrap_or_else(|| current.subaccount.clone()),
        };
        if planned != current {
            return Err(SubaccountError::IdentityMismatch { planned, current });
        }

        let span = info_span!("Update", identity = %current);
        async {
            let request = UpdateSubaccountRequest {
                location_id: plan.location_id.clone(),
                display_name: plan.display_name.clone(),
                description: plan.description.clone(),
            };
            let remote: SubaccountRemoteState = call_json(
                self.transport.as_ref(),
                Method::PUT,
                &subaccount_path(&current),
                Some(&request),
            )
            .await?;
            info!(state = %remote.tunnel.state, "Updated the subaccount");

            let remote = match plan.connected {
                Value::Known(connected) => self.toggle_tunnel(remote, connected).await?,
                Value::Unset | Value::Unknown => remote,
            };
            let mut warnings = vec![];
            check_connect_failure(&remote, &mut warnings);

            let onboarding = match &plan.onboarding {
                Value::Known(onboarding) => Some(onboarding.clone()),
                Value::Unset | Value::Unknown => state.onboarding.clone(),
            };
            let remote = match plan.auto_renew_before_days {
                Value::Known(window) => {
                    self.renew_certificate_if_due(remote, onboarding.as_ref(), window, &mut warnings)
                        .await?
                }
                Value::Unset | Value::Unknown => remote,
            };
            let () = self.sync_trust_if_connected(&remote).await?;

            let connected = plan.connected.known_or(state.connected);
            let window = plan
                .auto_renew_before_days
                .known_or(state.auto_renew_before_days);
            Ok(reconciled(remote, onboarding, connected, window, warnings))
        }
        .instrument(span)
        .await
    }
}
