use http::Method;
use nameth::NamedEnumValues as _;
use sapcc_common::api::subaccount::CreateSubaccountRequest;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::api::subaccount::subaccounts_path;
use sapcc_common::renewal::AutoRenewBeforeDays;
use sapcc_common::value::Value;
use tracing::Instrument as _;
use tracing::info;
use tracing::info_span;

use super::SubaccountError;
use super::SubaccountReconciler;
use super::onboarding::OnboardingMethod;
use super::reconciled;
use super::state::Reconciled;
use super::state::SubaccountPlan;
use super::tunnel::check_connect_failure;
use crate::transport::Transport;
use crate::transport::call_json;

impl<T: Transport> SubaccountReconciler<T> {
    pub async fn create(&self, plan: &SubaccountPlan) -> Result<Reconciled, SubaccountError> {
        let Value::Known(onboarding) = &plan.onboarding else {
            return Err(SubaccountError::MissingCredentials);
        };
        let mut request = CreateSubaccountRequest {
            location_id: plan.location_id.clone(),
            display_name: plan.display_name.clone(),
            description: plan.description.clone(),
            ..CreateSubaccountRequest::default()
        };
        if let OnboardingMethod::Credentials { .. } = onboarding {
            let identity = plan.identity().ok_or(SubaccountError::MissingIdentity)?;
            identity.check_path()?;
            request.region_host = Some(identity.region_host);
            request.subaccount = Some(identity.subaccount);
        }
        onboarding.apply(&mut request);

        let span = info_span!("Create", onboarding = onboarding.name());
        async {
            let remote: SubaccountRemoteState = call_json(
                self.transport.as_ref(),
                Method::POST,
                &subaccounts_path(),
                Some(&request),
            )
            .await?;
            info!(identity = %remote.identity(), state = %remote.tunnel.state, "Created the subaccount");

            let remote = match plan.connected {
                Value::Known(connected) => self.toggle_tunnel(remote, connected).await?,
                Value::Unset | Value::Unknown => remote,
            };
            let mut warnings = vec![];
            check_connect_failure(&remote, &mut warnings);
            let () = self.sync_trust_if_connected(&remote).await?;

            let connected = plan.connected.known_or(remote.tunnel.state.is_connected());
            let window = plan
                .auto_renew_before_days
                .known_or(AutoRenewBeforeDays::DEFAULT);
            Ok(reconciled(
                remote,
                Some(onboarding.clone()),
                connected,
                window,
                warnings,
            ))
        }
        .instrument(span)
        .await
    }
}
