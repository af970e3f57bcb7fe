use std::time::Duration;
use std::time::SystemTime;

use http::Method;
use sapcc_common::api::subaccount::RenewCertificateRequest;
use sapcc_common::api::subaccount::SubaccountEndpoint;
use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::renewal::AutoRenewBeforeDays;
use sapcc_common::renewal::is_renewal_due;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::SubaccountError;
use super::SubaccountReconciler;
use super::onboarding::OnboardingMethod;
use super::warning::SubaccountWarning;
use crate::transport::Transport;
use crate::transport::call_json;

impl<T: Transport> SubaccountReconciler<T> {
    /// Renews the certificate if it expires within the renewal window.
    ///
    /// Returns the remote state as returned by the renewal, or unchanged if no renewal happened.
    pub async fn renew_certificate_if_due(
        &self,
        remote: SubaccountRemoteState,
        onboarding: Option<&OnboardingMethod>,
        window: AutoRenewBeforeDays,
        warnings: &mut Vec<SubaccountWarning>,
    ) -> Result<SubaccountRemoteState, SubaccountError> {
        let Some(certificate) = &remote.tunnel.subaccount_certificate else {
            debug!("No certificate to renew");
            return Ok(remote);
        };
        let not_after = certificate.not_after_time_stamp;
        let validity = certificate.validity();
        let now = SystemTime::now();
        let remaining = validity
            .remaining(now)
            .map(|remaining| {
                humantime::format_duration(Duration::from_secs(remaining.as_secs())).to_string()
            })
            .unwrap_or_else(|| "expired".into());
        if !is_renewal_due(validity.to, window, now) {
            debug!(%not_after, %window, %remaining, "The certificate is not due for renewal");
            return Ok(remote);
        }

        let identity = remote.identity();
        let Some(OnboardingMethod::Credentials { user, password }) = onboarding else {
            warn!(%not_after, %window, "The certificate is due for renewal but there are no credentials");
            warnings.push(SubaccountWarning::RenewalRequiresCredentials {
                identity,
                window,
                not_after,
            });
            return Ok(remote);
        };

        info!(%not_after, %window, %remaining, "Renewing the certificate");
        let request = RenewCertificateRequest {
            user: user.clone(),
            password: password.clone(),
        };
        let renewed: SubaccountRemoteState = call_json(
            self.transport.as_ref(),
            Method::POST,
            &SubaccountEndpoint::Validity.path(&identity),
            Some(&request),
        )
        .await
        .map_err(|error| SubaccountError::RenewalFailure {
            identity: identity.clone(),
            error,
        })?;
        if let Some(certificate) = &renewed.tunnel.subaccount_certificate {
            info!(not_after = %certificate.not_after_time_stamp, "Renewed the certificate");
        }
        warnings.push(SubaccountWarning::CertificateRenewed {
            identity,
            window,
            not_after,
        });
        Ok(renewed)
    }
}
