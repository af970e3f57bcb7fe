use nameth::NamedEnumValues as _;
use nameth::nameth;
use sapcc_common::id::SubaccountIdentity;
use sapcc_common::renewal::AutoRenewBeforeDays;
use sapcc_common::validity::EpochMillis;

/// Non-fatal findings of a reconciliation.
///
/// The operation still succeeds and returns a fully reconciled state.
#[nameth]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubaccountWarning {
    /// The Cloud Connector failed to open the tunnel.
    ConnectFailure { identity: SubaccountIdentity },

    /// The certificate was about to expire and got renewed.
    CertificateRenewed {
        identity: SubaccountIdentity,
        window: AutoRenewBeforeDays,
        not_after: EpochMillis,
    },

    /// The certificate is about to expire but no credentials are available to renew it.
    RenewalRequiresCredentials {
        identity: SubaccountIdentity,
        window: AutoRenewBeforeDays,
        not_after: EpochMillis,
    },
}

impl SubaccountWarning {
    pub fn summary(&self) -> &'static str {
        match self {
            Self::ConnectFailure { .. } => "Connection Failure",
            Self::CertificateRenewed { .. } => "Certificate Renewed",
            Self::RenewalRequiresCredentials { .. } => "Certificate Renewal Skipped",
        }
    }

    pub fn identity(&self) -> &SubaccountIdentity {
        match self {
            Self::ConnectFailure { identity }
            | Self::CertificateRenewed { identity, .. }
            | Self::RenewalRequiresCredentials { identity, .. } => identity,
        }
    }
}

impl std::fmt::Display for SubaccountWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.name())?;
        match self {
            Self::ConnectFailure { identity } => write!(
                f,
                "The tunnel of subaccount {identity} failed to connect. \
                Set 'connected' to false and then back to true to retry."
            ),
            Self::CertificateRenewed {
                identity,
                window,
                not_after,
            } => write!(
                f,
                "The certificate of subaccount {identity} was due to expire on {not_after}, \
                within the renewal window of {window}, and was renewed."
            ),
            Self::RenewalRequiresCredentials {
                identity,
                window,
                not_after,
            } => write!(
                f,
                "The certificate of subaccount {identity} expires on {not_after}, \
                within the renewal window of {window}, but renewing it requires \
                the user and password of the subaccount."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use std::time::UNIX_EPOCH;

    use sapcc_common::id::SubaccountIdentity;
    use sapcc_common::renewal::AutoRenewBeforeDays;
    use sapcc_common::validity::EpochMillis;

    use super::SubaccountWarning;

    #[test]
    fn connect_failure() {
        let warning = SubaccountWarning::ConnectFailure {
            identity: SubaccountIdentity::new("cf.eu10.hana.ondemand.com", "sub-1"),
        };
        assert_eq!("Connection Failure", warning.summary());
        assert_eq!(
            "[ConnectFailure] The tunnel of subaccount cf.eu10.hana.ondemand.com,sub-1 failed to connect. \
            Set 'connected' to false and then back to true to retry.",
            warning.to_string()
        );
    }

    #[test]
    fn certificate_renewed() {
        let warning = SubaccountWarning::CertificateRenewed {
            identity: SubaccountIdentity::new("cf.eu10.hana.ondemand.com", "sub-1"),
            window: AutoRenewBeforeDays::DEFAULT,
            not_after: EpochMillis::from(UNIX_EPOCH + Duration::from_secs(86400)),
        };
        assert_eq!("Certificate Renewed", warning.summary());
        assert_eq!(
            "[CertificateRenewed] The certificate of subaccount cf.eu10.hana.ondemand.com,sub-1 \
            was due to expire on 1970-01-02T00:00:00Z, within the renewal window of 14 days, and was renewed.",
            warning.to_string()
        );
    }
}
