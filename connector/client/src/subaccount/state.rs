use sapcc_common::api::subaccount::SubaccountRemoteState;
use sapcc_common::id::LocationId;
use sapcc_common::id::RegionHost;
use sapcc_common::id::SubaccountId;
use sapcc_common::id::SubaccountIdentity;
use sapcc_common::renewal::AutoRenewBeforeDays;
use sapcc_common::value::Value;
use serde::Deserialize;
use serde::Serialize;

use super::onboarding::OnboardingMethod;
use super::warning::SubaccountWarning;

/// The desired state of a subaccount, as planned by the frontend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubaccountPlan {
    pub region_host: Value<RegionHost>,
    pub subaccount: Value<SubaccountId>,
    pub onboarding: Value<OnboardingMethod>,
    pub location_id: Option<LocationId>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub connected: Value<bool>,
    pub auto_renew_before_days: Value<AutoRenewBeforeDays>,
}

impl Default for SubaccountPlan {
    fn default() -> Self {
        Self {
            region_host: Value::Unset,
            subaccount: Value::Unset,
            onboarding: Value::Unset,
            location_id: None,
            display_name: None,
            description: None,
            connected: Value::Known(true),
            auto_renew_before_days: Value::Known(AutoRenewBeforeDays::DEFAULT),
        }
    }
}

impl SubaccountPlan {
    /// A plan onboarding the given subaccount with the credentials of one of its users.
    pub fn with_credentials(
        identity: SubaccountIdentity,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::default()
            .with_identity(identity)
            .with_onboarding(OnboardingMethod::Credentials {
                user: user.into(),
                password: password.into(),
            })
    }

    /// A plan onboarding with an authentication token, the identity is assigned remotely.
    pub fn with_token(value: impl Into<String>) -> Self {
        Self {
            region_host: Value::Unknown,
            subaccount: Value::Unknown,
            ..Self::default()
        }
        .with_onboarding(OnboardingMethod::Token {
            value: value.into(),
        })
    }

    pub fn with_identity(self, identity: SubaccountIdentity) -> Self {
        Self {
            region_host: Value::Known(identity.region_host),
            subaccount: Value::Known(identity.subaccount),
            ..self
        }
    }

    pub fn with_onboarding(self, onboarding: OnboardingMethod) -> Self {
        Self {
            onboarding: Value::Known(onboarding),
            ..self
        }
    }

    pub fn with_location_id(self, location_id: impl Into<LocationId>) -> Self {
        Self {
            location_id: Some(location_id.into()),
            ..self
        }
    }

    pub fn with_display_name(self, display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    pub fn with_connected(self, connected: bool) -> Self {
        Self {
            connected: Value::Known(connected),
            ..self
        }
    }

    pub fn with_auto_renew_before_days(self, window: AutoRenewBeforeDays) -> Self {
        Self {
            auto_renew_before_days: Value::Known(window),
            ..self
        }
    }

    /// The identity, if both halves are known.
    pub fn identity(&self) -> Option<SubaccountIdentity> {
        let region_host = self.region_host.known()?;
        let subaccount = self.subaccount.known()?;
        Some(SubaccountIdentity {
            region_host: region_host.clone(),
            subaccount: subaccount.clone(),
        })
    }
}

/// The reconciled state of a subaccount, persisted by the frontend.
///
/// The Cloud Connector never returns the credentials, the desired `connected`
/// flag or the renewal window, so they are carried over from the plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubaccountState {
    #[serde(flatten)]
    pub remote: SubaccountRemoteState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding: Option<OnboardingMethod>,

    pub connected: bool,

    #[serde(default)]
    pub auto_renew_before_days: AutoRenewBeforeDays,
}

impl SubaccountState {
    pub fn identity(&self) -> SubaccountIdentity {
        self.remote.identity()
    }
}

/// The outcome of a successful Create, Read or Update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciled {
    pub state: SubaccountState,

    /// The import key to persist next to the state.
    pub identity: SubaccountIdentity,

    pub warnings: Vec<SubaccountWarning>,
}

#[cfg(test)]
mod tests {
    use sapcc_common::api::subaccount::SubaccountRemoteState;
    use sapcc_common::api::subaccount::Tunnel;
    use sapcc_common::id::SubaccountIdentity;
    use sapcc_common::renewal::AutoRenewBeforeDays;
    use sapcc_common::value::Value;

    use super::SubaccountPlan;
    use super::SubaccountState;
    use crate::subaccount::onboarding::OnboardingMethod;

    #[test]
    fn plan_defaults() {
        let plan = SubaccountPlan::default();
        assert_eq!(Value::Known(true), plan.connected);
        assert_eq!(
            Value::Known(AutoRenewBeforeDays::DEFAULT),
            plan.auto_renew_before_days
        );
        assert_eq!(None, plan.identity());
    }

    #[test]
    fn plan_identity() {
        let identity = SubaccountIdentity::new("cf.eu10.hana.ondemand.com", "sub-1");
        let plan = SubaccountPlan::with_credentials(identity.clone(), "user", "secret");
        assert_eq!(Some(identity), plan.identity());
        assert_eq!(None, SubaccountPlan::with_token("t0k3n").identity());
    }

    #[test]
    fn state_serde() -> Result<(), Box<dyn std::error::Error>> {
        let state = SubaccountState {
            remote: SubaccountRemoteState {
                region_host: "cf.eu10.hana.ondemand.com".into(),
                subaccount: "sub-1".into(),
                location_id: None,
                display_name: Some("Display".into()),
                description: None,
                tunnel: Tunnel::disconnected(),
            },
            onboarding: Some(OnboardingMethod::Token {
                value: "t0k3n".into(),
            }),
            connected: false,
            auto_renew_before_days: AutoRenewBeforeDays::new(30)?,
        };
        let json = serde_json::to_value(&state)?;
        assert_eq!("cf.eu10.hana.ondemand.com", json["regionHost"]);
        assert_eq!("Display", json["displayName"]);
        assert_eq!("Disconnected", json["tunnel"]["state"]);
        assert_eq!("token", json["onboarding"]["method"]);
        assert_eq!(30, json["autoRenewBeforeDays"]);
        assert_eq!(state, serde_json::from_value(json)?);
        Ok(())
    }

    #[test]
    fn state_default_window() -> Result<(), Box<dyn std::error::Error>> {
        let state: SubaccountState = serde_json::from_str(
            r#"{
                "regionHost": "cf.eu10.hana.ondemand.com",
                "subaccount": "sub-1",
                "tunnel": { "state": "Connected" },
                "connected": true
            }"#,
        )?;
        assert_eq!(AutoRenewBeforeDays::DEFAULT, state.auto_renew_before_days);
        assert_eq!(None, state.onboarding);
        Ok(())
    }
}
