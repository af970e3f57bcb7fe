use http::Method;
use http::StatusCode;
use sapcc_common::api::subaccount::SubaccountEndpoint;
use sapcc_common::api::subaccount::TunnelState;
use sapcc_common::api::subaccount::subaccount_path;
use sapcc_common::id::SubaccountIdentity;
use sapcc_common::renewal::AutoRenewBeforeDays;
use sapcc_common::value::Value;
use serde_json::json;

use super::REGION_HOST;
use super::SUBACCOUNT;
use super::calls;
use super::credentials_plan;
use super::identity;
use super::in_days;
use super::test_env::TestEnv;
use super::test_env::TestEnvError;
use crate::subaccount::SubaccountError;
use crate::subaccount::state::SubaccountPlan;
use crate::subaccount::warning::SubaccountWarning;

#[tokio::test]
async fn update_identity_mismatch() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        env.connector.clear_requests();

        for planned in [
            SubaccountIdentity::new(REGION_HOST, "another-subaccount"),
            SubaccountIdentity::new("cf.us10.hana.ondemand.com", SUBACCOUNT),
        ] {
            let plan = credentials_plan().with_identity(planned.clone());
            let error = env
                .reconciler
                .update(&plan, &created.state)
                .await
                .unwrap_err();
            let SubaccountError::IdentityMismatch {
                planned: actual_planned,
                current,
            } = &error
            else {
                return Err(format!("Unexpected {error}").into());
            };
            assert_eq!(&planned, actual_planned);
            assert_eq!(&identity(), current);
        }
        assert_eq!(Vec::<String>::new(), calls(&env.connector));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_disconnects() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        env.connector.clear_requests();

        let plan = credentials_plan().with_connected(false);
        let reconciled = env.reconciler.update(&plan, &created.state).await?;
        assert_eq!(
            vec![
                format!("PUT {}", subaccount_path(&identity())),
                format!("PUT {}", SubaccountEndpoint::State.path(&identity())),
                format!("GET {}", subaccount_path(&identity())),
            ],
            calls(&env.connector)
        );
        assert_eq!(
            Some(json!({ "connected": false })),
            env.connector.requests()[1].body
        );
        assert!(!reconciled.state.connected);
        assert_eq!(
            TunnelState::Disconnected,
            reconciled.state.remote.tunnel.state
        );
        assert_eq!(Vec::<SubaccountWarning>::new(), reconciled.warnings);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_metadata() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        env.connector.clear_requests();

        let plan = credentials_plan()
            .with_display_name("Staging")
            .with_location_id("loc-2");
        let reconciled = env.reconciler.update(&plan, &created.state).await?;
        assert_eq!(
            vec![
                format!("PUT {}", subaccount_path(&identity())),
                format!("POST {}", SubaccountEndpoint::Trust.path(&identity())),
            ],
            calls(&env.connector)
        );
        assert_eq!(
            Some(json!({
                "locationID": "loc-2",
                "displayName": "Staging",
                "description": "On-premise systems of the production landscape",
            })),
            env.connector.requests()[0].body
        );
        let remote = &reconciled.state.remote;
        assert_eq!(Some("Staging"), remote.display_name.as_deref());
        assert_eq!(Some("loc-2"), remote.location_id.as_deref());
        assert_eq!(created.state.onboarding, reconciled.state.onboarding);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_tightens_renewal_window() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        assert!(env.connector.set_certificate_not_after(&identity(), in_days(20)));
        env.connector.clear_requests();

        let window = AutoRenewBeforeDays::new(30)?;
        let plan = credentials_plan().with_auto_renew_before_days(window);
        let reconciled = env.reconciler.update(&plan, &created.state).await?;
        assert_eq!(
            vec![
                format!("PUT {}", subaccount_path(&identity())),
                format!("POST {}", SubaccountEndpoint::Validity.path(&identity())),
                format!("POST {}", SubaccountEndpoint::Trust.path(&identity())),
            ],
            calls(&env.connector)
        );
        assert_eq!(window, reconciled.state.auto_renew_before_days);
        let [SubaccountWarning::CertificateRenewed { window: renewed, .. }] =
            reconciled.warnings.as_slice()
        else {
            return Err(format!("Unexpected {:?}", reconciled.warnings).into());
        };
        assert_eq!(window, *renewed);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_renewal_failure() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        assert!(env.connector.set_certificate_not_after(&identity(), in_days(20)));
        env.connector.fail(
            Method::POST,
            SubaccountEndpoint::Validity.path(&identity()),
            StatusCode::FORBIDDEN,
        );
        env.connector.clear_requests();

        let plan = credentials_plan().with_auto_renew_before_days(AutoRenewBeforeDays::new(30)?);
        let error = env
            .reconciler
            .update(&plan, &created.state)
            .await
            .unwrap_err();
        assert!(
            matches!(error, SubaccountError::RenewalFailure { .. }),
            "{error}"
        );
        assert_eq!(
            vec![
                format!("PUT {}", subaccount_path(&identity())),
                format!("POST {}", SubaccountEndpoint::Validity.path(&identity())),
            ],
            calls(&env.connector)
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_trust_failure() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        env.connector.fail(
            Method::POST,
            SubaccountEndpoint::Trust.path(&identity()),
            StatusCode::BAD_GATEWAY,
        );
        env.connector.clear_requests();

        let plan = credentials_plan().with_description("Trust failure");
        let error = env
            .reconciler
            .update(&plan, &created.state)
            .await
            .unwrap_err();
        assert!(
            matches!(error, SubaccountError::TrustSyncFailure { .. }),
            "{error}"
        );
        assert_eq!(
            vec![
                format!("PUT {}", subaccount_path(&identity())),
                format!("POST {}", SubaccountEndpoint::Trust.path(&identity())),
            ],
            calls(&env.connector)
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_unknown_window_skips_renewal() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        assert!(env.connector.set_certificate_not_after(&identity(), in_days(2)));
        env.connector.clear_requests();

        let plan = SubaccountPlan {
            auto_renew_before_days: Value::Unknown,
            ..credentials_plan()
        };
        let reconciled = env.reconciler.update(&plan, &created.state).await?;
        assert_eq!(
            vec![
                format!("PUT {}", subaccount_path(&identity())),
                format!("POST {}", SubaccountEndpoint::Trust.path(&identity())),
            ],
            calls(&env.connector)
        );
        assert_eq!(
            created.state.auto_renew_before_days,
            reconciled.state.auto_renew_before_days
        );
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_connect_failure() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env
            .reconciler
            .create(&credentials_plan().with_connected(false))
            .await?;
        env.connector.set_connect_failure(true);
        env.connector.clear_requests();

        let reconciled = env
            .reconciler
            .update(&credentials_plan(), &created.state)
            .await?;
        assert_eq!(
            vec![
                format!("PUT {}", subaccount_path(&identity())),
                format!("PUT {}", SubaccountEndpoint::State.path(&identity())),
                format!("GET {}", subaccount_path(&identity())),
            ],
            calls(&env.connector)
        );
        assert_eq!(
            vec![SubaccountWarning::ConnectFailure {
                identity: identity()
            }],
            reconciled.warnings
        );
        assert!(reconciled.state.connected);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn update_token_keeps_assigned_identity() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let assigned = SubaccountIdentity::new("cf.us10.hana.ondemand.com", "assigned-subaccount");
        env.connector.register_token("t0k3n", assigned.clone());
        let created = env
            .reconciler
            .create(&SubaccountPlan::with_token("t0k3n"))
            .await?;
        env.connector.clear_requests();

        let plan = SubaccountPlan::with_token("t0k3n").with_description("Assigned");
        let reconciled = env.reconciler.update(&plan, &created.state).await?;
        assert_eq!(assigned, reconciled.identity);
        assert_eq!(
            Some("Assigned"),
            reconciled.state.remote.description.as_deref()
        );
        assert_eq!(
            vec![
                format!("PUT {}", subaccount_path(&assigned)),
                format!("POST {}", SubaccountEndpoint::Trust.path(&assigned)),
            ],
            calls(&env.connector)
        );
        Ok(())
    })
    .await
}
