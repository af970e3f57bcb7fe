use sapcc_common::api::subaccount::subaccount_path;

use super::calls;
use super::credentials_plan;
use super::identity;
use super::test_env::TestEnv;
use super::test_env::TestEnvError;

#[tokio::test]
async fn delete() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        env.connector.clear_requests();

        let () = env.reconciler.delete(&created.state).await?;
        assert_eq!(
            vec![format!("DELETE {}", subaccount_path(&identity()))],
            calls(&env.connector)
        );
        assert_eq!(None, env.connector.get(&identity()));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn delete_missing() -> Result<(), TestEnvError> {
    TestEnv::run(async |env| {
        let created = env.reconciler.create(&credentials_plan()).await?;
        let () = env.reconciler.delete(&created.state).await?;

        let error = env.reconciler.delete(&created.state).await.unwrap_err();
        assert!(error.is_not_found(), "{error}");
        assert!(
            error
                .to_string()
                .starts_with("[TransportFailure] [Status] DELETE http://"),
            "{error}"
        );
        Ok(())
    })
    .await
}
