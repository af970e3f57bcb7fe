use std::time::Duration;

use crate::config::BasicCredentials;
use crate::config::ConnectorConfig;

/// Connects to the fake connector over plain HTTP.
pub struct TestConnectorConfig {
    pub base_url: String,
}

impl ConnectorConfig for TestConnectorConfig {
    fn base_url(&self) -> impl std::fmt::Display {
        &self.base_url
    }

    fn credentials(&self) -> BasicCredentials {
        BasicCredentials {
            user: "Administrator".into(),
            password: "manage".into(),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(5)
    }
}
