#![cfg(test)]

use std::time::Duration;
use std::time::SystemTime;

use sapcc_common::id::SubaccountIdentity;
use sapcc_fake_connector::FakeConnector;

use crate::subaccount::state::SubaccountPlan;

mod delete;
mod test_connector_config;
mod update;

const REGION_HOST: &str = "cf.eu10.hana.ondemand.com";
const SUBACCOUNT: &str = "0a1b2c3d-4e5f-6a7b-8c9d-0e1f2a3b4c5d";
const USER: &str = "subaccount-admin@example.com";
const PASSWORD: &str = "s3cr3t";

fn identity() -> SubaccountIdentity {
    SubaccountIdentity::new(REGION_HOST, SUBACCOUNT)
}

fn credentials_plan() -> SubaccountPlan {
    SubaccountPlan::with_credentials(identity(), USER, PASSWORD)
        .with_display_name("Production")
        .with_description("On-premise systems of the production landscape")
}

/// The requests received by the fake connector, as `METHOD path`.
fn calls(connector: &FakeConnector) -> Vec<String> {
    connector
        .requests()
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn in_days(days: u64) -> SystemTime {
    SystemTime::now() + Duration::from_secs(days * 24 * 3600)
}
