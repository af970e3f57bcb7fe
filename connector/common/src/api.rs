//! Request and response bodies of the Cloud Connector configuration API.

pub mod subaccount;

/// Base path of the configuration API.
pub const CONFIGURATION_API: &str = "/api/v1/configuration";
