//! Configuration of the connection to a Cloud Connector instance.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use nameth::NamedEnumValues as _;
use nameth::nameth;
use sapcc_common::is_global::IsGlobal;
use serde::Deserialize;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration of the Transport Client.
///
/// Only the administrator credentials are mandatory, everything else has defaults.
pub trait ConnectorConfig: IsGlobal {
    /// The URL where the Cloud Connector administration API is listening.
    fn base_url(&self) -> impl std::fmt::Display {
        "https://localhost:8443"
    }

    /// Credentials of the Cloud Connector administrator.
    fn credentials(&self) -> BasicCredentials;

    /// PEM bundle of extra roots to trust, typically the self-signed certificate of the instance.
    fn trusted_roots_pem(&self) -> Result<Option<String>, std::io::Error> {
        Ok(None)
    }

    /// Skips verification of the server certificate.
    fn accept_invalid_certs(&self) -> bool {
        false
    }

    fn timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }
}

impl<T: ConnectorConfig> ConnectorConfig for Arc<T> {
    fn base_url(&self) -> impl std::fmt::Display {
        self.as_ref().base_url()
    }

    fn credentials(&self) -> BasicCredentials {
        self.as_ref().credentials()
    }

    fn trusted_roots_pem(&self) -> Result<Option<String>, std::io::Error> {
        self.as_ref().trusted_roots_pem()
    }

    fn accept_invalid_certs(&self) -> bool {
        self.as_ref().accept_invalid_certs()
    }

    fn timeout(&self) -> Duration {
        self.as_ref().timeout()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Provider configuration loaded from a TOML file or from environment variables.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProviderConfig {
    pub instance_url: String,
    pub username: String,
    pub password: String,

    #[serde(default)]
    pub ca_certificate: Option<PathBuf>,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout", with = "serde_duration")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl ProviderConfig {
    pub const INSTANCE_URL: &'static str = "SCC_INSTANCE_URL";
    pub const USERNAME: &'static str = "SCC_USERNAME";
    pub const PASSWORD: &'static str = "SCC_PASSWORD";
    pub const CA_CERTIFICATE: &'static str = "SCC_CA_CERTIFICATE";
    pub const INSECURE: &'static str = "SCC_INSECURE";
    pub const TIMEOUT: &'static str = "SCC_TIMEOUT";

    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let toml = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_owned(),
            error,
        })?;
        Self::from_toml(&toml)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from variables returned by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingVariable { name });
        let insecure = match lookup(Self::INSECURE) {
            Some(insecure) => insecure
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidBool {
                    name: Self::INSECURE,
                    value: insecure,
                })?,
            None => false,
        };
        let timeout = match lookup(Self::TIMEOUT) {
            Some(timeout) => humantime::parse_duration(&timeout)?,
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self {
            instance_url: required(Self::INSTANCE_URL)?,
            username: required(Self::USERNAME)?,
            password: required(Self::PASSWORD)?,
            ca_certificate: lookup(Self::CA_CERTIFICATE).map(PathBuf::from),
            insecure,
            timeout,
        })
    }
}

impl ConnectorConfig for ProviderConfig {
    fn base_url(&self) -> impl std::fmt::Display {
        self.instance_url.trim_end_matches('/')
    }

    fn credentials(&self) -> BasicCredentials {
        BasicCredentials {
            user: self.username.clone(),
            password: self.password.clone(),
        }
    }

    fn trusted_roots_pem(&self) -> Result<Option<String>, std::io::Error> {
        self.ca_certificate
            .as_ref()
            .map(std::fs::read_to_string)
            .transpose()
    }

    fn accept_invalid_certs(&self) -> bool {
        self.insecure
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("instance_url", &self.instance_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("ca_certificate", &self.ca_certificate)
            .field("insecure", &self.insecure)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("[{n}] Failed to read {path:?}: {error}", n = self.name())]
    Read {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("[{n}] {0}", n = self.name())]
    Parse(#[from] toml::de::Error),

    #[error("[{n}] The environment variable {name} is not set", n = self.name())]
    MissingVariable { name: &'static str },

    #[error("[{n}] The environment variable {name} must be 'true' or 'false', got '{value}'", n = self.name())]
    InvalidBool { name: &'static str, value: String },

    #[error("[{n}] {0}", n = self.name())]
    InvalidTimeout(#[from] humantime::DurationError),
}

mod serde_duration {
    use std::time::Duration;

    use serde::Deserializer;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a Duration")
            }

            fn visit_str<E>(self, duration: &str) -> Result<Duration, E>
            where
                E: serde::de::Error,
            {
                humantime::parse_duration(duration).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}
