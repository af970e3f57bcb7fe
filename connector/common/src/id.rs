use std::str::FromStr;

use nameth::NamedEnumValues as _;
use nameth::nameth;
use serde::Deserialize;
use serde::Serialize;

#[macro_export]
macro_rules! declare_identifier {
    ($name:ident) => {
        #[nameth::nameth]
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            id: std::sync::Arc<str>,
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self {
                    id: id.into_boxed_str().into(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                id.to_owned().into()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.id
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                self.as_ref()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(self.as_ref(), f)
            }
        }
    };
}

declare_identifier!(RegionHost);
declare_identifier!(SubaccountId);
declare_identifier!(LocationId);

const IMPORT_KEY_SEPARATOR: char = ',';
const RESERVED_PATH_CHARACTERS: &[char] = &['/', '?', '#', '%'];

/// The immutable `(regionHost, subaccount)` pair that names a subaccount.
///
/// Rendered as `<regionHost>,<subaccount>`, which is also the import key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubaccountIdentity {
    pub region_host: RegionHost,
    pub subaccount: SubaccountId,
}

impl SubaccountIdentity {
    pub fn new(region_host: impl Into<RegionHost>, subaccount: impl Into<SubaccountId>) -> Self {
        Self {
            region_host: region_host.into(),
            subaccount: subaccount.into(),
        }
    }

    /// The path segment of the subaccount in the configuration API.
    pub fn path(&self) -> String {
        format!("{}/{}", self.region_host, self.subaccount)
    }

    /// Fails if a component would not stay a single segment of [Self::path].
    pub fn check_path(&self) -> Result<(), InvalidImportKey> {
        let components: [&str; 2] = [&self.region_host, &self.subaccount];
        if components
            .iter()
            .any(|component| component.contains(RESERVED_PATH_CHARACTERS))
        {
            return Err(InvalidImportKey::ReservedCharacter(self.to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Display for SubaccountIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{IMPORT_KEY_SEPARATOR}{}",
            self.region_host, self.subaccount
        )
    }
}

impl FromStr for SubaccountIdentity {
    type Err = InvalidImportKey;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let mut parts = key.split(IMPORT_KEY_SEPARATOR).map(str::trim);
        let (Some(region_host), Some(subaccount), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(InvalidImportKey::Format(key.to_owned()));
        };
        if region_host.is_empty() {
            return Err(InvalidImportKey::EmptyRegionHost(key.to_owned()));
        }
        if subaccount.is_empty() {
            return Err(InvalidImportKey::EmptySubaccount(key.to_owned()));
        }
        let identity = Self::new(region_host, subaccount);
        identity.check_path()?;
        Ok(identity)
    }
}

#[nameth]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidImportKey {
    #[error("[{n}] Expected '<regionHost>,<subaccount>' but got '{0}'", n = self.name())]
    Format(String),

    #[error("[{n}] The region host is empty in '{0}'", n = self.name())]
    EmptyRegionHost(String),

    #[error("[{n}] The subaccount is empty in '{0}'", n = self.name())]
    EmptySubaccount(String),

    #[error("[{n}] '{0}' contains one of {chars:?}", n = self.name(), chars = RESERVED_PATH_CHARACTERS)]
    ReservedCharacter(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::InvalidImportKey;
    use super::RegionHost;
    use super::SubaccountId;
    use super::SubaccountIdentity;

    #[test]
    fn identifiers() {
        let eu10: RegionHost = "cf.eu10.hana.ondemand.com".into();
        let us10: RegionHost = "cf.us10.hana.ondemand.com".to_string().into();
        assert!(eu10 < us10);
        assert_eq!("cf.eu10.hana.ondemand.com", eu10.to_string());
        assert!(eu10.starts_with("cf."));
        assert_eq!(
            r#""cf.eu10.hana.ondemand.com""#,
            serde_json::to_string(&eu10).unwrap()
        );

        let subaccounts = HashSet::from([SubaccountId::from("a"), SubaccountId::from("a")]);
        assert_eq!(1, subaccounts.len());
    }

    #[test]
    fn identity_serde() {
        let identity = SubaccountIdentity::new("cf.eu10.hana.ondemand.com", "abc-123");
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(
            r#"{"regionHost":"cf.eu10.hana.ondemand.com","subaccount":"abc-123"}"#,
            json
        );
        assert_eq!(identity, serde_json::from_str(&json).unwrap());
    }

    #[test]
    fn import_key() {
        let identity: SubaccountIdentity = " cf.eu10.hana.ondemand.com , abc-123 ".parse().unwrap();
        assert_eq!(
            SubaccountIdentity::new("cf.eu10.hana.ondemand.com", "abc-123"),
            identity
        );
        assert_eq!("cf.eu10.hana.ondemand.com,abc-123", identity.to_string());
        assert_eq!("cf.eu10.hana.ondemand.com/abc-123", identity.path());
        assert_eq!(identity, identity.to_string().parse().unwrap());
    }

    #[test]
    fn invalid_import_key() {
        assert_eq!(
            Err(InvalidImportKey::Format("no-separator".into())),
            "no-separator".parse::<SubaccountIdentity>()
        );
        assert_eq!(
            Err(InvalidImportKey::Format("a,b,c".into())),
            "a,b,c".parse::<SubaccountIdentity>()
        );
        assert_eq!(
            Err(InvalidImportKey::EmptyRegionHost(" ,b".into())),
            " ,b".parse::<SubaccountIdentity>()
        );
        let error = "a,".parse::<SubaccountIdentity>().unwrap_err();
        assert_eq!("[EmptySubaccount] The subaccount is empty in 'a,'", error.to_string());
    }

    #[test]
    fn reserved_path_characters() {
        assert_eq!(
            Err(InvalidImportKey::ReservedCharacter("host,a/b".into())),
            "host,a/b".parse::<SubaccountIdentity>()
        );
        assert_eq!(
            Err(InvalidImportKey::ReservedCharacter("h?st,a".into())),
            "h?st,a".parse::<SubaccountIdentity>()
        );
        let error = SubaccountIdentity::new("host", "a%2Fb")
            .check_path()
            .unwrap_err();
        assert_eq!(
            "[ReservedCharacter] 'host,a%2Fb' contains one of ['/', '?', '#', '%']",
            error.to_string()
        );
        assert_eq!(
            Ok(()),
            SubaccountIdentity::new("cf.eu10.hana.ondemand.com", "abc-123").check_path()
        );
    }
}
