//! Policy for renewing the subaccount certificate before it expires.

use std::time::Duration;
use std::time::SystemTime;

use nameth::NamedEnumValues as _;
use nameth::nameth;
use serde::Deserialize;
use serde::Serialize;

const DAY: Duration = Duration::from_secs(24 * 3600);

/// How many days before expiration the subaccount certificate gets renewed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct AutoRenewBeforeDays(u16);

impl AutoRenewBeforeDays {
    pub const MIN: u16 = 7;
    pub const MAX: u16 = 45;
    pub const DEFAULT: Self = Self(14);

    pub fn new(days: i64) -> Result<Self, AutoRenewBeforeDaysError> {
        Self::try_from(days)
    }

    pub fn days(self) -> u16 {
        self.0
    }

    pub fn lead_time(self) -> Duration {
        DAY * u32::from(self.0)
    }
}

impl Default for AutoRenewBeforeDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for AutoRenewBeforeDays {
    type Error = AutoRenewBeforeDaysError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        match u16::try_from(days) {
            Ok(days) if (Self::MIN..=Self::MAX).contains(&days) => Ok(Self(days)),
            _ => Err(AutoRenewBeforeDaysError::OutOfRange {
                days,
                min: Self::MIN,
                max: Self::MAX,
            }),
        }
    }
}

impl From<AutoRenewBeforeDays> for u16 {
    fn from(days: AutoRenewBeforeDays) -> Self {
        days.0
    }
}

impl std::fmt::Display for AutoRenewBeforeDays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.0)
    }
}

#[nameth]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AutoRenewBeforeDaysError {
    #[error("[{n}] The renewal window must be between {min} and {max} days, got {days}", n = self.name())]
    OutOfRange { days: i64, min: u16, max: u16 },
}

/// Renewal is due once the remaining validity is no longer than the renewal window.
pub fn is_renewal_due(not_after: SystemTime, window: AutoRenewBeforeDays, now: SystemTime) -> bool {
    not_after <= now + window.lead_time()
}
