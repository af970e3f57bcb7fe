use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

/// A timestamp in milliseconds since the UNIX epoch, as returned by the Cloud Connector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochMillis(pub i64);

impl From<EpochMillis> for SystemTime {
    fn from(EpochMillis(millis): EpochMillis) -> Self {
        match u64::try_from(millis) {
            Ok(millis) => UNIX_EPOCH + Duration::from_millis(millis),
            Err(_) => UNIX_EPOCH,
        }
    }
}

impl From<SystemTime> for EpochMillis {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since_epoch) => Self(i64::try_from(since_epoch.as_millis()).unwrap_or(i64::MAX)),
            Err(before_epoch) => {
                Self(-i64::try_from(before_epoch.duration().as_millis()).unwrap_or(i64::MAX))
            }
        }
    }
}

impl std::fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let time = SystemTime::from(*self);
        std::fmt::Display::fmt(&humantime::format_rfc3339_seconds(time), f)
    }
}

/// Represents the interval of time for certificate validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity<T = SystemTime> {
    pub from: T,
    pub to: T,
}

impl<T> Validity<T> {
    pub fn map<F, U>(self, f: F) -> Validity<U>
    where
        F: Fn(T) -> U,
    {
        Validity {
            from: f(self.from),
            to: f(self.to),
        }
    }
}

impl From<Validity<EpochMillis>> for Validity {
    fn from(validity: Validity<EpochMillis>) -> Self {
        validity.map(SystemTime::from)
    }
}

impl Validity {
    /// The validity left at `now`, or [None] if the certificate expired.
    pub fn remaining(&self, now: SystemTime) -> Option<Duration> {
        self.to.duration_since(now).ok()
    }
}
