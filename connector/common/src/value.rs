//! Values supplied by the declarative frontend.

/// A value that may be absent, pending computation, or concretely known.
///
/// Steps that only run "if the caller supplied a concrete value" match on
/// [Value::Known] and skip both other cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Value<T> {
    /// The caller did not set the value.
    #[default]
    Unset,

    /// The value will only be known after apply.
    Unknown,

    Known(T),
}

impl<T> Value<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unset | Self::Unknown => None,
        }
    }

    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unset | Self::Unknown => None,
        }
    }

    /// Returns the known value, or the fallback.
    pub fn known_or(self, fallback: T) -> T {
        self.into_known().unwrap_or(fallback)
    }
}
