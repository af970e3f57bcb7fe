use nameth::nameth;
use sapcc_common::api::subaccount::CreateSubaccountRequest;
use sapcc_common::value::Value;
use serde::Deserialize;
use serde::Serialize;

use super::SubaccountError;

/// How the subaccount gets onboarded to the Cloud Connector.
#[nameth]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum OnboardingMethod {
    /// Credentials of a user of the subaccount.
    ///
    /// The identity of the subaccount is supplied by the caller.
    Credentials { user: String, password: String },

    /// A one-time authentication token downloaded from the cockpit.
    ///
    /// The identity of the subaccount is assigned by the Cloud Connector.
    Token { value: String },
}

impl OnboardingMethod {
    /// Combines the credential fields of the frontend into one [OnboardingMethod].
    ///
    /// Returns [Value::Unknown] if any supplied field is pending computation,
    /// and [Value::Unset] if neither form is complete.
    pub fn from_parts(
        user: Value<String>,
        password: Value<String>,
        token: Value<String>,
    ) -> Result<Value<Self>, SubaccountError> {
        let any_unknown = [&user, &password, &token]
            .iter()
            .any(|part| **part == Value::Unknown);
        match (user, password, token) {
            (Value::Known(_), _, Value::Known(_)) | (_, Value::Known(_), Value::Known(_)) => {
                Err(SubaccountError::ConflictingCredentials)
            }
            _ if any_unknown => Ok(Value::Unknown),
            (_, _, Value::Known(value)) => Ok(Value::Known(Self::Token { value })),
            (Value::Known(user), Value::Known(password), _) => {
                Ok(Value::Known(Self::Credentials { user, password }))
            }
            _ => Ok(Value::Unset),
        }
    }

    /// Sets the credential fields of the creation request.
    pub(super) fn apply(&self, request: &mut CreateSubaccountRequest) {
        match self {
            Self::Credentials { user, password } => {
                request.cloud_user = Some(user.clone());
                request.cloud_password = Some(password.clone());
            }
            Self::Token { value } => request.authentication_data = Some(value.clone()),
        }
    }
}

impl std::fmt::Debug for OnboardingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credentials { user, .. } => f
                .debug_struct("Credentials")
                .field("user", user)
                .field("password", &"***")
                .finish(),
            Self::Token { .. } => f.debug_struct("Token").field("value", &"***").finish(),
        }
    }
}
