use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use nameth::NamedEnumValues as _;
use nameth::nameth;
use sapcc_common::id::SubaccountIdentity;

#[nameth]
#[derive(thiserror::Error, Debug)]
pub enum FakeConnectorError {
    #[error("[{n}] Subaccount {0} not found", n = self.name())]
    NotFound(SubaccountIdentity),

    #[error("[{n}] Subaccount {0} already exists", n = self.name())]
    AlreadyExists(SubaccountIdentity),

    #[error("[{n}] Invalid authentication data", n = self.name())]
    InvalidToken,

    #[error("[{n}] {0}", n = self.name())]
    BadRequest(&'static str),
}

impl FakeConnectorError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for FakeConnectorError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
